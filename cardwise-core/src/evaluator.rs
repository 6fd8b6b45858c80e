//! Portfolio evaluation: rewards, rebates and fees for a fixed set of cards.

use crate::card::Card;
use crate::category::Category;
use crate::rates::category_value;
use crate::rebates::{resolve_rebates, RebateLedger};
use crate::spending::SpendingProfile;
use crate::usage::RebateUsage;
use serde::{Deserialize, Serialize};

/// Best card for one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryAssignment {
    pub category: Category,
    /// `None` when no card earns a strictly positive value (zero spend).
    pub card: Option<String>,
    pub value: f64,
}

/// Full breakdown of a portfolio's net annual value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub net_value: f64,
    /// One entry per canonical category, in canonical order.
    pub assignments: Vec<CategoryAssignment>,
    pub ledger: RebateLedger,
    pub total_rewards: f64,
    pub total_rebates: f64,
    pub total_fees: f64,
}

impl Evaluation {
    pub fn assignment(&self, category: Category) -> Option<&CategoryAssignment> {
        self.assignments.iter().find(|a| a.category == category)
    }
}

/// Evaluate `cards` held together.
///
/// Each category goes to the card with the highest value; on an exact tie the
/// card earlier in `cards` keeps it. Fees are charged once per card whether or
/// not it wins any category.
pub fn evaluate_portfolio(
    cards: &[&Card],
    spending: &SpendingProfile,
    usage: &RebateUsage,
) -> Evaluation {
    let assignments: Vec<CategoryAssignment> = spending
        .iter()
        .map(|(category, spend)| {
            let mut best = CategoryAssignment { category, card: None, value: 0.0 };
            for card in cards {
                let value = category_value(card, category, spend);
                if value > best.value {
                    best.value = value;
                    best.card = Some(card.name.clone());
                }
            }
            best
        })
        .collect();

    let total_rewards: f64 = assignments.iter().map(|a| a.value).sum();
    let rebates = resolve_rebates(cards, spending, usage);
    let total_fees: f64 = cards.iter().map(|c| c.annual_fee).sum();

    Evaluation {
        net_value: total_rewards + rebates.total - total_fees,
        assignments,
        ledger: rebates.ledger,
        total_rewards,
        total_rebates: rebates.total,
        total_fees,
    }
}
