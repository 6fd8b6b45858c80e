//! Rebate resolution across a portfolio.
//!
//! Category rebates draw on a shared, depleting pool of per-category spend:
//! they are applied largest first (stable, so equal amounts keep catalog
//! order) and each one can only use spend the earlier ones left behind. Flat
//! rebates never touch that pool; they are summed independently, gated by the
//! caller's usage toggles.

use crate::card::{Card, Rebate};
use crate::category::Category;
use crate::spending::SpendingProfile;
use crate::usage::RebateUsage;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How one rebate contributed to a portfolio's value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RebateLedgerEntry {
    /// Position of the rebate in its card's `rebates` list.
    pub index: usize,
    pub description: String,
    pub is_category: bool,
    /// Value actually credited.
    pub used: f64,
    /// Face value of the rebate.
    pub amount: f64,
    pub applied: bool,
}

/// Card name -> ledger entries, in resolution order.
pub type RebateLedger = BTreeMap<String, Vec<RebateLedgerEntry>>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RebateResolution {
    pub total: f64,
    pub ledger: RebateLedger,
}

impl RebateResolution {
    /// Sum of `used` over category rebates resolved to `category`, across all
    /// cards. Needs the cards to map ledger indices back to categories.
    pub fn category_used(&self, cards: &[&Card], category: Category) -> f64 {
        cards
            .iter()
            .filter_map(|card| self.ledger.get(&card.name).map(|entries| (card, entries)))
            .flat_map(|(card, entries)| {
                entries.iter().filter(move |e| {
                    e.is_category
                        && card
                            .rebates
                            .get(e.index)
                            .and_then(Rebate::resolved_category)
                            == Some(category)
                })
            })
            .map(|e| e.used)
            .sum()
    }
}

struct PendingCategoryRebate<'a> {
    card: &'a Card,
    index: usize,
    category: Option<Category>,
    amount: f64,
    description: &'a str,
}

/// Total usable rebate value of `cards` under `spending`, with a per-card
/// ledger.
pub fn resolve_rebates(
    cards: &[&Card],
    spending: &SpendingProfile,
    usage: &RebateUsage,
) -> RebateResolution {
    let mut total = 0.0;
    let mut ledger: RebateLedger = BTreeMap::new();

    let mut pending: Vec<PendingCategoryRebate<'_>> = cards
        .iter()
        .flat_map(|&card| {
            card.rebates.iter().enumerate().filter_map(move |(index, rebate)| match rebate {
                Rebate::Category { amount, description, .. } => Some(PendingCategoryRebate {
                    card,
                    index,
                    category: rebate.resolved_category(),
                    amount: *amount,
                    description,
                }),
                Rebate::Flat { .. } => None,
            })
        })
        .collect();

    // Vec::sort_by is stable: equal amounts keep encounter order.
    pending.sort_by(|a, b| b.amount.total_cmp(&a.amount));

    let mut remaining: BTreeMap<Category, f64> = spending.iter().collect();

    for rebate in &pending {
        let used = match rebate.category.and_then(|c| remaining.get_mut(&c)) {
            Some(left) => {
                let used = left.min(rebate.amount).max(0.0);
                *left -= used;
                used
            }
            None => {
                tracing::debug!(
                    card = %rebate.card.name,
                    index = rebate.index,
                    "category rebate has no canonical category; contributes nothing"
                );
                0.0
            }
        };
        total += used;
        ledger.entry(rebate.card.name.clone()).or_default().push(RebateLedgerEntry {
            index: rebate.index,
            description: rebate.description.to_string(),
            is_category: true,
            used,
            amount: rebate.amount,
            applied: used > 0.0,
        });
    }

    for card in cards {
        let entries = ledger.entry(card.name.clone()).or_default();
        for (index, rebate) in card.rebates.iter().enumerate() {
            let Rebate::Flat { amount, description } = rebate else {
                continue;
            };
            let applied = usage.is_used(&card.name, index);
            if applied {
                total += amount;
            }
            entries.push(RebateLedgerEntry {
                index,
                description: description.clone(),
                is_category: false,
                used: if applied { *amount } else { 0.0 },
                amount: *amount,
                applied,
            });
        }
    }

    RebateResolution { total, ledger }
}
