//! Approximate single-card scoring for prefiltering.
//!
//! Only used to rank candidates before the combinatorial search. It skips the
//! alias table, credits flat rebates in full regardless of toggles, and does
//! not share spend across cards, so it overestimates. The search depends on
//! nothing but the ordering it produces.

use crate::card::Card;
use crate::rates::{BASELINE_MULTIPLIER, FALLBACK_KEY};
use crate::spending::SpendingProfile;

/// Rough net annual value of `card` held on its own.
///
/// `include_offers` is accepted for parity with the search configuration; the
/// card model has no separate offer representation, so it does not change the
/// score.
pub fn approximate_card_value(
    card: &Card,
    spending: &SpendingProfile,
    include_rebates: bool,
    _include_offers: bool,
) -> f64 {
    let mut score: f64 = spending
        .iter()
        .map(|(category, spend)| {
            let rate = card
                .rewards
                .get(category.as_key())
                .or_else(|| card.rewards.get(FALLBACK_KEY))
                .copied()
                .unwrap_or(BASELINE_MULTIPLIER);
            rate * spend * card.point_value
        })
        .sum();

    if include_rebates {
        score += card.flat_rebate_total();
    }

    score - card.annual_fee
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::Rebate;
    use crate::category::Category;

    fn spending() -> SpendingProfile {
        SpendingProfile::new([(Category::Dining, 1000.0), (Category::Groceries, 1000.0)]).unwrap()
    }

    #[test]
    fn test_exact_key_then_all() {
        let card = Card::new("x", "A").with_reward("dining", 3.0).with_reward("all", 2.0);
        // dining 3x, groceries falls to all=2x
        let v = approximate_card_value(&card, &spending(), true, true);
        assert!((v - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_aliases_are_not_consulted() {
        let card = Card::new("amex", "Gold").with_reward("supermarkets", 4.0);
        // groceries earns baseline 1x here even though the evaluator would use 4x
        let v = approximate_card_value(&card, &spending(), true, true);
        assert!((v - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_flat_rebates_counted_in_full_when_included() {
        let card = Card::new("x", "A")
            .with_fee(95.0)
            .with_rebate(Rebate::flat(100.0, "Travel credit"))
            .with_rebate(Rebate::category("dining", 500.0, "Dining credit"));
        let with = approximate_card_value(&card, &spending(), true, true);
        let without = approximate_card_value(&card, &spending(), false, true);
        assert!((with - without - 100.0).abs() < 1e-9);
        assert!((without - (20.0 - 95.0)).abs() < 1e-9);
    }
}
