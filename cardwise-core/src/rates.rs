//! Rate resolution: canonical category -> reward multiplier for a card.
//!
//! Issuers name their bonus categories inconsistently ("restaurants",
//! "supermarkets", "lodging"), so each canonical category carries an ordered
//! list of accepted reward keys. The first key a card defines wins; `all` is
//! tried last; a card with none of them earns the baseline multiplier.

use crate::card::Card;
use crate::category::Category;

/// Universal reward key, checked after every category-specific alias.
pub const FALLBACK_KEY: &str = "all";

/// Multiplier for a category the card does not mention at all.
pub const BASELINE_MULTIPLIER: f64 = 1.0;

/// Accepted reward keys for a category, in priority order.
pub fn aliases(category: Category) -> &'static [&'static str] {
    match category {
        Category::Groceries => &["groceries", "supermarkets", "online_grocery"],
        Category::Dining => &["dining", "restaurants"],
        Category::FlightsPortal => &["flights_portal", "flights", "travel_portal", "other_travel"],
        Category::Hotel => &["hotel", "hotels_portal", "lodging", "travel_portal"],
        Category::Gas => &["gas", "transport", "transit"],
        Category::OnlineShopping => &["online_shopping", "top", "other"],
        Category::Other => &["other"],
    }
}

/// Reward multiplier `card` earns on `category`.
pub fn reward_rate(card: &Card, category: Category) -> f64 {
    aliases(category)
        .iter()
        .chain(std::iter::once(&FALLBACK_KEY))
        .find_map(|key| card.rewards.get(*key).copied())
        .unwrap_or(BASELINE_MULTIPLIER)
}

/// Currency value `card` earns on `spend` in `category`.
pub fn category_value(card: &Card, category: Category, spend: f64) -> f64 {
    reward_rate(card, category) * spend * card.point_value
}
