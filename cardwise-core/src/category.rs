//! Canonical spending categories the engine reasons about.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Closed set of spending buckets. Declaration order is the iteration order
/// used everywhere (evaluation, reports).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    #[serde(rename = "groceries")]
    Groceries,
    #[serde(rename = "dining")]
    Dining,
    #[serde(rename = "flights_portal")]
    FlightsPortal,
    #[serde(rename = "hotel")]
    Hotel,
    #[serde(rename = "gas")]
    Gas,
    #[serde(rename = "online_shopping")]
    OnlineShopping,
    #[serde(rename = "other")]
    Other,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Groceries,
        Category::Dining,
        Category::FlightsPortal,
        Category::Hotel,
        Category::Gas,
        Category::OnlineShopping,
        Category::Other,
    ];

    /// Key used in spending inputs and rebate definitions.
    pub fn as_key(&self) -> &'static str {
        match self {
            Category::Groceries => "groceries",
            Category::Dining => "dining",
            Category::FlightsPortal => "flights_portal",
            Category::Hotel => "hotel",
            Category::Gas => "gas",
            Category::OnlineShopping => "online_shopping",
            Category::Other => "other",
        }
    }

    /// Human-readable label ("Flights Portal").
    pub fn label(&self) -> &'static str {
        match self {
            Category::Groceries => "Groceries",
            Category::Dining => "Dining",
            Category::FlightsPortal => "Flights Portal",
            Category::Hotel => "Hotel",
            Category::Gas => "Gas",
            Category::OnlineShopping => "Online Shopping",
            Category::Other => "Other",
        }
    }

    /// Exact canonical key lookup. Synonyms are not accepted here; see
    /// [`crate::rates::aliases`] for reward-key synonyms.
    pub fn from_key(key: &str) -> Option<Category> {
        Category::ALL.into_iter().find(|c| c.as_key() == key)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_key())
    }
}

/// Returned when a string is not one of the canonical category keys.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown spending category '{0}'")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase();
        Category::from_key(&key).ok_or_else(|| UnknownCategory(s.to_string()))
    }
}
