//! Annual spending profile.

use crate::category::Category;
use crate::error::EngineError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Validated mapping from canonical category to annual spend. Categories not
/// present spend 0. Deserialization ignores non-canonical keys.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<String, f64>", into = "BTreeMap<Category, f64>")]
pub struct SpendingProfile {
    amounts: BTreeMap<Category, f64>,
}

impl SpendingProfile {
    /// Build from annual amounts. Negative or non-finite values are rejected.
    pub fn new(amounts: impl IntoIterator<Item = (Category, f64)>) -> Result<Self, EngineError> {
        let mut out = BTreeMap::new();
        for (category, value) in amounts {
            if !value.is_finite() || value < 0.0 {
                return Err(EngineError::InvalidSpending { category, value });
            }
            out.insert(category, value);
        }
        Ok(Self { amounts: out })
    }

    /// Build from monthly amounts, annualized by 12.
    pub fn from_monthly(monthly: impl IntoIterator<Item = (Category, f64)>) -> Result<Self, EngineError> {
        let profile = Self::new(monthly)?;
        Ok(Self {
            amounts: profile
                .amounts
                .into_iter()
                .map(|(c, v)| (c, v * 12.0))
                .collect(),
        })
    }

    /// Build from raw string keys. Keys outside the canonical set are ignored.
    pub fn from_raw_keys<K: AsRef<str>>(
        amounts: impl IntoIterator<Item = (K, f64)>,
    ) -> Result<Self, EngineError> {
        let known = amounts.into_iter().filter_map(|(k, v)| {
            let category = Category::from_key(k.as_ref());
            if category.is_none() {
                tracing::debug!(key = k.as_ref(), "ignoring non-canonical spending key");
            }
            category.map(|c| (c, v))
        });
        Self::new(known)
    }

    pub fn get(&self, category: Category) -> f64 {
        self.amounts.get(&category).copied().unwrap_or(0.0)
    }

    pub fn total(&self) -> f64 {
        self.amounts.values().sum()
    }

    /// Every canonical category with its amount (0 where absent), in
    /// canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (Category, f64)> + '_ {
        Category::ALL.into_iter().map(|c| (c, self.get(c)))
    }
}

impl TryFrom<BTreeMap<String, f64>> for SpendingProfile {
    type Error = EngineError;

    fn try_from(value: BTreeMap<String, f64>) -> Result<Self, Self::Error> {
        Self::from_raw_keys(value)
    }
}

impl From<SpendingProfile> for BTreeMap<Category, f64> {
    fn from(value: SpendingProfile) -> Self {
        value.amounts
    }
}
