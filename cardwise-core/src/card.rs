//! Card catalog types.
//!
//! Cards are immutable inputs: the engine reads them, never edits them.

use crate::category::Category;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Value of one reward point when a catalog entry leaves it out.
pub const DEFAULT_POINT_VALUE: f64 = 0.01;

fn default_point_value() -> f64 {
    DEFAULT_POINT_VALUE
}

fn default_category_description() -> String {
    "Category Rebate".to_string()
}

fn default_flat_description() -> String {
    "Flat Rebate".to_string()
}

/// A credit card as seen by the engine. `name` is the unique key.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Card {
    #[serde(default)]
    pub issuer: String,
    pub name: String,
    #[serde(default)]
    pub annual_fee: f64,
    /// Currency value per reward point.
    #[serde(default = "default_point_value")]
    pub point_value: f64,
    /// Raw reward key -> multiplier. Keys are issuer vocabulary, not
    /// necessarily canonical categories.
    #[serde(default)]
    pub rewards: BTreeMap<String, f64>,
    #[serde(default)]
    pub rebates: Vec<Rebate>,
}

/// A benefit attached to a card.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Rebate {
    /// Offsets spend in one category, capped at `amount`, once per portfolio.
    Category {
        category: String,
        amount: f64,
        #[serde(default = "default_category_description")]
        description: String,
    },
    /// Fixed credit independent of spend, gated by the usage toggle.
    Flat {
        amount: f64,
        #[serde(default = "default_flat_description")]
        description: String,
    },
}

impl Rebate {
    pub fn category(category: impl Into<String>, amount: f64, description: impl Into<String>) -> Self {
        Rebate::Category {
            category: category.into(),
            amount,
            description: description.into(),
        }
    }

    pub fn flat(amount: f64, description: impl Into<String>) -> Self {
        Rebate::Flat {
            amount,
            description: description.into(),
        }
    }

    pub fn amount(&self) -> f64 {
        match self {
            Rebate::Category { amount, .. } | Rebate::Flat { amount, .. } => *amount,
        }
    }

    pub fn description(&self) -> &str {
        match self {
            Rebate::Category { description, .. } | Rebate::Flat { description, .. } => description,
        }
    }

    pub fn is_category(&self) -> bool {
        matches!(self, Rebate::Category { .. })
    }

    /// Canonical category for a category rebate. `None` for flat rebates and
    /// for category keys outside the canonical set (those contribute nothing).
    pub fn resolved_category(&self) -> Option<Category> {
        match self {
            Rebate::Category { category, .. } => Category::from_key(category),
            Rebate::Flat { .. } => None,
        }
    }
}

impl Card {
    pub fn new(issuer: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            issuer: issuer.into(),
            name: name.into(),
            annual_fee: 0.0,
            point_value: DEFAULT_POINT_VALUE,
            rewards: BTreeMap::new(),
            rebates: Vec::new(),
        }
    }

    pub fn with_fee(mut self, annual_fee: f64) -> Self {
        self.annual_fee = annual_fee;
        self
    }

    pub fn with_point_value(mut self, point_value: f64) -> Self {
        self.point_value = point_value;
        self
    }

    pub fn with_reward(mut self, key: impl Into<String>, multiplier: f64) -> Self {
        self.rewards.insert(key.into(), multiplier);
        self
    }

    pub fn with_rebate(mut self, rebate: Rebate) -> Self {
        self.rebates.push(rebate);
        self
    }

    /// Sum of flat rebate amounts, ignoring any usage toggles.
    pub fn flat_rebate_total(&self) -> f64 {
        self.rebates
            .iter()
            .filter(|r| !r.is_category())
            .map(Rebate::amount)
            .sum()
    }
}
