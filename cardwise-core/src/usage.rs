//! Rebate usage toggles.
//!
//! Owned and persisted by the caller. The engine only reads it, and only for
//! flat rebates.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// card name -> rebate index -> "use this rebate". Absent entries mean use.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RebateUsage {
    toggles: BTreeMap<String, BTreeMap<usize, bool>>,
}

impl RebateUsage {
    /// No toggles recorded: every flat rebate counts.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_toggle(mut self, card: impl Into<String>, index: usize, used: bool) -> Self {
        self.set(card, index, used);
        self
    }

    pub fn set(&mut self, card: impl Into<String>, index: usize, used: bool) {
        self.toggles.entry(card.into()).or_default().insert(index, used);
    }

    pub fn is_used(&self, card: &str, index: usize) -> bool {
        self.toggles
            .get(card)
            .and_then(|m| m.get(&index))
            .copied()
            .unwrap_or(true)
    }

    pub fn is_empty(&self) -> bool {
        self.toggles.is_empty()
    }

    /// Recorded toggles for one card, in index order.
    pub fn card_toggles(&self, card: &str) -> impl Iterator<Item = (usize, bool)> + '_ {
        self.toggles
            .get(card)
            .into_iter()
            .flat_map(|m| m.iter().map(|(i, u)| (*i, *u)))
    }
}
