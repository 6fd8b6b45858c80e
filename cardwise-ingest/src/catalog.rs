//! Load and validate a card catalog in the engine's JSON schema.

use anyhow::{bail, Context, Result};
use cardwise_core::{Card, Rebate};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Parse a JSON array of cards and validate it.
pub fn parse_catalog(json: &str) -> Result<Vec<Card>> {
    let cards: Vec<Card> = serde_json::from_str(json).context("parse card catalog JSON")?;
    validate_catalog(&cards)?;
    Ok(cards)
}

/// Read, parse and validate a catalog file.
pub fn load_catalog(path: impl AsRef<Path>) -> Result<Vec<Card>> {
    let path = path.as_ref();
    let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cards = parse_catalog(&s).with_context(|| format!("load catalog {}", path.display()))?;
    tracing::debug!(cards = cards.len(), path = %path.display(), "loaded catalog");
    Ok(cards)
}

/// Check the invariants the engine assumes. Every problem is reported at once.
pub fn validate_catalog(cards: &[Card]) -> Result<()> {
    let mut problems = Vec::new();
    let mut seen = HashSet::new();

    for (i, card) in cards.iter().enumerate() {
        let label = if card.name.trim().is_empty() {
            problems.push(format!("card #{i} has an empty name"));
            format!("#{i}")
        } else {
            card.name.clone()
        };

        if !seen.insert(card.name.as_str()) {
            problems.push(format!("duplicate card name '{label}'"));
        }
        if !(card.annual_fee.is_finite() && card.annual_fee >= 0.0) {
            problems.push(format!("{label}: annual_fee must be >= 0, got {}", card.annual_fee));
        }
        if !(card.point_value.is_finite() && card.point_value > 0.0) {
            problems.push(format!("{label}: point_value must be > 0, got {}", card.point_value));
        }
        for (key, rate) in &card.rewards {
            if !(rate.is_finite() && *rate >= 0.0) {
                problems.push(format!("{label}: reward '{key}' must be >= 0, got {rate}"));
            }
        }
        for (idx, rebate) in card.rebates.iter().enumerate() {
            let amount = rebate.amount();
            if !(amount.is_finite() && amount >= 0.0) {
                problems.push(format!("{label}: rebate #{idx} amount must be >= 0, got {amount}"));
            }
            if let Rebate::Category { category, .. } = rebate {
                if rebate.resolved_category().is_none() {
                    tracing::warn!(card = %label, category = %category, "category rebate outside canonical categories will contribute nothing");
                }
            }
        }
    }

    if !problems.is_empty() {
        bail!("invalid catalog:\n  {}", problems.join("\n  "));
    }
    Ok(())
}
