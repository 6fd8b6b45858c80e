//! Convert a raw issuer catalog into the engine's card schema.
//!
//! The raw feed only carries fees, a universal cashback rate, statement
//! credits and sign-up offers. Bonus categories for a few well-known card
//! families are filled in from their names.

use anyhow::{Context, Result};
use cardwise_core::{Card, Rebate, DEFAULT_POINT_VALUE};
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Offers above this are treated as points bonuses, not statement credits.
const MAX_OFFER_AS_CREDIT: f64 = 1000.0;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCard {
    #[serde(default)]
    pub issuer: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub annual_fee: Option<f64>,
    #[serde(default)]
    pub universal_cashback_percent: Option<Value>,
    #[serde(default)]
    pub credits: Vec<RawCredit>,
    #[serde(default)]
    pub offers: Option<Vec<RawOffer>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawCredit {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub value: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawOffer {
    /// Either `[{"amount": 200}, ...]` or `[200, ...]`.
    #[serde(default)]
    pub amount: Vec<Value>,
}

impl RawOffer {
    fn first_amount(&self) -> Option<f64> {
        let first = self.amount.first()?;
        let v = match first {
            Value::Object(map) => map.get("amount")?,
            other => other,
        };
        match v {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

/// Remove a surrounding ``` fence if the whole document is wrapped in one.
pub fn strip_code_fence(data: &str) -> &str {
    let data = data.trim();
    if !(data.starts_with("```") && data.ends_with("```")) || data.len() < 6 {
        return data;
    }
    let body = match data.split_once('\n') {
        Some((_, rest)) => rest,
        None => return data,
    };
    match body.rfind('\n') {
        Some(end) => &body[..end],
        None => "",
    }
}

/// Map one raw record to a `Card`.
pub fn map_card(raw: &RawCard) -> Card {
    let mut rewards: BTreeMap<String, f64> = BTreeMap::new();
    let mut rebates = Vec::new();

    if let Some(rate) = raw.universal_cashback_percent.as_ref().and_then(Value::as_f64) {
        rewards.insert("other".to_string(), rate);
    }

    for credit in &raw.credits {
        let description = credit
            .description
            .clone()
            .filter(|d| !d.trim().is_empty())
            .unwrap_or_else(|| "Statement Credit".to_string());
        rebates.push(Rebate::flat(credit.value.unwrap_or(0.0), description));
    }

    let name = raw.name.to_lowercase();
    let issuer = raw.issuer.to_lowercase();

    if name.contains("sapphire") {
        rewards.insert("flights_portal".to_string(), 3.0);
        rewards.insert("dining".to_string(), 3.0);
    }
    if name.contains("gold") {
        rewards.insert("restaurants".to_string(), 4.0);
        rewards.insert("supermarkets".to_string(), 4.0);
        rewards.insert("flights_portal".to_string(), 3.0);
    }
    if name.contains("venture") {
        rewards.insert("flights_portal".to_string(), 5.0);
        rewards.insert("hotels_portal".to_string(), 10.0);
    }
    if issuer.contains("capital_one") {
        rewards.entry("other".to_string()).or_insert(1.0);
    }

    let offer = raw
        .offers
        .as_deref()
        .and_then(<[RawOffer]>::first)
        .and_then(RawOffer::first_amount)
        .filter(|a| *a > 0.0 && *a <= MAX_OFFER_AS_CREDIT);
    if let Some(amount) = offer {
        rebates.push(Rebate::flat(amount, "Signup/Offer"));
    }

    Card {
        issuer: raw.issuer.clone(),
        name: raw.name.clone(),
        annual_fee: raw.annual_fee.unwrap_or(0.0),
        point_value: DEFAULT_POINT_VALUE,
        rewards,
        rebates,
    }
}

/// Parse a raw catalog document (optionally fenced) into engine cards.
pub fn convert_catalog(raw_json: &str) -> Result<Vec<Card>> {
    let raw: Vec<RawCard> =
        serde_json::from_str(strip_code_fence(raw_json)).context("parse raw issuer catalog")?;
    Ok(raw.iter().map(map_card).collect())
}

/// Convert `input` and write the engine catalog to `output` as pretty JSON.
pub fn convert_catalog_file(input: impl AsRef<Path>, output: impl AsRef<Path>) -> Result<usize> {
    let (input, output) = (input.as_ref(), output.as_ref());
    let s = fs::read_to_string(input).with_context(|| format!("read {}", input.display()))?;
    let cards = convert_catalog(&s).with_context(|| format!("convert {}", input.display()))?;
    let json = serde_json::to_string_pretty(&cards).context("serialize catalog")?;
    fs::write(output, json).with_context(|| format!("write {}", output.display()))?;
    tracing::info!(cards = cards.len(), output = %output.display(), "wrote converted catalog");
    Ok(cards.len())
}
