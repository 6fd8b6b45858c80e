//! Spending input parsers: CLI `key=value` pairs and `category,amount` CSV.
//!
//! Both produce monthly amounts keyed by canonical category; callers
//! annualize with `SpendingProfile::from_monthly`.

use anyhow::{bail, Context, Result};
use cardwise_core::{Category, EngineError};
use regex::Regex;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::LazyLock;

/// Default monthly spend per category.
pub const MONTHLY_DEFAULTS: [(Category, f64); 7] = [
    (Category::Groceries, 500.0),
    (Category::Dining, 400.0),
    (Category::FlightsPortal, 600.0),
    (Category::Hotel, 150.0),
    (Category::Gas, 200.0),
    (Category::OnlineShopping, 300.0),
    (Category::Other, 300.0),
];

static AMOUNT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<sign>-)?\s*\$?\s*(?P<num>\d[\d,]*(?:\.\d+)?|\.\d+)$").expect("amount regex")
});

/// Parse a currency amount such as `400`, `1,200.50` or `$75`.
///
/// Blank input is 0. Text that is not a number and negative amounts are
/// rejected.
pub fn parse_amount(category: Category, raw: &str) -> Result<f64, EngineError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(0.0);
    }

    let unparseable = || EngineError::UnparseableSpending {
        category: category.as_key().to_string(),
        raw: raw.to_string(),
    };

    let caps = AMOUNT_RE.captures(trimmed).ok_or_else(unparseable)?;
    let value: f64 = caps["num"].replace(',', "").parse().map_err(|_| unparseable())?;
    let value = if caps.name("sign").is_some() { -value } else { value };

    if value < 0.0 {
        return Err(EngineError::InvalidSpending { category, value });
    }
    Ok(value)
}

/// Parse `category=amount` pairs. Unknown categories are skipped with a
/// warning; a later pair for the same category overrides an earlier one.
pub fn parse_assignments<S: AsRef<str>>(pairs: &[S]) -> Result<BTreeMap<Category, f64>> {
    let mut out = BTreeMap::new();
    for pair in pairs {
        let pair = pair.as_ref();
        let Some((key, value)) = pair.split_once('=') else {
            bail!("expected category=amount, got '{pair}'");
        };
        let Some(category) = Category::from_key(key.trim()) else {
            tracing::warn!(key = key.trim(), "ignoring unknown spending category");
            continue;
        };
        out.insert(category, parse_amount(category, value)?);
    }
    Ok(out)
}

#[derive(Debug, Deserialize)]
struct SpendingRow {
    category: String,
    amount: String,
}

/// Load a `category,amount` CSV (header row required).
pub fn load_spending_csv(path: impl AsRef<Path>) -> Result<BTreeMap<Category, f64>> {
    let path = path.as_ref();
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;

    let mut out = BTreeMap::new();
    for (line, result) in rdr.deserialize::<SpendingRow>().enumerate() {
        let row = result.with_context(|| format!("{} row {}", path.display(), line + 1))?;
        let Some(category) = Category::from_key(&row.category.to_lowercase()) else {
            tracing::warn!(category = %row.category, "ignoring unknown spending category");
            continue;
        };
        let amount = parse_amount(category, &row.amount)
            .with_context(|| format!("{} row {}", path.display(), line + 1))?;
        out.insert(category, amount);
    }
    Ok(out)
}
