//! Derive a spending profile from a card statement export.
//!
//! AMEX CSVs have 6 blank rows, then:
//! Date,Description,Amount,Extended Details,Appears On Your Statement As,
//! Address,City/State,Zip Code,Country,Reference,Category
//!
//! Positive amounts are charges; negative amounts are payments and refunds and
//! do not count as spend.

use anyhow::{Context, Result};
use cardwise_core::Category;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Shortest window a statement is assumed to cover when annualizing.
const MIN_COVERED_DAYS: i64 = 30;

/// A charge or credit parsed from a statement export.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatementTransaction {
    pub date: NaiveDate,
    pub description: String,
    pub amount: f64,
    /// Issuer category, e.g. "Restaurant-Restaurant".
    pub issuer_category: String,
}

impl StatementTransaction {
    pub fn is_charge(&self) -> bool {
        self.amount > 0.0
    }
}

/// Parse a statement CSV, skipping the preamble up to the `Date` header.
pub fn parse_statement_csv(path: impl AsRef<Path>) -> Result<Vec<StatementTransaction>> {
    let path = path.as_ref();
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(false)
        .from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;

    let mut txns = Vec::new();
    let mut header_found = false;

    for result in rdr.records() {
        let record = result.with_context(|| format!("reading {}", path.display()))?;
        if !header_found {
            if record.get(0).map(|s| s.trim()) == Some("Date") {
                header_found = true;
            }
            continue;
        }

        let date_str = record.get(0).unwrap_or("").trim();
        if date_str.is_empty() {
            continue;
        }
        let Ok(date) = NaiveDate::parse_from_str(date_str, "%m/%d/%Y") else {
            tracing::debug!(row = date_str, "skipping row with unparseable date");
            continue;
        };

        let raw_amount = record.get(2).unwrap_or("").trim();
        let Ok(amount) = raw_amount.replace(',', "").parse::<f64>() else {
            tracing::debug!(row = date_str, amount = raw_amount, "skipping row with unparseable amount");
            continue;
        };

        txns.push(StatementTransaction {
            date,
            description: record.get(1).unwrap_or("").trim().to_string(),
            amount,
            issuer_category: record.get(10).unwrap_or("").trim().to_string(),
        });
    }

    Ok(txns)
}

/// Map a transaction to a canonical spending category.
/// Priority: description keywords > issuer category > other.
pub fn classify(txn: &StatementTransaction) -> Category {
    let desc = txn.description.to_uppercase();
    let cat = &txn.issuer_category;
    let any = |needles: &[&str]| needles.iter().any(|n| desc.contains(n));

    // Food delivery before rideshare: "UBER EATS" contains "UBER".
    if any(&["UBER EATS", "DOORDASH", "GRUBHUB"]) {
        return Category::Dining;
    }
    if any(&["WHOLE FOODS", "TRADER JOE", "SAFEWAY", "KROGER", "INSTACART", "H-E-B"]) {
        return Category::Groceries;
    }
    if any(&["MARRIOTT", "HILTON", "HYATT", "AIRBNB", "HOTEL"]) {
        return Category::Hotel;
    }
    if any(&["DELTA AIR", "UNITED AIRLINES", "AMERICAN AIRLINES", "SOUTHWEST", "EXPEDIA", "TRAVEL PORTAL"]) {
        return Category::FlightsPortal;
    }
    if any(&["SHELL", "CHEVRON", "EXXON", "UBER", "LYFT", "CLIPPER"]) {
        return Category::Gas;
    }
    if any(&["AMAZON", "AMZN", "EBAY", "ETSY"]) {
        return Category::OnlineShopping;
    }

    if cat.contains("Restaurant") || cat.contains("Bar & Café") {
        return Category::Dining;
    }
    if cat.contains("Groceries") || cat.contains("Wholesale Stores") || cat.contains("Supermarkets") {
        return Category::Groceries;
    }
    if cat.contains("Lodging") {
        return Category::Hotel;
    }
    if cat.contains("Airline") || cat.contains("Travel Agencies") {
        return Category::FlightsPortal;
    }
    if cat.contains("Fuel") || cat.contains("Taxis") || cat.contains("Rail")
        || cat.contains("Parking") || cat.contains("Government Services")
    {
        return Category::Gas;
    }
    if cat.contains("Internet Purchase") {
        return Category::OnlineShopping;
    }

    Category::Other
}

/// Sum charges per category and scale them to a year.
///
/// The scale factor is 365 / days covered (first to last transaction,
/// inclusive), with at least one month assumed.
pub fn annualized_spending(txns: &[StatementTransaction]) -> BTreeMap<Category, f64> {
    let charges: Vec<&StatementTransaction> = txns.iter().filter(|t| t.is_charge()).collect();
    let (Some(first), Some(last)) = (
        charges.iter().map(|t| t.date).min(),
        charges.iter().map(|t| t.date).max(),
    ) else {
        return BTreeMap::new();
    };

    let days = ((last - first).num_days() + 1).max(MIN_COVERED_DAYS);
    let scale = 365.0 / days as f64;

    let mut totals: BTreeMap<Category, f64> = BTreeMap::new();
    for t in &charges {
        *totals.entry(classify(t)).or_insert(0.0) += t.amount;
    }
    for v in totals.values_mut() {
        *v *= scale;
    }
    totals
}
