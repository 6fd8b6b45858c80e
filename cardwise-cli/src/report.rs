//! Human and JSON renderings of an evaluation.

use cardwise_core::{Card, Evaluation, Rebate, RebateUsage, SearchConfig, SearchOutcome};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// One row of the rebate table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RebateRow {
    pub card: String,
    pub index: usize,
    pub description: String,
    pub value: String,
    pub is_category: bool,
    /// Toggle state for flat rebates; category rebates are always on.
    pub use_flag: bool,
}

#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    pub generated_at: DateTime<Utc>,
    pub config: Option<&'a SearchConfig>,
    pub portfolio: &'a [String],
    pub evaluation: &'a Evaluation,
    pub candidates_considered: Option<usize>,
    pub portfolios_evaluated: Option<usize>,
    pub elapsed_ms: Option<u128>,
    pub rebates: Vec<RebateRow>,
}

/// Rebate rows for every rebate on every card in the portfolio, in card
/// order then rebate order.
pub fn rebate_rows(cards: &[&Card], evaluation: &Evaluation, usage: &RebateUsage) -> Vec<RebateRow> {
    let mut rows = Vec::new();
    for card in cards {
        let entries = evaluation.ledger.get(&card.name);
        for (index, rebate) in card.rebates.iter().enumerate() {
            let entry = entries.and_then(|es| es.iter().find(|e| e.index == index));
            let value = match (rebate, entry) {
                (Rebate::Category { .. }, Some(e)) => format!("Used ${:.2} of ${:.2}", e.used, e.amount),
                (Rebate::Category { amount, .. }, None) => format!("Used $0.00 of ${:.2}", amount),
                (Rebate::Flat { .. }, Some(e)) => format!("${:.2}", e.used),
                (Rebate::Flat { amount, .. }, None) => format!("${:.2}", amount),
            };
            rows.push(RebateRow {
                card: card.name.clone(),
                index,
                description: rebate.description().to_string(),
                value,
                is_category: rebate.is_category(),
                use_flag: rebate.is_category() || usage.is_used(&card.name, index),
            });
        }
    }
    rows
}

pub fn print_evaluation(portfolio: &[String], evaluation: &Evaluation, rows: &[RebateRow]) {
    println!("{:<18} {:<28} {:>16}", "Category", "Best Card", "Annual Value ($)");
    for a in &evaluation.assignments {
        println!(
            "{:<18} {:<28} {:>16}",
            a.category.label(),
            a.card.as_deref().unwrap_or("None"),
            format!("{:.2}", a.value)
        );
    }

    println!("\nBest Portfolio: {}", portfolio.join(", "));
    println!(
        "Net Value: ${:.2} (Rewards ${:.2} + Rebates ${:.2} - Fees ${:.2})",
        evaluation.net_value, evaluation.total_rewards, evaluation.total_rebates, evaluation.total_fees
    );

    if rows.is_empty() {
        return;
    }
    println!("\n{:<24} {:<4} {:<32} {:<24} {}", "Card", "#", "Rebate", "Value", "Use?");
    for r in rows {
        let flag = match (r.is_category, r.use_flag) {
            (true, _) => "auto",
            (false, true) => "yes",
            (false, false) => "no",
        };
        println!("{:<24} {:<4} {:<32} {:<24} {}", r.card, r.index, r.description, r.value, flag);
    }
}

pub fn print_search(outcome: &SearchOutcome, rows: &[RebateRow]) {
    print_evaluation(&outcome.portfolio, &outcome.evaluation, rows);
    println!(
        "\nSearched {} portfolios over {} candidate cards in {:.2}s",
        outcome.portfolios_evaluated,
        outcome.candidates_considered,
        outcome.elapsed.as_secs_f64()
    );
}
