//! Errors the engine surfaces to callers.
//!
//! Everything else (missing reward keys, missing toggles, unmapped rebate
//! categories) falls back silently to a documented default.

use crate::category::Category;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EngineError {
    #[error("spending for {category} must be a non-negative number, got {value}")]
    InvalidSpending { category: Category, value: f64 },
    #[error("spending for {category} is not a number: '{raw}'")]
    UnparseableSpending { category: String, raw: String },
    #[error("max_portfolio_size must be at least 1 when the catalog has cards")]
    InvalidPortfolioSize,
    #[error("max_cards_to_consider must be at least 1 when the catalog has cards (use no limit to disable prefiltering)")]
    InvalidCandidateLimit,
    #[error("card catalog is empty; no portfolio can be formed")]
    EmptyCatalog,
}
