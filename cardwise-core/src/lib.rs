//! cardwise-core: credit card portfolio valuation engine.
//!
//! Pure, synchronous functions over fully materialized inputs. The catalog,
//! spending profile and rebate toggles are passed into every call; nothing is
//! cached between calls.

pub mod card;
pub mod category;
pub mod error;
pub mod evaluator;
pub mod rates;
pub mod rebates;
pub mod scoring;
pub mod search;
pub mod spending;
pub mod usage;

pub use card::{Card, Rebate, DEFAULT_POINT_VALUE};
pub use category::{Category, UnknownCategory};
pub use error::EngineError;
pub use evaluator::{evaluate_portfolio, CategoryAssignment, Evaluation};
pub use rates::{aliases, category_value, reward_rate, BASELINE_MULTIPLIER, FALLBACK_KEY};
pub use rebates::{resolve_rebates, RebateLedger, RebateLedgerEntry, RebateResolution};
pub use scoring::approximate_card_value;
pub use search::{
    find_best_portfolio, flat_rebates_disabled, prefilter, Combinations, SearchConfig,
    SearchOutcome, DEFAULT_MAX_CARDS_TO_CONSIDER, DEFAULT_MAX_PORTFOLIO_SIZE,
};
pub use spending::SpendingProfile;
pub use usage::RebateUsage;
