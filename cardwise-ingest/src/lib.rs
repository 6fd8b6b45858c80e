//! cardwise-ingest: everything that turns files into engine inputs.
//!
//! Catalog loading and raw-catalog conversion, spending parsers, and spending
//! derived from statement exports.

pub mod catalog;
pub mod convert;
pub mod spending;
pub mod statement;

pub use catalog::{load_catalog, parse_catalog, validate_catalog};
pub use convert::{convert_catalog, convert_catalog_file, map_card, RawCard};
pub use spending::{load_spending_csv, parse_amount, parse_assignments, MONTHLY_DEFAULTS};
pub use statement::{annualized_spending, classify, parse_statement_csv, StatementTransaction};
