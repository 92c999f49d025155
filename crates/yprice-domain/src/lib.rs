//! yprice Domain Layer
//!
//! Core value types shared by every other crate in the workspace. Like any
//! domain layer this crate has no external dependencies: it only describes what
//! a scrape run consumes and produces.
//!
//! ## Key Concepts
//!
//! - **Record**: one input row (index + entity name) after header rows are skipped
//! - **StockCode**: the catalog identifier an entity resolves to (possibly empty)
//! - **Year / YearlyValues**: the closed set of supported years and one value per year
//! - **ScrapeResult**: everything known about one record, ready for the sink
//!
//! ## Supported years
//!
//! The output schema reserves exactly one column per year in
//! [`FIRST_YEAR`]..=[`LAST_YEAR`]. Years outside that range are never stored.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod record;
pub mod result;
pub mod year;

// Re-exports for convenience
pub use record::Record;
pub use result::{ScrapeResult, StockCode};
pub use year::{Year, YearlyValues, FIRST_YEAR, LAST_YEAR, YEAR_COUNT};
