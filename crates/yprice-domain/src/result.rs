//! Scrape results and resolved identifiers

use crate::{Record, YearlyValues};
use std::fmt;

/// Catalog identifier an entity name resolved to
///
/// An empty code means no matching entity was found. That is a normal
/// terminal state for a record, not an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct StockCode(String);

impl StockCode {
    /// Create a code from text
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// The "no match" code
    pub fn unresolved() -> Self {
        Self::default()
    }

    /// Whether no entity was matched
    pub fn is_unresolved(&self) -> bool {
        self.0.is_empty()
    }

    /// The code as text (empty when unresolved)
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StockCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Everything known about one record once its lookups finish
///
/// Built incrementally: name and index come from the [`Record`], the code
/// from resolution, the prices from history extraction.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrapeResult {
    /// Entity name from the input
    pub name: String,

    /// Position of the record in the input (after the header skip)
    pub index: usize,

    /// Resolved identifier, empty when unmatched
    pub code: StockCode,

    /// One value per supported year
    pub prices: YearlyValues,
}

impl ScrapeResult {
    /// Start a result for a record with no code and default prices
    pub fn new(record: Record) -> Self {
        let (index, name) = record.into_parts();
        Self {
            name,
            index,
            code: StockCode::unresolved(),
            prices: YearlyValues::new(),
        }
    }

    /// Attach the resolved code
    pub fn with_code(mut self, code: StockCode) -> Self {
        self.code = code;
        self
    }

    /// Attach the extracted prices
    pub fn with_prices(mut self, prices: YearlyValues) -> Self {
        self.prices = prices;
        self
    }
}
