//! The closed set of supported years and the per-year value table

use std::fmt;

/// First year the output schema reserves a column for
pub const FIRST_YEAR: u16 = 2013;

/// Number of supported years
pub const YEAR_COUNT: usize = 10;

/// Last year the output schema reserves a column for
pub const LAST_YEAR: u16 = FIRST_YEAR + YEAR_COUNT as u16 - 1;

/// A year inside the supported range
///
/// # Examples
///
/// ```
/// use yprice_domain::{Year, FIRST_YEAR, LAST_YEAR};
///
/// assert!(Year::new(FIRST_YEAR).is_some());
/// assert!(Year::new(LAST_YEAR + 1).is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Year(u16);

impl Year {
    /// Create a year, returning `None` outside the supported range
    pub fn new(year: u16) -> Option<Self> {
        (FIRST_YEAR..=LAST_YEAR).contains(&year).then_some(Self(year))
    }

    /// The calendar year
    pub fn value(&self) -> u16 {
        self.0
    }

    /// All supported years in ascending order
    pub fn all() -> impl Iterator<Item = Year> {
        (FIRST_YEAR..=LAST_YEAR).map(Year)
    }

    fn slot(&self) -> usize {
        usize::from(self.0 - FIRST_YEAR)
    }
}

impl fmt::Display for Year {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One value per supported year, defaulting to zero
///
/// The table always has exactly [`YEAR_COUNT`] slots so every result serializes
/// to the same column layout, whether or not any value was found.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct YearlyValues([f64; YEAR_COUNT]);

impl YearlyValues {
    /// Create a table with every year at its default of `0.0`
    pub fn new() -> Self {
        Self::default()
    }

    /// Value for a year
    pub fn get(&self, year: Year) -> f64 {
        self.0[year.slot()]
    }

    /// Set the value for a year
    ///
    /// Values must be finite and non-negative.
    pub fn set(&mut self, year: Year, value: f64) -> Result<(), String> {
        if !value.is_finite() || value < 0.0 {
            return Err(format!("value {} for {} is not a non-negative number", value, year));
        }
        self.0[year.slot()] = value;
        Ok(())
    }

    /// Iterate `(year, value)` pairs in ascending year order
    pub fn iter(&self) -> impl Iterator<Item = (Year, f64)> + '_ {
        Year::all().zip(self.0.iter().copied())
    }

    /// Whether every year still holds the default value
    pub fn is_all_default(&self) -> bool {
        self.0.iter().all(|v| *v == 0.0)
    }

    /// Number of years holding a non-default value
    pub fn filled(&self) -> usize {
        self.0.iter().filter(|v| **v != 0.0).count()
    }
}
