//! Input records

use std::fmt;

/// One logical input row after header rows have been skipped
///
/// `index` counts records from zero starting at the first row after the
/// header skip, independent of the order in which records finish processing.
///
/// # Examples
///
/// ```
/// use yprice_domain::Record;
///
/// let record = Record::new(0, "トヨタ自動車").unwrap();
/// assert_eq!(record.index(), 0);
/// assert_eq!(record.name(), "トヨタ自動車");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    index: usize,
    name: String,
}

impl Record {
    /// Create a record, rejecting an empty entity name
    pub fn new(index: usize, name: impl Into<String>) -> Result<Self, String> {
        let name = name.into();
        if name.is_empty() {
            return Err(format!("record {} has an empty entity name", index));
        }
        Ok(Self { index, name })
    }

    /// Position of the record in the input, after the header skip
    pub fn index(&self) -> usize {
        self.index
    }

    /// Entity name as read from the first column
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Consume the record, returning its parts
    pub fn into_parts(self) -> (usize, String) {
        (self.index, self.name)
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.index, self.name)
    }
}
