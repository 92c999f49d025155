//! Error types for input loading and parsing

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading the input file
#[derive(Error, Debug)]
pub enum SourceError {
    /// Input path does not exist
    #[error("Input file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Detected or requested charset has no decoder
    #[error("Unknown input encoding: {0}")]
    EncodingUnknown(String),

    /// A row could not be parsed as a record (row is 1-based)
    #[error("Malformed record at row {row}: {reason}")]
    RecordFormat {
        /// 1-based row number in the input
        row: u64,
        /// What was wrong with the row
        reason: String,
    },

    /// Underlying I/O failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
