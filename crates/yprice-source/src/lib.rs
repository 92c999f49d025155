//! yprice Source
//!
//! Turns an input file of entity names into a lazy sequence of [`Record`]s.
//!
//! # Overview
//!
//! ```text
//! path → load() → RawDocument → decode() → text → parse() → Record, Record, ...
//! ```
//!
//! The input may be in any encoding. The whole file is read once, its charset
//! is detected statistically (a byte-order mark wins over statistics), and it
//! is decoded fully before any record is produced.
//!
//! # Example Usage
//!
//! ```no_run
//! use yprice_source::{parse, read_text};
//!
//! # fn example() -> Result<(), yprice_source::SourceError> {
//! let text = read_text("companies.csv", None)?;
//! for record in parse(&text, 1) {
//!     let record = record?;
//!     println!("{}: {}", record.index(), record.name());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! [`Record`]: yprice_domain::Record

#![warn(missing_docs)]

mod error;
mod reader;
mod records;

pub use error::SourceError;
pub use reader::{load, load_with_encoding, read_text, RawDocument};
pub use records::{parse, RecordIter};
