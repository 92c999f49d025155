//! yprice Pipeline
//!
//! Runs every input record through name resolution and price extraction in
//! parallel and collects the results into a delimited output file.
//!
//! # Architecture
//!
//! ```text
//!                ┌──────────── ConcurrencyGate (K permits) ────────────┐
//! RecordIter ──▶ │ task: PriceScraper::scrape ──▶ CsvSink::write (mutex) │
//!                └──────────────────────────────────────────────────────┘
//!                               │ outcome via JoinSet
//!                               ▼
//!                          coordinator ──▶ first fatal error ⇒ cancel + drain
//! ```
//!
//! # Key Properties
//!
//! - **No loss**: without a fatal error, every record yields exactly one row
//! - **Bounded**: never more than `concurrency` records in flight
//! - **Unordered**: rows appear in completion order; the `index` column keeps
//!   input order recoverable
//! - **Whole rows only**: every row is flushed before the next one starts

#![warn(missing_docs)]

mod config;
mod error;
mod gate;
mod metrics;
mod pipeline;
mod sink;

pub use config::{PipelineConfig, DEFAULT_CONCURRENCY, DEFAULT_HEADER_SKIP};
pub use error::PipelineError;
pub use gate::{ConcurrencyGate, GatePermit};
pub use metrics::RunMetrics;
pub use pipeline::Pipeline;
pub use sink::{CsvSink, LEADING_COLUMNS};
