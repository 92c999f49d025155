//! yprice CLI library.
//!
//! This library provides the pieces of the `yprice` command-line tool:
//! argument parsing, configuration loading, and run wiring.

pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod output;

pub use cli::{Cli, SummaryFormat};
pub use config::AppConfig;
pub use error::{CliError, Result};
pub use output::render_summary;
