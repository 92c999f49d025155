//! Command-line argument parsing.

use clap::{ArgAction, Parser, ValueEnum};
use std::path::PathBuf;

const LONG_ABOUT: &str = "\
Look up stock codes and yearly closing prices for a list of company names.

The input is a delimited file whose first column holds company names, in any
encoding. Each name is searched for on the catalog site, its stock code is
resolved, and the closing price of every year from 2013 to 2022 is read.

Output rows are written as lookups finish, so they are NOT in input order.
The `index` column carries each row's position in the input.";

/// yprice - Scrape yearly closing prices for a list of companies.
#[derive(Debug, Parser)]
#[command(name = "yprice")]
#[command(version, about, long_about = LONG_ABOUT)]
pub struct Cli {
    /// Input file of company names
    #[arg(short, long)]
    pub input: PathBuf,

    /// Output file for the results
    #[arg(short, long)]
    pub output: PathBuf,

    /// Number of leading header rows to skip [default: 1]
    #[arg(long, value_name = "N")]
    pub header: Option<usize>,

    /// Number of companies looked up at the same time [default: 5]
    #[arg(long, value_name = "K", value_parser = clap::value_parser!(u64).range(1..))]
    pub concurrency: Option<u64>,

    /// Force the input encoding instead of detecting it (e.g. shift_jis)
    #[arg(long, value_name = "LABEL")]
    pub encoding: Option<String>,

    /// Configuration file path [default: ~/.yprice/config.toml]
    #[arg(short, long, env = "YPRICE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Scheme and host of the catalog site
    #[arg(long, env = "YPRICE_BASE_URL")]
    pub base_url: Option<String>,

    /// Print a run summary to stdout when done
    #[arg(long, value_enum)]
    pub summary: Option<SummaryFormat>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

/// Run summary formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SummaryFormat {
    /// Human-readable text
    Text,
    /// JSON object
    Json,
}

impl Cli {
    /// Default log filter for the chosen verbosity
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}
