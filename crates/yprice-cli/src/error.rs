//! Error types for the CLI application.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// The run failed
    #[error(transparent)]
    Pipeline(#[from] yprice_pipeline::PipelineError),

    /// Lookup setup failed
    #[error(transparent)]
    Scrape(#[from] yprice_extractor::ScrapeError),

    /// HTTP client setup failed
    #[error(transparent)]
    Fetch(#[from] yprice_http::FetchError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
}
