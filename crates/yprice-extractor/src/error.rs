//! Error types for lookups

use thiserror::Error;
use yprice_http::FetchError;

/// Errors that can occur while resolving or extracting
///
/// "No matching company" and "unparseable price" are not errors: they leave
/// the result at its defaults.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScrapeError {
    /// The service answered with a non-2xx status
    #[error("Upstream returned HTTP {status} for {url}")]
    UpstreamStatus {
        /// HTTP status code
        status: u16,
        /// URL that was requested
        url: String,
    },

    /// Network failure while talking to the service
    #[error("Transport error: {0}")]
    Transport(String),

    /// The run was cancelled mid-lookup
    #[error("Lookup cancelled")]
    Cancelled,

    /// Configuration error (bad URL, bad selector)
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ScrapeError {
    /// Whether this error is only a consequence of another task's failure
    pub fn is_cancellation(&self) -> bool {
        matches!(self, ScrapeError::Cancelled)
    }
}

impl From<FetchError> for ScrapeError {
    fn from(e: FetchError) -> Self {
        match e {
            FetchError::Cancelled => ScrapeError::Cancelled,
            FetchError::Transport(msg) | FetchError::Client(msg) => ScrapeError::Transport(msg),
        }
    }
}

impl From<url::ParseError> for ScrapeError {
    fn from(e: url::ParseError) -> Self {
        ScrapeError::Config(format!("Invalid URL: {}", e))
    }
}

/// A price cell that could not be read as a number
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unparseable price: {0:?}")]
pub struct PriceError(pub String);
