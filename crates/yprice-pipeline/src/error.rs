//! Error types for a pipeline run

use thiserror::Error;
use yprice_extractor::ScrapeError;
use yprice_source::SourceError;

/// Errors that end a run
///
/// Whichever fatal error a run meets first is the one it returns; errors
/// that tasks hit afterwards because the run was being cancelled are dropped.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The input could not be read or holds a malformed record
    #[error(transparent)]
    Source(#[from] SourceError),

    /// Looking up one record failed
    #[error("Record {index} ({name}): {source}")]
    Scrape {
        /// Index of the record being processed
        index: usize,
        /// Entity name of the record being processed
        name: String,
        /// Underlying lookup error
        #[source]
        source: ScrapeError,
    },

    /// The output could not be written
    #[error("Output error: {0}")]
    Sink(String),

    /// Delimited output error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// The run was cancelled from outside
    #[error("Run cancelled")]
    Cancelled,

    /// A task panicked or was aborted
    #[error("Task error: {0}")]
    Task(String),
}

impl PipelineError {
    /// Whether this error only reflects the run being cancelled
    pub fn is_cancellation(&self) -> bool {
        match self {
            PipelineError::Cancelled => true,
            PipelineError::Scrape { source, .. } => source.is_cancellation(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scrape_error_message() {
        let err = PipelineError::Scrape {
            index: 4,
            name: "三菱商事".to_string(),
            source: ScrapeError::UpstreamStatus {
                status: 503,
                url: "https://mock.test/nkd/search".to_string(),
            },
        };
        let message = err.to_string();
        assert!(message.contains("Record 4 (三菱商事)"));
        assert!(message.contains("503"));
    }

    #[test]
    fn test_cancellation_classification() {
        assert!(PipelineError::Cancelled.is_cancellation());
        assert!(PipelineError::Scrape {
            index: 0,
            name: "x".to_string(),
            source: ScrapeError::Cancelled,
        }
        .is_cancellation());
        assert!(!PipelineError::Sink("disk full".to_string()).is_cancellation());
    }

    #[test]
    fn test_source_error_is_transparent() {
        let err: PipelineError = SourceError::RecordFormat {
            row: 5,
            reason: "expected 2 fields, found 3".to_string(),
        }
        .into();
        assert!(err.to_string().contains("row 5"));
    }
}
