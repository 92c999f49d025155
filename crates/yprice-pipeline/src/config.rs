//! Configuration for a pipeline run

use serde::{Deserialize, Serialize};

/// Default number of records looked up at the same time
pub const DEFAULT_CONCURRENCY: usize = 5;

/// Default number of leading input rows treated as headers
pub const DEFAULT_HEADER_SKIP: usize = 1;

/// Controls how records are fed through the lookups
///
/// # Examples
///
/// ```
/// use yprice_pipeline::PipelineConfig;
///
/// let config = PipelineConfig::default();
/// assert_eq!(config.concurrency, 5);
/// assert_eq!(config.header_skip, 1);
///
/// let serial = PipelineConfig::default().with_concurrency(1);
/// assert!(serial.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Maximum number of records in flight
    /// Default: 5
    pub concurrency: usize,

    /// Leading input rows skipped before numbering starts
    /// Default: 1
    pub header_skip: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            header_skip: DEFAULT_HEADER_SKIP,
        }
    }
}

impl PipelineConfig {
    /// Set the concurrency limit
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Set the header skip count
    pub fn with_header_skip(mut self, header_skip: usize) -> Self {
        self.header_skip = header_skip;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.concurrency == 0 {
            return Err("concurrency must be greater than 0".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_concurrency_is_invalid() {
        let config = PipelineConfig::default().with_concurrency(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_header_skip_is_valid() {
        let config = PipelineConfig::default().with_header_skip(0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_fields_keep_defaults() {
        let config: PipelineConfig = serde_json::from_str(r#"{"concurrency": 2}"#).unwrap();
        assert_eq!(config.concurrency, 2);
        assert_eq!(config.header_skip, DEFAULT_HEADER_SKIP);
    }
}
