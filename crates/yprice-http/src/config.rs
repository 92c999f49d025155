//! HTTP client settings

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default `User-Agent` header
pub const DEFAULT_USER_AGENT: &str = concat!("yprice/", env!("CARGO_PKG_VERSION"));

/// Settings for [`crate::ReqwestFetcher`]
///
/// No request timeout is applied unless one is configured.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Per-request timeout in seconds
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    /// `User-Agent` sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl HttpConfig {
    /// The configured timeout as a Duration
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.timeout_secs == Some(0) {
            return Err("timeout_secs must be greater than 0".to_string());
        }
        if self.user_agent.trim().is_empty() {
            return Err("user_agent must not be empty".to_string());
        }
        Ok(())
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: None,
            user_agent: default_user_agent(),
        }
    }
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_has_no_timeout() {
        let config = HttpConfig::default();
        assert!(config.timeout().is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_timeout_is_invalid() {
        let config = HttpConfig {
            timeout_secs: Some(0),
            ..HttpConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_timeout_duration() {
        let config = HttpConfig {
            timeout_secs: Some(15),
            ..HttpConfig::default()
        };
        assert_eq!(config.timeout(), Some(Duration::from_secs(15)));
    }
}
