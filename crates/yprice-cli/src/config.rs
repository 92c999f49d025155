//! Configuration file handling.
//!
//! Settings come from three layers, later ones winning: built-in defaults,
//! the TOML file, then command-line flags.

use crate::cli::Cli;
use crate::error::{CliError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use yprice_extractor::ScraperConfig;
use yprice_http::HttpConfig;
use yprice_pipeline::PipelineConfig;

/// Application configuration.
///
/// ```toml
/// [scraper]
/// base_url = "https://www.nikkei.com"
///
/// [pipeline]
/// concurrency = 5
/// header_skip = 1
///
/// [http]
/// timeout_secs = 30
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Where and how to look companies up
    #[serde(default)]
    pub scraper: ScraperConfig,

    /// Run settings
    #[serde(default)]
    pub pipeline: PipelineConfig,

    /// HTTP client settings
    #[serde(default)]
    pub http: HttpConfig,
}

impl AppConfig {
    /// Get the default configuration file path.
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".yprice").join("config.toml"))
    }

    /// Load configuration.
    ///
    /// An explicit path must exist. Without one, the default path is used if
    /// a file is there, and built-in defaults otherwise.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => {
                if !path.exists() {
                    return Err(CliError::Config(format!(
                        "Config file not found: {}",
                        path.display()
                    )));
                }
                Self::from_file(path)
            }
            None => {
                let path = Self::default_path()?;
                if path.exists() {
                    Self::from_file(&path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Parse configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from {}", path.display());
        let contents = fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Apply command-line overrides.
    pub fn apply(&mut self, cli: &Cli) {
        if let Some(header) = cli.header {
            self.pipeline.header_skip = header;
        }
        if let Some(concurrency) = cli.concurrency {
            self.pipeline.concurrency = usize::try_from(concurrency).unwrap_or(usize::MAX);
        }
        if let Some(base_url) = &cli.base_url {
            self.scraper.base_url = base_url.clone();
        }
    }

    /// Validate every section.
    pub fn validate(&self) -> Result<()> {
        self.scraper
            .validate()
            .map_err(|e| CliError::Config(format!("[scraper] {}", e)))?;
        self.pipeline
            .validate()
            .map_err(|e| CliError::Config(format!("[pipeline] {}", e)))?;
        self.http
            .validate()
            .map_err(|e| CliError::Config(format!("[http] {}", e)))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn config_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    fn cli(args: &[&str]) -> Cli {
        let mut full = vec!["yprice", "-i", "in.csv", "-o", "out.csv"];
        full.extend_from_slice(args);
        Cli::try_parse_from(full).unwrap()
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.pipeline.concurrency, 5);
        assert_eq!(config.pipeline.header_skip, 1);
        assert_eq!(config.scraper.base_url, "https://www.nikkei.com");
        assert!(config.http.timeout_secs.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let file = config_file("[pipeline]\nconcurrency = 2\n\n[http]\ntimeout_secs = 30\n");
        let config = AppConfig::load(Some(file.path())).unwrap();

        assert_eq!(config.pipeline.concurrency, 2);
        assert_eq!(config.pipeline.header_skip, 1);
        assert_eq!(config.http.timeout_secs, Some(30));
        assert_eq!(config.scraper, ScraperConfig::default());
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let result = AppConfig::load(Some(&dir.path().join("nope.toml")));
        assert!(matches!(result, Err(CliError::Config(_))));
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        let file = config_file("[pipeline\nconcurrency = ");
        assert!(matches!(
            AppConfig::load(Some(file.path())),
            Err(CliError::Toml(_))
        ));
    }

    #[test]
    fn test_flags_override_file() {
        let file = config_file(
            "[scraper]\nbase_url = \"https://mirror.test\"\n\n[pipeline]\nconcurrency = 2\nheader_skip = 3\n",
        );
        let mut config = AppConfig::load(Some(file.path())).unwrap();
        config.apply(&cli(&["--concurrency", "9", "--base-url", "http://localhost:1"]));

        assert_eq!(config.pipeline.concurrency, 9);
        assert_eq!(config.pipeline.header_skip, 3);
        assert_eq!(config.scraper.base_url, "http://localhost:1");
    }

    #[test]
    fn test_validation_names_section() {
        let mut config = AppConfig::default();
        config.pipeline.concurrency = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("[pipeline]"));
    }
}
