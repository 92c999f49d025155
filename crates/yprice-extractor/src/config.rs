//! Configuration for the lookups
//!
//! The defaults describe nikkei.com. Every URL piece and selector can be
//! overridden so the scraper can follow markup changes or point at a mirror.

use crate::error::ScrapeError;
use serde::{Deserialize, Serialize};
use url::Url;

/// Where to look things up and how to read the pages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScraperConfig {
    /// Scheme and host of the services
    pub base_url: String,

    /// Path of the company search endpoint
    pub search_path: String,

    /// Query parameter carrying the search text
    pub search_param: String,

    /// Path of the yearly price history page
    pub history_path: String,

    /// Query parameter carrying the stock code (in redirects, links and history URLs)
    pub code_param: String,

    /// Selector for the display-name links in a search result listing
    pub listing_selector: String,

    /// Selector for section headlines on the history page
    pub headline_selector: String,

    /// Selector for the text element inside a headline
    pub headline_text_selector: String,

    /// Headline text of the yearly table section
    pub section_label: String,

    /// First-cell text identifying the table's header row
    pub header_label: String,

    /// Suffix following the year number in the first cell (e.g. `2019年`)
    pub year_suffix: String,

    /// 1-based child position of the closing price cell within a row
    pub price_column: usize,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.nikkei.com".to_string(),
            search_path: "/nkd/search".to_string(),
            search_param: "searchKeyword".to_string(),
            history_path: "/nkd/company/history/yprice".to_string(),
            code_param: "scode".to_string(),
            listing_selector: ".m-companyList_item_data_name".to_string(),
            headline_selector: ".m-headline".to_string(),
            headline_text_selector: ".m-headline_text".to_string(),
            section_label: "年間高安（過去10年）".to_string(),
            header_label: "年".to_string(),
            year_suffix: "年".to_string(),
            price_column: 5,
        }
    }
}

impl ScraperConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        Url::parse(&self.base_url).map_err(|e| format!("base_url is not a valid URL: {}", e))?;
        if self.search_param.is_empty() {
            return Err("search_param must not be empty".to_string());
        }
        if self.code_param.is_empty() {
            return Err("code_param must not be empty".to_string());
        }
        if self.section_label.trim().is_empty() {
            return Err("section_label must not be empty".to_string());
        }
        if self.price_column == 0 {
            return Err("price_column is 1-based and must be greater than 0".to_string());
        }
        Ok(())
    }

    /// URL of the company search for `name`
    pub fn search_url(&self, name: &str) -> Result<Url, ScrapeError> {
        let mut url = self.endpoint(&self.search_path)?;
        url.query_pairs_mut().append_pair(&self.search_param, name);
        Ok(url)
    }

    /// URL of the yearly price history for `code`
    pub fn history_url(&self, code: &str) -> Result<Url, ScrapeError> {
        let mut url = self.endpoint(&self.history_path)?;
        url.query_pairs_mut().append_pair(&self.code_param, code);
        Ok(url)
    }

    fn endpoint(&self, path: &str) -> Result<Url, ScrapeError> {
        let joined = format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        Ok(Url::parse(&joined)?)
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}
