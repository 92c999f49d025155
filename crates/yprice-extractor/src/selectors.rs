//! Compiled CSS selectors

use crate::config::ScraperConfig;
use crate::error::ScrapeError;
use scraper::Selector;

/// Selectors compiled once from [`ScraperConfig`] and shared by every lookup
#[derive(Debug)]
pub(crate) struct Selectors {
    pub listing: Selector,
    pub headline: Selector,
    pub headline_text: Selector,
    pub row: Selector,
    pub row_label: Selector,
    pub price_cell: Selector,
}

impl Selectors {
    pub fn compile(config: &ScraperConfig) -> Result<Self, ScrapeError> {
        Ok(Self {
            listing: compile(&config.listing_selector)?,
            headline: compile(&config.headline_selector)?,
            headline_text: compile(&config.headline_text_selector)?,
            row: compile("tr")?,
            row_label: compile("th")?,
            price_cell: compile(&format!("td:nth-child({})", config.price_column))?,
        })
    }
}

fn compile(selector: &str) -> Result<Selector, ScrapeError> {
    Selector::parse(selector)
        .map_err(|e| ScrapeError::Config(format!("Invalid selector {:?}: {:?}", selector, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_selectors_compile() {
        assert!(Selectors::compile(&ScraperConfig::default()).is_ok());
    }

    #[test]
    fn test_bad_selector_is_config_error() {
        let config = ScraperConfig {
            listing_selector: "[[".to_string(),
            ..ScraperConfig::default()
        };
        assert!(matches!(
            Selectors::compile(&config),
            Err(ScrapeError::Config(_))
        ));
    }
}
