//! Stock code → yearly closing prices

use crate::config::ScraperConfig;
use crate::error::ScrapeError;
use crate::price::{parse_price, parse_year_label};
use crate::selectors::Selectors;
use scraper::{ElementRef, Html};
use std::sync::Arc;
use tracing::{debug, warn};
use yprice_domain::{StockCode, YearlyValues};
use yprice_http::{CancelToken, PageFetcher};

/// Fetches the yearly price history page and reads its table
pub struct HistoryExtractor<F> {
    fetcher: Arc<F>,
    config: Arc<ScraperConfig>,
    selectors: Arc<Selectors>,
}

impl<F: PageFetcher> HistoryExtractor<F> {
    pub(crate) fn new(
        fetcher: Arc<F>,
        config: Arc<ScraperConfig>,
        selectors: Arc<Selectors>,
    ) -> Self {
        Self {
            fetcher,
            config,
            selectors,
        }
    }

    /// Extract one closing price per supported year for `code`
    ///
    /// A page without the yearly section yields all-default values.
    ///
    /// # Errors
    ///
    /// - [`ScrapeError::UpstreamStatus`] for a non-2xx history response
    /// - [`ScrapeError::Transport`] when the request fails
    /// - [`ScrapeError::Cancelled`] when `cancel` fires first
    pub async fn extract(
        &self,
        code: &StockCode,
        cancel: &CancelToken,
    ) -> Result<YearlyValues, ScrapeError> {
        let url = self.config.history_url(code.as_str())?;
        let page = self.fetcher.fetch(url.as_str(), cancel).await?;

        if !page.is_success() {
            return Err(ScrapeError::UpstreamStatus {
                status: page.status,
                url: url.to_string(),
            });
        }

        Ok(parse_history(&page.body, &self.selectors, &self.config))
    }
}

/// Read the yearly table out of a history page
pub(crate) fn parse_history(
    html: &str,
    selectors: &Selectors,
    config: &ScraperConfig,
) -> YearlyValues {
    let document = Html::parse_document(html);
    let mut values = YearlyValues::new();
    let mut sections = 0;

    for headline in document.select(&selectors.headline) {
        let label: String = headline
            .select(&selectors.headline_text)
            .flat_map(|e| e.text())
            .collect();
        if label.trim() != config.section_label {
            continue;
        }
        sections += 1;

        // The table is the element right after the headline
        let Some(table) = headline.next_siblings().find_map(ElementRef::wrap) else {
            continue;
        };
        for row in table.select(&selectors.row) {
            read_row(row, selectors, config, &mut values);
        }
    }

    if sections == 0 {
        debug!("Section {:?} not found; using default values", config.section_label);
    }
    values
}

fn read_row(
    row: ElementRef<'_>,
    selectors: &Selectors,
    config: &ScraperConfig,
    values: &mut YearlyValues,
) {
    let label = cell_text(row, &selectors.row_label);
    if label == config.header_label {
        return;
    }
    let Some(year) = parse_year_label(&label, &config.year_suffix) else {
        debug!("Ignoring row with year label {:?}", label);
        return;
    };

    let raw = cell_text(row, &selectors.price_cell);
    match parse_price(&raw) {
        Ok(price) => {
            if let Err(e) = values.set(year, price) {
                warn!("Could not record closing price for {}: {}", year, e);
            }
        }
        Err(e) => warn!("Closing price for {} could not be read: {}", year, e),
    }
}

/// Trimmed text of the first element under `row` matching `selector`
fn cell_text(row: ElementRef<'_>, selector: &scraper::Selector) -> String {
    row.select(selector)
        .next()
        .map(|cell| cell.text().collect::<String>().trim().to_string())
        .unwrap_or_default()
}
