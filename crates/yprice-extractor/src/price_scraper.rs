//! One record in, one result out

use crate::config::ScraperConfig;
use crate::error::ScrapeError;
use crate::history::HistoryExtractor;
use crate::resolver::Resolver;
use crate::selectors::Selectors;
use std::sync::Arc;
use tracing::{debug, info, warn};
use yprice_domain::{Record, ScrapeResult};
use yprice_http::{CancelToken, PageFetcher};

/// Runs name resolution and history extraction for a record
///
/// Both lookups share one fetcher and one compiled set of selectors, so a
/// `PriceScraper` is built once per run and shared by every task.
pub struct PriceScraper<F>
where
    F: PageFetcher,
{
    resolver: Resolver<F>,
    history: HistoryExtractor<F>,
}

impl<F> PriceScraper<F>
where
    F: PageFetcher,
{
    /// Create a new PriceScraper
    ///
    /// Fails with [`ScrapeError::Config`] when `config` does not validate or a
    /// selector does not compile.
    pub fn new(fetcher: F, config: ScraperConfig) -> Result<Self, ScrapeError> {
        config.validate().map_err(ScrapeError::Config)?;
        let selectors = Arc::new(Selectors::compile(&config)?);
        let config = Arc::new(config);
        let fetcher = Arc::new(fetcher);

        Ok(Self {
            resolver: Resolver::new(fetcher.clone(), config.clone(), selectors.clone()),
            history: HistoryExtractor::new(fetcher, config, selectors),
        })
    }

    /// Scrape the stock code and yearly prices for `record`
    ///
    /// An unmatched name is not an error: the result keeps an empty code and
    /// all-default prices, and no history request is made.
    pub async fn scrape(
        &self,
        record: Record,
        cancel: &CancelToken,
    ) -> Result<ScrapeResult, ScrapeError> {
        info!("{}: {}", record.index(), record.name());

        let code = self.resolver.resolve(record.name(), cancel).await?;
        let result = ScrapeResult::new(record);

        if code.is_unresolved() {
            warn!("No company found for {:?}", result.name);
            return Ok(result);
        }

        let prices = self.history.extract(&code, cancel).await?;
        debug!(
            "{} ({}): {} of the yearly prices filled",
            result.name,
            code,
            prices.filled()
        );
        Ok(result.with_code(code).with_prices(prices))
    }
}
