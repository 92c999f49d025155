//! Wiring a run together from parsed arguments.

use crate::cli::Cli;
use crate::config::AppConfig;
use crate::error::Result;
use tracing::{info, warn};
use yprice_extractor::PriceScraper;
use yprice_http::{CancelToken, ReqwestFetcher};
use yprice_pipeline::{Pipeline, RunMetrics};

/// Resolve the effective configuration for `cli`.
pub fn resolve_config(cli: &Cli) -> Result<AppConfig> {
    let mut config = AppConfig::load(cli.config.as_deref())?;
    config.apply(cli);
    config.validate()?;
    Ok(config)
}

/// Execute one run.
///
/// Ctrl-C cancels the run the same way a fatal error does: no new companies
/// are started and the ones in flight are abandoned.
pub async fn run(cli: &Cli) -> Result<RunMetrics> {
    let config = resolve_config(cli)?;

    let fetcher = ReqwestFetcher::new(&config.http)?;
    let scraper = PriceScraper::new(fetcher, config.scraper)?;
    let pipeline = Pipeline::new(scraper, config.pipeline)?;

    let cancel = CancelToken::new();
    let interrupt = tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupted, stopping");
                cancel.cancel();
            }
        }
    });

    info!(
        "Reading {} and writing {}",
        cli.input.display(),
        cli.output.display()
    );
    let result = pipeline
        .run_path(&cli.input, cli.encoding.as_deref(), &cli.output, &cancel)
        .await;
    interrupt.abort();

    Ok(result?)
}
