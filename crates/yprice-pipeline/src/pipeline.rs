//! Coordinating one run

use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::gate::{ConcurrencyGate, GatePermit};
use crate::metrics::RunMetrics;
use crate::sink::CsvSink;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tokio::task::{JoinError, JoinSet};
use tracing::{debug, error, info};
use yprice_domain::Record;
use yprice_extractor::PriceScraper;
use yprice_http::{CancelToken, PageFetcher};
use yprice_source::{parse, read_text};

/// Outcome of one task: whether the record's name resolved
type TaskOutcome = Result<bool, PipelineError>;

/// Feeds input records through the lookups and into a sink
///
/// One task is spawned per record, bounded by a [`ConcurrencyGate`]. Each task
/// hands its outcome back through the join set; the coordinator alone decides
/// when the run has failed.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use yprice_extractor::{PriceScraper, ScraperConfig};
/// use yprice_http::{CancelToken, HttpConfig, ReqwestFetcher};
/// use yprice_pipeline::{CsvSink, Pipeline, PipelineConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let fetcher = ReqwestFetcher::new(&HttpConfig::default())?;
/// let scraper = PriceScraper::new(fetcher, ScraperConfig::default())?;
/// let pipeline = Pipeline::new(scraper, PipelineConfig::default())?;
///
/// let sink = Arc::new(CsvSink::create("prices.csv")?);
/// let text = "企業名\nトヨタ自動車\n";
/// let metrics = pipeline.run(text, sink, &CancelToken::new()).await?;
/// println!("{}", metrics.summary());
/// # Ok(())
/// # }
/// ```
pub struct Pipeline<F>
where
    F: PageFetcher,
{
    scraper: Arc<PriceScraper<F>>,
    config: PipelineConfig,
}

impl<F> Pipeline<F>
where
    F: PageFetcher + 'static,
{
    /// Create a new Pipeline
    pub fn new(scraper: PriceScraper<F>, config: PipelineConfig) -> Result<Self, PipelineError> {
        config.validate().map_err(PipelineError::Config)?;
        Ok(Self {
            scraper: Arc::new(scraper),
            config,
        })
    }

    /// The run configuration
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Read `input`, process every record, and write the rows to `output`
    ///
    /// The input is read and decoded before the output is created, so a
    /// missing or undecodable input leaves no output file behind.
    pub async fn run_path(
        &self,
        input: impl AsRef<Path>,
        encoding: Option<&str>,
        output: impl AsRef<Path>,
        cancel: &CancelToken,
    ) -> Result<RunMetrics, PipelineError> {
        let text = read_text(input, encoding)?;
        let sink: Arc<CsvSink<File>> = Arc::new(CsvSink::create(output)?);
        self.run(&text, sink, cancel).await
    }

    /// Process every record in `text`, writing one row per record to `sink`
    ///
    /// Rows land in completion order, not input order. On the first fatal
    /// error (malformed record, upstream status, transport failure, output
    /// failure) `cancel` is fired, no further records are started, the tasks
    /// already running are drained, and that first error is returned. Rows
    /// written before the failure stay written.
    pub async fn run<W>(
        &self,
        text: &str,
        sink: Arc<CsvSink<W>>,
        cancel: &CancelToken,
    ) -> Result<RunMetrics, PipelineError>
    where
        W: Write + Send + 'static,
    {
        let started = Instant::now();
        let gate = ConcurrencyGate::new(self.config.concurrency)?;
        let mut records = parse(text, self.config.header_skip);
        let mut tasks: JoinSet<TaskOutcome> = JoinSet::new();
        let mut metrics = RunMetrics::new();
        let mut failure: Option<PipelineError> = None;

        info!(
            "Starting run (concurrency {}, header rows {})",
            gate.capacity(),
            self.config.header_skip
        );

        while failure.is_none() {
            let record = match records.next() {
                None => break,
                Some(Ok(record)) => record,
                Some(Err(e)) => {
                    error!("{}", e);
                    failure = Some(e.into());
                    break;
                }
            };

            // Reap finished tasks while waiting so a failure stops the feed early
            let permit = loop {
                tokio::select! {
                    biased;
                    Some(joined) = tasks.join_next() => {
                        settle(joined, &mut metrics, &mut failure, cancel);
                        if failure.is_some() {
                            break None;
                        }
                    }
                    acquired = gate.acquire(cancel) => match acquired {
                        Ok(permit) => break Some(permit),
                        Err(e) => {
                            failure.get_or_insert(e);
                            break None;
                        }
                    },
                }
            };
            let Some(permit) = permit else {
                break;
            };

            metrics.record_dispatch();
            tasks.spawn(process(
                self.scraper.clone(),
                sink.clone(),
                record,
                permit,
                cancel.clone(),
            ));
        }

        if failure.is_some() {
            cancel.cancel();
            debug!("Draining {} running tasks", tasks.len());
        }
        while let Some(joined) = tasks.join_next().await {
            settle(joined, &mut metrics, &mut failure, cancel);
        }

        if let Err(e) = sink.finalize() {
            failure.get_or_insert(e);
        }
        metrics.set_elapsed(started.elapsed());

        match failure {
            Some(e) => Err(e),
            None => {
                info!(
                    "Run finished: {} rows written, {} unresolved",
                    metrics.rows_written, metrics.unresolved
                );
                Ok(metrics)
            }
        }
    }
}

/// Look up one record and write its row
async fn process<F, W>(
    scraper: Arc<PriceScraper<F>>,
    sink: Arc<CsvSink<W>>,
    record: Record,
    permit: GatePermit,
    cancel: CancelToken,
) -> TaskOutcome
where
    F: PageFetcher,
    W: Write,
{
    let _permit = permit;
    let index = record.index();
    let name = record.name().to_string();

    let result = scraper
        .scrape(record, &cancel)
        .await
        .map_err(|source| PipelineError::Scrape {
            index,
            name,
            source,
        })?;

    sink.write(&result)?;
    Ok(!result.code.is_unresolved())
}

/// Fold a finished task into the run state
///
/// Only the first fatal error is kept. Anything failing after it is a
/// consequence of the cancellation and is only logged.
fn settle(
    joined: Result<TaskOutcome, JoinError>,
    metrics: &mut RunMetrics,
    failure: &mut Option<PipelineError>,
    cancel: &CancelToken,
) {
    let outcome = joined
        .map_err(|e| PipelineError::Task(e.to_string()))
        .and_then(|outcome| outcome);

    match outcome {
        Ok(resolved) => metrics.record_row(resolved),
        Err(e) if failure.is_some() => debug!("Ignoring error after run stopped: {}", e),
        Err(e) => {
            error!("{}", e);
            *failure = Some(e);
            cancel.cancel();
        }
    }
}
