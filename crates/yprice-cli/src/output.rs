//! Run summary rendering.

use crate::cli::SummaryFormat;
use crate::error::Result;
use yprice_pipeline::RunMetrics;

/// Render `metrics` in the requested format.
pub fn render_summary(metrics: &RunMetrics, format: SummaryFormat) -> Result<String> {
    match format {
        SummaryFormat::Text => Ok(metrics.summary()),
        SummaryFormat::Json => Ok(serde_json::to_string_pretty(metrics)?),
    }
}
