//! Writing results as delimited rows

use crate::error::PipelineError;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use tracing::debug;
use yprice_domain::{ScrapeResult, Year};

/// Column titles preceding the year columns
pub const LEADING_COLUMNS: [&str; 3] = ["企業名", "index", "コード"];

/// Serialized result rows, safe to share between tasks
///
/// Rows are written under a mutex and flushed before the lock is released,
/// so the output only ever holds whole rows, in completion order.
pub struct CsvSink<W: Write> {
    writer: Mutex<csv::Writer<W>>,
}

impl CsvSink<File> {
    /// Create (or truncate) the file at `path` and write the header row
    pub fn create(path: impl AsRef<Path>) -> Result<Self, PipelineError> {
        let path = path.as_ref();
        debug!("Writing results to {}", path.display());
        Self::new(File::create(path)?)
    }
}

impl<W: Write> CsvSink<W> {
    /// Wrap `inner` and write the header row
    pub fn new(inner: W) -> Result<Self, PipelineError> {
        let mut writer = csv::Writer::from_writer(inner);
        writer.write_record(header())?;
        writer.flush()?;
        Ok(Self {
            writer: Mutex::new(writer),
        })
    }

    /// Append the row for `result`
    pub fn write(&self, result: &ScrapeResult) -> Result<(), PipelineError> {
        let row = row(result);
        let mut writer = self
            .writer
            .lock()
            .map_err(|e| PipelineError::Sink(format!("Writer lock error: {}", e)))?;
        writer.write_record(&row)?;
        writer.flush()?;
        Ok(())
    }

    /// Flush anything still buffered
    pub fn finalize(&self) -> Result<(), PipelineError> {
        let mut writer = self
            .writer
            .lock()
            .map_err(|e| PipelineError::Sink(format!("Writer lock error: {}", e)))?;
        writer.flush()?;
        Ok(())
    }

    /// Flush and hand back the underlying writer
    pub fn into_inner(self) -> Result<W, PipelineError> {
        let writer = self
            .writer
            .into_inner()
            .map_err(|e| PipelineError::Sink(format!("Writer lock error: {}", e)))?;
        writer
            .into_inner()
            .map_err(|e| PipelineError::Sink(e.to_string()))
    }
}

fn header() -> Vec<String> {
    LEADING_COLUMNS
        .iter()
        .map(|title| title.to_string())
        .chain(Year::all().map(|year| year.to_string()))
        .collect()
}

fn row(result: &ScrapeResult) -> Vec<String> {
    let mut row = vec![
        result.name.clone(),
        result.index.to_string(),
        result.code.to_string(),
    ];
    row.extend(result.prices.iter().map(|(_, value)| format!("{:.1}", value)));
    row
}

#[cfg(test)]
mod tests {
    use super::*;
    use yprice_domain::{Record, StockCode, YearlyValues};

    fn written(sink: CsvSink<Vec<u8>>) -> String {
        String::from_utf8(sink.into_inner().unwrap()).unwrap()
    }

    #[test]
    fn test_header_row() {
        let sink = CsvSink::new(Vec::new()).unwrap();
        assert_eq!(
            written(sink),
            "企業名,index,コード,2013,2014,2015,2016,2017,2018,2019,2020,2021,2022\n"
        );
    }

    #[test]
    fn test_row_formatting() {
        let mut prices = YearlyValues::new();
        prices.set(Year::new(2013).unwrap(), 1234.0).unwrap();
        prices.set(Year::new(2022).unwrap(), 98.76).unwrap();
        let result = ScrapeResult::new(Record::new(7, "日本郵船").unwrap())
            .with_code(StockCode::new("9101"))
            .with_prices(prices);

        let sink = CsvSink::new(Vec::new()).unwrap();
        sink.write(&result).unwrap();
        sink.finalize().unwrap();

        let text = written(sink);
        let row = text.lines().nth(1).unwrap();
        assert_eq!(
            row,
            "日本郵船,7,9101,1234.0,0.0,0.0,0.0,0.0,0.0,0.0,0.0,0.0,98.8"
        );
    }

    #[test]
    fn test_unresolved_row() {
        let result = ScrapeResult::new(Record::new(1, "不明商事").unwrap());
        let sink = CsvSink::new(Vec::new()).unwrap();
        sink.write(&result).unwrap();

        let text = written(sink);
        let row = text.lines().nth(1).unwrap();
        assert_eq!(row, "不明商事,1,,0.0,0.0,0.0,0.0,0.0,0.0,0.0,0.0,0.0,0.0");
    }

    #[test]
    fn test_names_with_delimiters_are_quoted() {
        let result = ScrapeResult::new(Record::new(0, "A, B \"C\"").unwrap());
        let sink = CsvSink::new(Vec::new()).unwrap();
        sink.write(&result).unwrap();

        let text = written(sink);
        assert!(text.lines().nth(1).unwrap().starts_with("\"A, B \"\"C\"\"\",0,"));
    }

    #[test]
    fn test_concurrent_writes_keep_rows_whole() {
        let sink = std::sync::Arc::new(CsvSink::new(Vec::new()).unwrap());
        std::thread::scope(|scope| {
            for i in 0..8 {
                let sink = sink.clone();
                scope.spawn(move || {
                    let result = ScrapeResult::new(Record::new(i, format!("会社{}", i)).unwrap());
                    sink.write(&result).unwrap();
                });
            }
        });

        let sink = std::sync::Arc::try_unwrap(sink).ok().unwrap();
        let text = written(sink);
        let rows: Vec<&str> = text.lines().skip(1).collect();
        assert_eq!(rows.len(), 8);
        assert!(rows.iter().all(|row| row.split(',').count() == 13));
    }
}
