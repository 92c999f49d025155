//! Delimited record iteration

use crate::error::SourceError;
use csv::{Reader, ReaderBuilder, StringRecord};
use yprice_domain::Record;

/// Lazy sequence of records over decoded input text
///
/// Header rows are consumed on the first call to `next`. After the first
/// error the iterator is exhausted.
pub struct RecordIter<'a> {
    text: &'a str,
    reader: Reader<&'a [u8]>,
    row: StringRecord,
    header_skip: usize,
    rows_read: u64,
    next_index: usize,
    expected_len: Option<usize>,
    done: bool,
}

/// Parse `text` as comma-delimited rows, skipping `header_skip` rows
///
/// Indexes restart at zero after the skipped rows. The first row read,
/// header or not, fixes the column count; any later row with a different
/// count is a [`SourceError::RecordFormat`] error. Quoting is strict: a `"`
/// inside an unquoted field, text after a closing quote, and a quoted field
/// left open at end of input are format errors too.
///
/// # Examples
///
/// ```
/// use yprice_source::parse;
///
/// let text = "name\nトヨタ自動車\n任天堂\n";
/// let names: Vec<String> = parse(text, 1)
///     .map(|r| r.unwrap().name().to_string())
///     .collect();
/// assert_eq!(names, vec!["トヨタ自動車", "任天堂"]);
/// ```
pub fn parse(text: &str, header_skip: usize) -> RecordIter<'_> {
    let reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    RecordIter {
        text,
        reader,
        row: StringRecord::new(),
        header_skip,
        rows_read: 0,
        next_index: 0,
        expected_len: None,
        done: false,
    }
}

impl RecordIter<'_> {
    /// Read and validate the next raw row; `Ok(false)` at end of input
    fn read_row(&mut self) -> Result<bool, SourceError> {
        let more = self.reader.read_record(&mut self.row).map_err(|e| {
            let row = e
                .position()
                .map(|p| p.line())
                .unwrap_or(self.rows_read + 1);
            SourceError::RecordFormat {
                row,
                reason: e.to_string(),
            }
        })?;
        if !more {
            return Ok(false);
        }
        self.rows_read += 1;
        let row = self.current_row_number();

        if let Err(reason) = check_quoting(self.raw_row()) {
            return Err(SourceError::RecordFormat { row, reason });
        }

        let len = self.row.len();
        match self.expected_len {
            None => self.expected_len = Some(len),
            Some(expected) if expected != len => {
                return Err(SourceError::RecordFormat {
                    row,
                    reason: format!("expected {} fields, found {}", expected, len),
                });
            }
            Some(_) => {}
        }
        Ok(true)
    }

    /// Input bytes of the row just read, terminator included
    fn raw_row(&self) -> &[u8] {
        let start = self.row.position().map(|p| p.byte()).unwrap_or(0);
        let end = self.reader.position().byte();
        let (Ok(start), Ok(end)) = (usize::try_from(start), usize::try_from(end)) else {
            return &[];
        };
        self.text.as_bytes().get(start..end).unwrap_or_default()
    }

    fn current_row_number(&self) -> u64 {
        self.row
            .position()
            .map(|p| p.line())
            .unwrap_or(self.rows_read)
    }

    fn skip_headers(&mut self) -> Result<bool, SourceError> {
        while self.header_skip > 0 {
            if !self.read_row()? {
                return Ok(false);
            }
            self.header_skip -= 1;
        }
        Ok(true)
    }

    fn next_record(&mut self) -> Result<Option<Record>, SourceError> {
        if !self.skip_headers()? || !self.read_row()? {
            return Ok(None);
        }

        let row = self.current_row_number();
        let name = self.row.get(0).unwrap_or_default();
        if name.trim().is_empty() {
            return Err(SourceError::RecordFormat {
                row,
                reason: "entity name column is empty".to_string(),
            });
        }

        let record = Record::new(self.next_index, name)
            .map_err(|reason| SourceError::RecordFormat { row, reason })?;
        self.next_index += 1;
        Ok(Some(record))
    }
}

/// Reject the quoting mistakes the lenient reader would silently absorb
///
/// A field is quoted only when `"` is its first byte. Inside it, `""` is an
/// escaped quote and a closing quote must be followed by a delimiter, a line
/// break, or the end of input.
fn check_quoting(raw: &[u8]) -> Result<(), String> {
    let mut bytes = raw.iter().copied().peekable();
    let mut field_start = true;
    let mut quoted = false;

    while let Some(byte) = bytes.next() {
        if quoted {
            if byte == b'"' {
                match bytes.peek() {
                    Some(b'"') => {
                        bytes.next();
                    }
                    None | Some(b',') | Some(b'\n') | Some(b'\r') => quoted = false,
                    Some(_) => return Err("extraneous \" after quoted field".to_string()),
                }
            }
            continue;
        }
        match byte {
            b'"' if field_start => {
                quoted = true;
                field_start = false;
            }
            b'"' => return Err("bare \" in unquoted field".to_string()),
            b',' | b'\n' | b'\r' => field_start = true,
            _ => field_start = false,
        }
    }

    if quoted {
        return Err("quoted field is never closed".to_string());
    }
    Ok(())
}

impl Iterator for RecordIter<'_> {
    type Item = Result<Record, SourceError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.next_record() {
            Ok(Some(record)) => Some(Ok(record)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(text: &str, skip: usize) -> Vec<Result<Record, SourceError>> {
        parse(text, skip).collect()
    }

    #[test]
    fn test_header_skip_resets_index() {
        let records = collect("企業名,市場\nA社,プライム\nB社,プライム\n", 1);
        assert_eq!(records.len(), 2);
        let first = records[0].as_ref().unwrap();
        let second = records[1].as_ref().unwrap();
        assert_eq!((first.index(), first.name()), (0, "A社"));
        assert_eq!((second.index(), second.name()), (1, "B社"));
    }

    #[test]
    fn test_no_header_skip() {
        let records = collect("A社\nB社\n", 0);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].as_ref().unwrap().name(), "A社");
    }

    #[test]
    fn test_skip_larger_than_input_is_empty() {
        assert!(collect("A社\nB社\n", 5).is_empty());
    }

    #[test]
    fn test_empty_input() {
        assert!(collect("", 1).is_empty());
    }

    #[test]
    fn test_header_fixes_column_count() {
        let records = collect("企業名,市場\nA社\nB社\n", 1);
        assert_eq!(records.len(), 1);
        match &records[0] {
            Err(SourceError::RecordFormat { row, reason }) => {
                assert_eq!(*row, 2);
                assert!(reason.contains("expected 2 fields, found 1"));
            }
            other => panic!("Expected RecordFormat, got {:?}", other),
        }
    }

    #[test]
    fn test_mismatched_header_rows_are_errors() {
        let records = collect("会社一覧\n企業名,市場\nA社,プライム\n", 2);
        match &records[0] {
            Err(SourceError::RecordFormat { row, .. }) => assert_eq!(*row, 2),
            other => panic!("Expected RecordFormat, got {:?}", other),
        }
    }

    #[test]
    fn test_wrong_column_count_reports_row() {
        let text = "企業名,市場\nA社,プライム\nB社,プライム\nC社,プライム\nD社\nE社,プライム\n";
        let records = collect(text, 1);
        assert_eq!(records.len(), 4);
        assert!(records[..3].iter().all(|r| r.is_ok()));
        match &records[3] {
            Err(SourceError::RecordFormat { row, .. }) => assert_eq!(*row, 5),
            other => panic!("Expected RecordFormat, got {:?}", other),
        }
    }

    #[test]
    fn test_iteration_stops_after_error() {
        let mut iter = parse("A社,x\nB社\nC社,y\n", 0);
        assert!(iter.next().unwrap().is_ok());
        assert!(iter.next().unwrap().is_err());
        assert!(iter.next().is_none());
    }

    #[test]
    fn test_empty_name_is_a_format_error() {
        let records = collect("A社,x\n ,y\n", 0);
        match &records[1] {
            Err(SourceError::RecordFormat { row, reason }) => {
                assert_eq!(*row, 2);
                assert!(reason.contains("empty"));
            }
            other => panic!("Expected RecordFormat, got {:?}", other),
        }
    }

    #[test]
    fn test_quoted_name_with_delimiter() {
        let records = collect("\"株式会社A, 本社\",x\n", 0);
        assert_eq!(records[0].as_ref().unwrap().name(), "株式会社A, 本社");
    }

    #[test]
    fn test_escaped_quotes_are_accepted() {
        let records = collect("\"A社 \"\"本店\"\"\",x\nB社,\"\"\n", 0);
        assert_eq!(records[0].as_ref().unwrap().name(), "A社 \"本店\"");
        assert_eq!(records[1].as_ref().unwrap().name(), "B社");
    }

    #[test]
    fn test_bare_quote_is_a_format_error() {
        let records = collect("h\nA社\nB\"社\nC社\n", 1);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].as_ref().unwrap().name(), "A社");
        match &records[1] {
            Err(SourceError::RecordFormat { row, reason }) => {
                assert_eq!(*row, 3);
                assert!(reason.contains("bare"));
            }
            other => panic!("Expected RecordFormat, got {:?}", other),
        }
    }

    #[test]
    fn test_unclosed_quote_does_not_swallow_rows() {
        let records = collect("h\nA社\n\"B社\nC社\n", 1);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].as_ref().unwrap().name(), "A社");
        match &records[1] {
            Err(SourceError::RecordFormat { row, reason }) => {
                assert_eq!(*row, 3);
                assert!(reason.contains("never closed"));
            }
            other => panic!("Expected RecordFormat, got {:?}", other),
        }
    }

    #[test]
    fn test_text_after_closing_quote_is_a_format_error() {
        let records = collect("\"A社\"本店,x\n", 0);
        assert!(matches!(
            records[0],
            Err(SourceError::RecordFormat { row: 1, .. })
        ));
    }

    #[test]
    fn test_quote_check_on_header_rows() {
        let records = collect("企\"業名\nA社\n", 1);
        assert!(matches!(
            records[0],
            Err(SourceError::RecordFormat { row: 1, .. })
        ));
    }

    #[test]
    fn test_check_quoting() {
        assert!(check_quoting(b"plain,\"quoted, with comma\"\r\n").is_ok());
        assert!(check_quoting(b"\"\"").is_ok());
        assert!(check_quoting(b"a\"b").is_err());
        assert!(check_quoting(b"\"open").is_err());
        assert!(check_quoting(b"\"a\"b").is_err());
    }

    #[test]
    fn test_restart_by_reparsing() {
        let text = "h\nA社\nB社\n";
        let first: Vec<_> = parse(text, 1).map(|r| r.unwrap()).collect();
        let second: Vec<_> = parse(text, 1).map(|r| r.unwrap()).collect();
        assert_eq!(first, second);
    }
}
