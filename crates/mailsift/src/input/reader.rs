//! Tabular reader for delimited text and spreadsheet input.

use std::io::Cursor;

use calamine::{Data, Range, Reader, Xlsx, XlsxError};

use super::source::InputKind;
use crate::error::{MailsiftError, Result};

/// One row of cells, positionally aligned to the header.
pub type Row = Vec<String>;

/// Single-pass stream of data rows.
pub type RowStream<'a> = Box<dyn Iterator<Item = Result<Row>> + 'a>;

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Header row plus the not-yet-consumed data rows of a source.
pub struct TabularSource<'a> {
    /// Header cells exactly as stored.
    pub header: Row,
    /// Remaining rows. Consumed once by the filter stage.
    pub rows: RowStream<'a>,
}

/// Reader configuration.
#[derive(Debug, Clone)]
pub struct ReaderConfig {
    /// Field delimiter for delimited text.
    pub delimiter: u8,
    /// Quote character for delimited text.
    pub quote: u8,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            delimiter: b',',
            quote: b'"',
        }
    }
}

/// Opens raw bytes of a declared kind as a header plus a lazy row stream.
pub struct TabularReader {
    config: ReaderConfig,
}

impl TabularReader {
    /// Create a reader with default configuration.
    pub fn new() -> Self {
        Self {
            config: ReaderConfig::default(),
        }
    }

    /// Create a reader with custom configuration.
    pub fn with_config(config: ReaderConfig) -> Self {
        Self { config }
    }

    /// Read the header and return the rows that follow it.
    ///
    /// Fails with [`MailsiftError::EmptyInput`] when no header row exists.
    pub fn read<'a>(&self, bytes: &'a [u8], kind: InputKind) -> Result<TabularSource<'a>> {
        match kind {
            InputKind::Delimited => self.read_delimited(bytes),
            InputKind::Spreadsheet => self.read_spreadsheet(bytes),
        }
    }

    fn read_delimited<'a>(&self, bytes: &'a [u8]) -> Result<TabularSource<'a>> {
        let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);

        // Width is not normalized here: ragged rows are the filter's concern.
        let mut records = csv::ReaderBuilder::new()
            .delimiter(self.config.delimiter)
            .quote(self.config.quote)
            .has_headers(false)
            .flexible(true)
            .from_reader(bytes)
            .into_byte_records();

        let header = match records.next() {
            Some(record) => decode_record(&record?),
            None => {
                return Err(MailsiftError::EmptyInput(
                    "no header row in delimited input".to_string(),
                ));
            }
        };

        let rows = records.map(|record| {
            record
                .map(|r| decode_record(&r))
                .map_err(MailsiftError::from)
        });

        Ok(TabularSource {
            header,
            rows: Box::new(rows),
        })
    }

    fn read_spreadsheet<'a>(&self, bytes: &'a [u8]) -> Result<TabularSource<'a>> {
        let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes))
            .map_err(|e: XlsxError| MailsiftError::Spreadsheet(e.to_string()))?;

        // Only the first sheet is read; the others are ignored.
        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| MailsiftError::EmptyInput("workbook has no worksheets".to_string()))?
            .map_err(|e| MailsiftError::Spreadsheet(e.to_string()))?;

        let mut rows = SheetRows::new(range);
        let header = match rows.next() {
            Some(Ok(header)) if !header.is_empty() => header,
            Some(Err(e)) => return Err(e),
            _ => {
                return Err(MailsiftError::EmptyInput(
                    "first worksheet has no header row".to_string(),
                ));
            }
        };

        Ok(TabularSource {
            header,
            rows: Box::new(rows),
        })
    }
}

impl Default for TabularReader {
    fn default() -> Self {
        Self::new()
    }
}

fn decode_record(record: &csv::ByteRecord) -> Row {
    record
        .iter()
        .map(|field| String::from_utf8_lossy(field).into_owned())
        .collect()
}

/// Owning iterator over the rows of a worksheet range.
///
/// A range starts at its first occupied column, so each row is padded with
/// empty cells back to column A; cell positions match the source sheet.
/// Leading empty rows are not part of the range, so the first occupied row
/// is the header.
struct SheetRows {
    range: Range<Data>,
    next_row: usize,
    leading_cols: usize,
}

impl SheetRows {
    fn new(range: Range<Data>) -> Self {
        let leading_cols = range.start().map_or(0, |(_, col)| col as usize);
        Self {
            range,
            next_row: 0,
            leading_cols,
        }
    }
}

impl Iterator for SheetRows {
    type Item = Result<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        let (height, width) = self.range.get_size();
        if self.next_row >= height {
            return None;
        }

        let cells = (0..width).map(|col| {
            self.range
                .get((self.next_row, col))
                .map(cell_to_string)
                .unwrap_or_default()
        });
        let mut row: Row = std::iter::repeat_n(String::new(), self.leading_cols)
            .chain(cells)
            .collect();
        self.next_row += 1;

        // A sheet range is rectangular; cells past the last stored value
        // do not exist in the source row.
        while row.last().is_some_and(|cell| cell.is_empty()) {
            row.pop();
        }

        Some(Ok(row))
    }
}

/// Stringify a worksheet cell without any re-typing.
fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 => {
            format!("{:.0}", f)
        }
        Data::Float(f) => f.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::Error(e) => format!("#ERROR: {:?}", e),
        Data::DateTime(dt) => dt.to_string(),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(source: TabularSource<'_>) -> (Row, Vec<Row>) {
        let rows = source.rows.collect::<Result<Vec<_>>>().unwrap();
        (source.header, rows)
    }

    #[test]
    fn test_read_csv() {
        let reader = TabularReader::new();
        let source = reader
            .read(b"email,name\nA@x.com,Alice\nb@y.com,Bob\n", InputKind::Delimited)
            .unwrap();
        let (header, rows) = collect(source);

        assert_eq!(header, vec!["email", "name"]);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], vec!["A@x.com", "Alice"]);
    }

    #[test]
    fn test_csv_keeps_trailing_empty_fields() {
        let reader = TabularReader::new();
        let source = reader
            .read(b"name,email,note\nAlice,a@x.com,,\n", InputKind::Delimited)
            .unwrap();
        let (_, rows) = collect(source);

        assert_eq!(rows[0], vec!["Alice", "a@x.com", "", ""]);
    }

    #[test]
    fn test_csv_ragged_rows_pass_through() {
        let reader = TabularReader::new();
        let source = reader
            .read(b"name,email\nAlice\nBob,b@y.com\n", InputKind::Delimited)
            .unwrap();
        let (_, rows) = collect(source);

        assert_eq!(rows[0], vec!["Alice"]);
        assert_eq!(rows[1], vec!["Bob", "b@y.com"]);
    }

    #[test]
    fn test_csv_quoted_delimiter() {
        let reader = TabularReader::new();
        let source = reader
            .read(b"name,email\n\"Doe, Jane\",j@x.com\n", InputKind::Delimited)
            .unwrap();
        let (_, rows) = collect(source);

        assert_eq!(rows[0], vec!["Doe, Jane", "j@x.com"]);
    }

    #[test]
    fn test_csv_strips_bom() {
        let reader = TabularReader::new();
        let source = reader
            .read(b"\xEF\xBB\xBFEmail\na@x.com\n", InputKind::Delimited)
            .unwrap();
        assert_eq!(source.header, vec!["Email"]);
    }

    #[test]
    fn test_csv_header_only() {
        let reader = TabularReader::new();
        let source = reader.read(b"email,name\n", InputKind::Delimited).unwrap();
        let (header, rows) = collect(source);

        assert_eq!(header.len(), 2);
        assert!(rows.is_empty());
    }

    #[test]
    fn test_empty_csv_is_error() {
        let reader = TabularReader::new();
        for input in [&b""[..], b"\n\n", b"\xEF\xBB\xBF"] {
            let err = reader.read(input, InputKind::Delimited).err().unwrap();
            assert!(matches!(err, MailsiftError::EmptyInput(_)));
        }
    }

    #[test]
    fn test_garbage_spreadsheet_is_error() {
        let reader = TabularReader::new();
        let err = reader
            .read(b"email,name\n", InputKind::Spreadsheet)
            .err()
            .unwrap();
        assert!(matches!(err, MailsiftError::Spreadsheet(_)));
    }

    #[test]
    fn test_cell_to_string() {
        assert_eq!(cell_to_string(&Data::Empty), "");
        assert_eq!(cell_to_string(&Data::String("x".to_string())), "x");
        assert_eq!(cell_to_string(&Data::Float(42.0)), "42");
        assert_eq!(cell_to_string(&Data::Float(1.5)), "1.5");
        assert_eq!(cell_to_string(&Data::Int(7)), "7");
        assert_eq!(cell_to_string(&Data::Bool(true)), "true");
    }
}
