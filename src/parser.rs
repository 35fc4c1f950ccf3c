//! CSV parser for exported segment tables.

use anyhow::{Context, Result};
use csv::{ByteRecord, ReaderBuilder};

/// One segment's raw table: a header row plus string cells.
///
/// Rows may be shorter than the header; missing trailing cells read as absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SegmentTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl SegmentTable {
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h.trim() == name)
    }

    /// Cell at `row` for the column at `idx`, if the row reaches that far.
    pub fn cell(&self, row: usize, idx: usize) -> Option<&str> {
        self.rows.get(row)?.get(idx).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Decodes a CSV-encoded [`SegmentTable`] from raw bytes.
///
/// A leading UTF-8 byte order mark is skipped. Rows are read in flexible
/// mode so ragged exports do not abort the whole table. Cells are decoded
/// one by one; bytes that are not UTF-8 become U+FFFD in that cell only.
///
/// # Errors
///
/// Returns an error if the underlying reader fails.
pub fn parse_table(bytes: &[u8]) -> Result<SegmentTable> {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);

    let mut rdr = ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(bytes);

    let headers = decode(rdr.byte_headers().context("reading CSV header row")?);

    let mut rows = Vec::new();
    for (line, record) in rdr.byte_records().enumerate() {
        let record = record.with_context(|| format!("reading CSV row {}", line + 1))?;
        rows.push(decode(&record));
    }

    Ok(SegmentTable { headers, rows })
}

fn decode(record: &ByteRecord) -> Vec<String> {
    record
        .iter()
        .map(|cell| String::from_utf8_lossy(cell).into_owned())
        .collect()
}
