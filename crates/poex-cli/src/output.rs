//! CSV output of line item records.
//!
//! Existing output is merged with new rows; rows repeating a
//! (PDF File, Order Number, Line) key keep their latest version.

use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use tracing::{debug, warn};

use poex_core::models::OutputConfig;
use poex_core::LineItemRecord;

/// Column headers, in output order.
pub const HEADERS: [&str; 11] = [
    "PDF File",
    "Order Number",
    "Order Date",
    "Line",
    "Part Number",
    "Quantity",
    "Unit Price",
    "Amount",
    "Delivery Date",
    "Ship To",
    "Ordering Office",
];

const KEY_COLUMNS: [usize; 3] = [0, 1, 3];

type Row = Vec<String>;

/// Outcome of a write.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteSummary {
    /// Rows in the file after writing.
    pub rows: usize,
    /// Rows dropped because a later row had the same key.
    pub duplicates_removed: usize,
}

/// Appending CSV writer with retries for locked files.
pub struct CsvOutput {
    path: PathBuf,
    attempts: u32,
    retry_delay: Duration,
}

impl CsvOutput {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            attempts: 1,
            retry_delay: Duration::ZERO,
        }
    }

    /// Writer for the configured output file.
    pub fn from_config(config: &OutputConfig) -> Self {
        Self::new(&config.path).with_retries(
            config.write_attempts,
            Duration::from_millis(config.retry_delay_ms),
        )
    }

    /// Set how often to retry when the file cannot be opened for writing.
    pub fn with_retries(mut self, attempts: u32, delay: Duration) -> Self {
        self.attempts = attempts.max(1);
        self.retry_delay = delay;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reject output paths that do not name a `.csv` file.
    pub fn check_path(&self) -> anyhow::Result<()> {
        let is_csv = self
            .path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));

        if !is_csv {
            anyhow::bail!(
                "Output file must have a .csv extension: {}",
                self.path.display()
            );
        }
        Ok(())
    }

    /// Merge records into the output file.
    pub fn write(&self, records: &[LineItemRecord]) -> anyhow::Result<WriteSummary> {
        self.check_path()?;

        if records.is_empty() {
            warn!("No records to write to {}", self.path.display());
            return Ok(WriteSummary::default());
        }

        let mut rows = if self.path.exists() {
            read_rows(&self.path)?
        } else {
            Vec::new()
        };
        debug!("{} existing rows in {}", rows.len(), self.path.display());

        rows.extend(records.iter().map(record_row));
        let before = rows.len();
        let rows = dedup_keep_last(rows);

        let file = self.create_with_retry()?;
        write_rows(file, &rows)?;

        Ok(WriteSummary {
            rows: rows.len(),
            duplicates_removed: before - rows.len(),
        })
    }

    fn create_with_retry(&self) -> anyhow::Result<File> {
        let mut attempt = 1;
        loop {
            match File::create(&self.path) {
                Ok(file) => return Ok(file),
                Err(e) if e.kind() == io::ErrorKind::PermissionDenied && attempt < self.attempts => {
                    warn!(
                        "{} is locked (attempt {}/{}), retrying",
                        self.path.display(),
                        attempt,
                        self.attempts
                    );
                    thread::sleep(self.retry_delay);
                    attempt += 1;
                }
                Err(e) => {
                    return Err(anyhow::anyhow!(
                        "Cannot write {}: {}",
                        self.path.display(),
                        e
                    ))
                }
            }
        }
    }
}

/// A record as an output row; numbers lose currency symbols and separators,
/// and values that do not parse are left empty.
pub fn record_row(record: &LineItemRecord) -> Row {
    vec![
        record.pdf_file.clone(),
        record.order_number.clone(),
        record.order_date.clone(),
        record.line.clone(),
        record.part_number.clone(),
        number(record.quantity_value()),
        number(record.unit_price_value()),
        number(record.amount_value()),
        record.delivery_date.clone(),
        record.ship_to.clone(),
        record.ordering_office.clone(),
    ]
}

fn number(value: Option<impl ToString>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn read_rows(path: &Path) -> anyhow::Result<Vec<Row>> {
    let content = fs::read_to_string(path)?;
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(true)
        .from_reader(content.as_bytes());

    reader
        .records()
        .map(|result| -> anyhow::Result<Row> {
            let record = result?;
            let mut row: Row = record.iter().map(str::to_string).collect();
            row.resize(HEADERS.len(), String::new());
            Ok(row)
        })
        .collect()
}

fn dedup_keep_last(rows: Vec<Row>) -> Vec<Row> {
    let mut seen = HashSet::new();
    let mut kept: Vec<Row> = rows
        .into_iter()
        .rev()
        .filter(|row| seen.insert(KEY_COLUMNS.map(|i| row[i].clone())))
        .collect();
    kept.reverse();
    kept
}

/// Write rows with the header line.
pub fn write_rows<W: Write>(writer: W, rows: &[Row]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);

    wtr.write_record(HEADERS)?;
    for row in rows {
        wtr.write_record(row)?;
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record(file: &str, line: &str, amount: &str) -> LineItemRecord {
        LineItemRecord {
            pdf_file: file.to_string(),
            order_number: "4500012345".to_string(),
            line: line.to_string(),
            part_number: "ABC123".to_string(),
            quantity: "10".to_string(),
            unit_price: "$1,250.00".to_string(),
            amount: amount.to_string(),
            ..Default::default()
        }
    }

    fn read_back(path: &Path) -> Vec<Row> {
        read_rows(path).unwrap()
    }

    #[test]
    fn test_writes_header_and_normalized_numbers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");

        let summary = CsvOutput::new(&path)
            .write(&[record("a.pdf", "1.1", "n/a")])
            .unwrap();
        assert_eq!(summary, WriteSummary { rows: 1, duplicates_removed: 0 });

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("PDF File,Order Number,Order Date,Line,Part Number"));

        let rows = read_back(&path);
        assert_eq!(rows[0][5], "10");
        assert_eq!(rows[0][6], "1250.00");
        assert_eq!(rows[0][7], "");
    }

    #[test]
    fn test_merge_keeps_latest_row() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let output = CsvOutput::new(&path);

        output
            .write(&[record("a.pdf", "1.1", "100.00"), record("a.pdf", "1.2", "5.00")])
            .unwrap();
        let summary = output
            .write(&[record("a.pdf", "1.1", "120.00"), record("b.pdf", "1.1", "7.00")])
            .unwrap();

        assert_eq!(summary, WriteSummary { rows: 3, duplicates_removed: 1 });

        let rows = read_back(&path);
        let keys: Vec<(&str, &str, &str)> = rows
            .iter()
            .map(|r| (r[0].as_str(), r[3].as_str(), r[7].as_str()))
            .collect();
        assert_eq!(
            keys,
            vec![
                ("a.pdf", "1.2", "5.00"),
                ("a.pdf", "1.1", "120.00"),
                ("b.pdf", "1.1", "7.00"),
            ]
        );
    }

    #[test]
    fn test_empty_records_leave_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");

        let summary = CsvOutput::new(&path).write(&[]).unwrap();
        assert_eq!(summary, WriteSummary::default());
        assert!(!path.exists());
    }

    #[test]
    fn test_missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.csv");

        let output = CsvOutput::new(&path).with_retries(3, Duration::ZERO);
        assert!(output.write(&[record("a.pdf", "1.1", "1.00")]).is_err());
    }

    #[test]
    fn test_non_csv_path_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.xlsx");

        let err = CsvOutput::new(&path)
            .write(&[record("a.pdf", "1.1", "1.00")])
            .unwrap_err();
        assert!(err.to_string().contains(".csv extension"));
        assert!(!path.exists());

        assert!(CsvOutput::new(dir.path().join("OUT.CSV")).check_path().is_ok());
        assert!(CsvOutput::new(dir.path().join("out")).check_path().is_err());
    }

    #[test]
    fn test_write_rows_to_buffer() {
        let mut buf = Vec::new();
        write_rows(&mut buf, &[record_row(&record("a.pdf", "1.1", "$3.50"))]).unwrap();

        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next().map(|l| l.split(',').count()), Some(11));
        assert_eq!(
            lines.next(),
            Some("a.pdf,4500012345,,1.1,ABC123,10,1250.00,3.50,,,")
        );
    }
}
