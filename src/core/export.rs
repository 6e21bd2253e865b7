//! CSV export
//!
//! Records are projected through an ordered list of columns and written as
//! CSV with every field quoted. The text is then handed to a [`DownloadSink`],
//! which decides where the bytes end up.

use miette::Diagnostic;
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Content type attached to every CSV download
pub const CSV_CONTENT_TYPE: &str = "text/csv";

#[derive(Debug, Error, Diagnostic)]
pub enum ExportError {
    #[error("failed to serialize record for export: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to write CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("export produced invalid UTF-8")]
    Encoding(#[from] std::string::FromUtf8Error),

    #[error("invalid export filename '{0}'")]
    #[diagnostic(
        code(lqc::export::filename),
        help("use a plain file name such as workload.csv; pick the folder with --out")
    )]
    InvalidFilename(String),

    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// One output column: a header label and a dot-separated field path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub label: String,
    pub key: String,
}

impl Column {
    pub fn new(label: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            key: key.into(),
        }
    }
}

/// Standard projection for case records
pub fn case_columns() -> Vec<Column> {
    vec![
        Column::new("Accession", "accession"),
        Column::new("Date Prepared", "date_prepared"),
        Column::new("Date Screened", "date_screened"),
        Column::new("Technician", "technician"),
        Column::new("Pathologist", "pathologist"),
        Column::new("Standard Slides", "standard_slides"),
        Column::new("LB Slides", "lb_slides"),
        Column::new("Time (min)", "time_minutes"),
    ]
}

/// Standard projection for workload summaries
pub fn workload_columns() -> Vec<Column> {
    vec![
        Column::new("Pathologist", "pathologist"),
        Column::new("Date Screened", "date_screened"),
        Column::new("Date Prepared", "date_prepared"),
        Column::new("Cases", "case_count"),
        Column::new("Slides", "slide_total"),
        Column::new("Time (min)", "time_minutes"),
        Column::new("Limit", "limit"),
    ]
}

/// Standard projection for stain QC entries
pub fn stain_columns() -> Vec<Column> {
    vec![
        Column::new("Date", "date"),
        Column::new("Stain", "stain"),
        Column::new("Rating", "rating"),
        Column::new("Technician", "technician"),
        Column::new("Notes", "notes"),
    ]
}

/// Serialize records to CSV text
///
/// The first line holds the column labels. Every field is quoted, embedded
/// quotes are doubled and missing values are empty. Lines are joined with
/// `\n` and there is no trailing newline. Returns an empty string when there
/// are no records or no columns.
pub fn to_csv<T: Serialize>(records: &[T], columns: &[Column]) -> Result<String, ExportError> {
    if records.is_empty() || columns.is_empty() {
        return Ok(String::new());
    }

    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(columns.iter().map(|c| c.label.as_str()))?;
    for record in records {
        let value = serde_json::to_value(record)?;
        writer.write_record(columns.iter().map(|c| field_text(&value, &c.key)))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::Csv(csv::Error::from(e.into_error())))?;
    let mut text = String::from_utf8(bytes)?;
    if text.ends_with('\n') {
        text.pop();
    }
    Ok(text)
}

/// Resolve a dot-separated path and render the value as CSV text
fn field_text(record: &Value, path: &str) -> String {
    let mut current = record;
    for part in path.split('.') {
        let next = match current {
            Value::Object(map) => map.get(part),
            Value::Array(items) => part.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        };
        match next {
            Some(v) => current = v,
            None => return String::new(),
        }
    }

    match current {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => number_text(n),
        other => other.to_string(),
    }
}

/// Whole-valued floats print without a trailing `.0`
fn number_text(n: &serde_json::Number) -> String {
    if n.is_f64() {
        if let Some(f) = n.as_f64() {
            if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 {
                return format!("{}", f as i64);
            }
            return f.to_string();
        }
    }
    n.to_string()
}

/// Bytes handed to the host for saving
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    pub filename: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

/// Destination for exported files
pub trait DownloadSink {
    fn deliver(&self, download: &Download) -> Result<(), ExportError>;
}

/// Writes downloads into a directory
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Where a file of this name will land
    pub fn path_for(&self, filename: &str) -> PathBuf {
        self.dir.join(filename)
    }
}

impl DownloadSink for DirectorySink {
    fn deliver(&self, download: &Download) -> Result<(), ExportError> {
        fs::create_dir_all(&self.dir).map_err(|source| ExportError::Io {
            path: self.dir.clone(),
            source,
        })?;
        let path = self.path_for(&download.filename);
        fs::write(&path, &download.bytes).map_err(|source| ExportError::Io {
            path: path.clone(),
            source,
        })?;
        info!(
            path = %path.display(),
            bytes = download.bytes.len(),
            content_type = download.content_type,
            "Export written"
        );
        Ok(())
    }
}

/// Writes downloads to standard output
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutSink;

impl DownloadSink for StdoutSink {
    fn deliver(&self, download: &Download) -> Result<(), ExportError> {
        let mut out = std::io::stdout().lock();
        out.write_all(&download.bytes)
            .and_then(|_| out.flush())
            .map_err(|source| ExportError::Io {
                path: PathBuf::from("<stdout>"),
                source,
            })?;
        debug!(filename = %download.filename, "Export written to stdout");
        Ok(())
    }
}

/// Hand CSV text to a sink as `filename` with a `text/csv` content type
pub fn download(
    sink: &dyn DownloadSink,
    csv_text: &str,
    filename: &str,
) -> Result<(), ExportError> {
    if !is_plain_filename(filename) {
        return Err(ExportError::InvalidFilename(filename.to_string()));
    }
    sink.deliver(&Download {
        filename: filename.to_string(),
        content_type: CSV_CONTENT_TYPE,
        bytes: csv_text.as_bytes().to_vec(),
    })
}

/// `<kind>-<YYYY-MM-DD>.csv`
pub fn default_filename(kind: &str, today: &str) -> String {
    format!("{}-{}.csv", kind, today)
}

fn is_plain_filename(name: &str) -> bool {
    !name.trim().is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\'])
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::RefCell;

    #[derive(Default)]
    struct RecordingSink {
        delivered: RefCell<Vec<Download>>,
    }

    impl DownloadSink for RecordingSink {
        fn deliver(&self, download: &Download) -> Result<(), ExportError> {
            self.delivered.borrow_mut().push(download.clone());
            Ok(())
        }
    }

    fn ab_columns() -> Vec<Column> {
        vec![Column::new("A", "a"), Column::new("B", "b")]
    }

    #[test]
    fn test_to_csv_quotes_and_doubles() {
        let records = vec![json!({"a": 1, "b": "x\"y"})];
        let csv = to_csv(&records, &ab_columns()).unwrap();
        assert_eq!(csv, "\"A\",\"B\"\n\"1\",\"x\"\"y\"");
    }

    #[test]
    fn test_to_csv_empty_inputs() {
        let none: Vec<Value> = Vec::new();
        assert_eq!(to_csv(&none, &ab_columns()).unwrap(), "");
        assert_eq!(to_csv(&[json!({"a": 1})], &[]).unwrap(), "");
    }

    #[test]
    fn test_to_csv_missing_and_null_are_empty() {
        let records = vec![json!({"a": null}), json!({"b": true})];
        let csv = to_csv(&records, &ab_columns()).unwrap();
        insta::assert_snapshot!(csv, @r###"
        "A","B"
        "",""
        "","true"
        "###);
    }

    #[test]
    fn test_to_csv_nested_paths_and_order() {
        let records = vec![
            json!({"case": {"accession": "CN25-002"}, "tags": ["x", "y"]}),
            json!({"case": {"accession": "CN25-001"}, "tags": []}),
        ];
        let columns = vec![
            Column::new("Second Tag", "tags.1"),
            Column::new("Accession", "case.accession"),
            Column::new("Deep Miss", "case.accession.more"),
        ];
        let csv = to_csv(&records, &columns).unwrap();
        assert_eq!(
            csv,
            "\"Second Tag\",\"Accession\",\"Deep Miss\"\n\"y\",\"CN25-002\",\"\"\n\"\",\"CN25-001\",\"\""
        );
    }

    #[test]
    fn test_to_csv_number_rendering() {
        let records = vec![json!({"a": 3.0, "b": 1.5})];
        let csv = to_csv(&records, &ab_columns()).unwrap();
        assert_eq!(csv, "\"A\",\"B\"\n\"3\",\"1.5\"");
    }

    #[test]
    fn test_to_csv_embedded_newline_and_comma() {
        let records = vec![json!({"a": "one,two", "b": "line\nbreak"})];
        let csv = to_csv(&records, &ab_columns()).unwrap();
        assert_eq!(csv, "\"A\",\"B\"\n\"one,two\",\"line\nbreak\"");
    }

    #[test]
    fn test_download_passes_exact_bytes() {
        let sink = RecordingSink::default();
        download(&sink, "\"A\"\n\"1\"", "workload-2025-05-19.csv").unwrap();

        let delivered = sink.delivered.borrow();
        assert_eq!(delivered.len(), 1);
        assert_eq!(delivered[0].filename, "workload-2025-05-19.csv");
        assert_eq!(delivered[0].content_type, "text/csv");
        assert_eq!(delivered[0].bytes, b"\"A\"\n\"1\"".to_vec());
    }

    #[test]
    fn test_download_rejects_paths() {
        let sink = RecordingSink::default();
        for bad in ["", "..", "../x.csv", "dir/x.csv", "dir\\x.csv"] {
            assert!(matches!(
                download(&sink, "x", bad),
                Err(ExportError::InvalidFilename(_))
            ));
        }
        assert!(sink.delivered.borrow().is_empty());
    }

    #[test]
    fn test_directory_sink_writes_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let sink = DirectorySink::new(tmp.path().join("exports"));
        download(&sink, "\"A\"\n\"1\"", "cases.csv").unwrap();

        let written = fs::read_to_string(tmp.path().join("exports/cases.csv")).unwrap();
        assert_eq!(written, "\"A\"\n\"1\"");
    }

    #[test]
    fn test_default_filename() {
        assert_eq!(default_filename("workload", "2025-05-19"), "workload-2025-05-19.csv");
    }
}
