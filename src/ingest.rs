// File-type dispatch and the async read -> decode -> normalize pipeline

use std::path::Path;

use tracing::{debug, info};

use crate::csv_reader::{self, RawTable};
use crate::dataset::Dataset;
use crate::error::{IngestError, Result};
use crate::spreadsheet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Csv,
    Spreadsheet,
}

impl FileKind {
    /// Classify a file by the text after the last `.` of its name, ignoring case.
    pub fn from_file_name(name: &str) -> Result<Self> {
        let extension = name.rsplit('.').next().unwrap_or(name).to_lowercase();
        match extension.as_str() {
            "csv" => Ok(FileKind::Csv),
            "xlsx" | "xls" => Ok(FileKind::Spreadsheet),
            _ => Err(IngestError::UnsupportedFileType(extension)),
        }
    }

    pub fn decoder(self) -> Box<dyn Decoder> {
        match self {
            FileKind::Csv => Box::new(CsvDecoder),
            FileKind::Spreadsheet => Box::new(SpreadsheetDecoder),
        }
    }
}

/// Turns raw file content into an un-normalized table
pub trait Decoder {
    fn decode(&self, bytes: Vec<u8>) -> Result<RawTable>;
}

struct CsvDecoder;
impl Decoder for CsvDecoder {
    fn decode(&self, bytes: Vec<u8>) -> Result<RawTable> {
        let text = String::from_utf8_lossy(&bytes);
        csv_reader::parse_delimited(&text)
    }
}

struct SpreadsheetDecoder;
impl Decoder for SpreadsheetDecoder {
    fn decode(&self, bytes: Vec<u8>) -> Result<RawTable> {
        spreadsheet::decode_workbook(bytes)
    }
}

/// Decode content of a known kind and normalize it into a dataset.
pub fn decode(kind: FileKind, bytes: Vec<u8>) -> Result<Dataset> {
    let table = kind.decoder().decode(bytes)?;
    debug!(
        columns = table.headers.len(),
        rows = table.rows.len(),
        "Decoded table"
    );
    Dataset::from_raw(table)
}

/// Read a file's full content without blocking the caller's thread.
pub async fn read_file(path: &Path) -> Result<Vec<u8>> {
    let bytes = tokio::fs::read(path).await?;
    debug!(path = %path.display(), bytes = bytes.len(), "Read file");
    Ok(bytes)
}

/// Detect the file kind from its name, then read and decode it.
///
/// An unsupported extension fails before any read happens.
pub async fn load(path: &Path) -> Result<Dataset> {
    let name = file_name(path);
    let kind = FileKind::from_file_name(&name)?;
    info!(file = %name, ?kind, "Loading file");
    let bytes = read_file(path).await?;
    decode(kind, bytes)
}

pub(crate) fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}
