// ============================================================
// BATCH TYPES
// ============================================================
// Source tables handed to the pipeline and the summary it returns

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::{AppError, Result};
use super::record::{ClassifiedRecord, RawRecord};

/// Supported upload formats, detected from the file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FileFormat {
    /// Comma/semicolon/tab/pipe separated text
    Delimited,

    /// Excel or OpenDocument workbook
    Spreadsheet,

    /// PDF with labeled lines (`Date:`, `Name:`, ...)
    Pdf,

    /// Zip archive of any of the above
    Bundle,
}

impl FileFormat {
    /// Detect format from a file name, `None` when unsupported
    pub fn from_file_name(name: &str) -> Option<Self> {
        let extension = name.rsplit_once('.')?.1.to_ascii_lowercase();
        match extension.as_str() {
            "csv" | "tsv" | "txt" => Some(FileFormat::Delimited),
            "xlsx" | "xlsm" | "xls" | "ods" => Some(FileFormat::Spreadsheet),
            "pdf" => Some(FileFormat::Pdf),
            "zip" => Some(FileFormat::Bundle),
            _ => None,
        }
    }
}

impl std::fmt::Display for FileFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileFormat::Delimited => write!(f, "Delimited"),
            FileFormat::Spreadsheet => write!(f, "Spreadsheet"),
            FileFormat::Pdf => write!(f, "Pdf"),
            FileFormat::Bundle => write!(f, "Bundle"),
        }
    }
}

/// One decoded table
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceTable {
    /// File the table came from (bundle entry path for zipped files)
    pub source_file: String,

    /// Worksheet name for workbooks
    pub sheet: Option<String>,

    pub records: Vec<RawRecord>,
}

impl SourceTable {
    pub fn new(source_file: impl Into<String>, records: Vec<RawRecord>) -> Self {
        Self {
            source_file: source_file.into(),
            sheet: None,
            records,
        }
    }

    pub fn with_sheet(mut self, sheet: impl Into<String>) -> Self {
        self.sheet = Some(sheet.into());
        self
    }

    /// Human-readable label for logs
    pub fn label(&self) -> String {
        match &self.sheet {
            Some(sheet) => format!("{}#{}", self.source_file, sheet),
            None => self.source_file.clone(),
        }
    }
}

/// Decoding outcome for one source file. A workbook may yield several
/// tables; a failure carries the decode error and yields none.
#[derive(Debug)]
pub struct DecodedFile {
    pub file: String,
    pub tables: Result<Vec<SourceTable>>,
}

impl DecodedFile {
    pub fn decoded(file: impl Into<String>, tables: Vec<SourceTable>) -> Self {
        Self {
            file: file.into(),
            tables: Ok(tables),
        }
    }

    pub fn failed(file: impl Into<String>, error: AppError) -> Self {
        Self {
            file: file.into(),
            tables: Err(error),
        }
    }
}

/// A file that could not be decoded and contributed no records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedFile {
    pub file: String,
    pub reason: String,
}

/// Result of processing one upload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchSummary {
    pub batch_id: Uuid,

    /// Records remaining after deduplication
    pub record_count: usize,

    /// Records removed as duplicates
    pub dedup_count: usize,

    pub valid_count: usize,

    pub missing_count: usize,

    /// Source files that decoded successfully
    pub files_processed: usize,

    #[serde(default)]
    pub skipped: Vec<SkippedFile>,

    pub data: Vec<ClassifiedRecord>,
}
