// ============================================================
// FILE DECODERS
// ============================================================
// Turn uploaded bytes into source tables. Each format lives in its own
// module; this module dispatches on the detected format.

mod bundle;
mod labeled_lines;
mod pdf;
mod spreadsheet;

pub use bundle::decode_bundle;
pub use labeled_lines::segment_labeled_lines;
pub use pdf::decode_pdf;
pub use spreadsheet::decode_workbook;

use crate::domain::batch::{DecodedFile, FileFormat, SourceTable};
use crate::domain::error::{AppError, Result};
use crate::infrastructure::csv::CsvParser;

/// Decode one uploaded file. Bundles expand to one entry per contained
/// file; anything else yields exactly one entry. Only an unsupported file
/// name is an error; decode failures are reported per file.
pub fn decode_upload(file_name: &str, bytes: &[u8], max_entry_bytes: u64) -> Result<Vec<DecodedFile>> {
    let format = FileFormat::from_file_name(file_name).ok_or_else(|| {
        AppError::ValidationError(format!("Unsupported file type: {}", file_name))
    })?;

    let files = match format {
        FileFormat::Bundle => decode_bundle(file_name, bytes, max_entry_bytes),
        other => vec![decode_file(file_name, bytes, other)],
    };

    Ok(files)
}

/// Decode a single non-bundle file, capturing failure in the result
pub fn decode_file(file_name: &str, bytes: &[u8], format: FileFormat) -> DecodedFile {
    match decode_table(file_name, bytes, format) {
        Ok(tables) => {
            let rows: usize = tables.iter().map(|t| t.records.len()).sum();
            tracing::info!(file = file_name, format = %format, tables = tables.len(), rows, "decoded file");
            DecodedFile::decoded(file_name, tables)
        }
        Err(err) => DecodedFile::failed(file_name, err),
    }
}

/// Decode bytes of a known format into tables
pub fn decode_table(file_name: &str, bytes: &[u8], format: FileFormat) -> Result<Vec<SourceTable>> {
    match format {
        FileFormat::Delimited => {
            let records = CsvParser::parse_bytes_auto_detect(bytes)?;
            Ok(vec![SourceTable::new(file_name, records)])
        }
        FileFormat::Spreadsheet => decode_workbook(file_name, bytes),
        FileFormat::Pdf => decode_pdf(file_name, bytes),
        FileFormat::Bundle => Err(AppError::DecodeError(
            "Nested bundles are not supported".to_string(),
        )),
    }
}
