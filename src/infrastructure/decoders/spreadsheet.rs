// ============================================================
// SPREADSHEET DECODER
// ============================================================
// Excel / OpenDocument workbooks via calamine. Every non-empty sheet is a
// table whose first row holds the headers.

use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, DataType, Range, Reader};

use crate::domain::batch::SourceTable;
use crate::domain::error::{AppError, Result};
use crate::domain::record::{CellValue, RawField, RawRecord};

pub fn decode_workbook(file_name: &str, bytes: &[u8]) -> Result<Vec<SourceTable>> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))
        .map_err(|e| AppError::DecodeError(format!("Failed to open workbook: {}", e)))?;

    let sheet_names = workbook.sheet_names().to_owned();
    let sheets = sheet_names.into_iter().map(|sheet| {
        let range = workbook.worksheet_range(&sheet);
        (sheet, range)
    });

    tables_from_sheets(file_name, sheets)
}

/// Build one table per readable, non-empty sheet. An unreadable sheet is
/// logged and skipped; the workbook only fails when no sheet could be read.
fn tables_from_sheets<I, E>(file_name: &str, sheets: I) -> Result<Vec<SourceTable>>
where
    I: IntoIterator<Item = (String, std::result::Result<Range<Data>, E>)>,
    E: std::fmt::Display,
{
    let mut tables = Vec::new();
    let mut failures = Vec::new();
    let mut read_any = false;

    for (sheet, range) in sheets {
        let range = match range {
            Ok(range) => range,
            Err(e) => {
                tracing::warn!(file = file_name, sheet = %sheet, error = %e, "skipping unreadable sheet");
                failures.push(format!("'{}': {}", sheet, e));
                continue;
            }
        };
        read_any = true;

        if range.is_empty() {
            continue;
        }

        tables.push(SourceTable::new(file_name, records_from_range(&range)).with_sheet(sheet));
    }

    if !read_any && !failures.is_empty() {
        return Err(AppError::DecodeError(format!(
            "Failed to read any sheet: {}",
            failures.join("; ")
        )));
    }

    if tables.is_empty() {
        tables.push(SourceTable::new(file_name, Vec::new()));
    }

    Ok(tables)
}

/// Convert a sheet range into records, first row as headers
fn records_from_range(range: &Range<Data>) -> Vec<RawRecord> {
    let mut rows = range.rows();

    let headers: Vec<String> = match rows.next() {
        Some(header_row) => header_row.iter().map(|c| c.to_string().trim().to_string()).collect(),
        None => return Vec::new(),
    };

    rows.map(|row| {
        let fields = headers
            .iter()
            .enumerate()
            .map(|(idx, header)| RawField::new(header.as_str(), row.get(idx).and_then(cell_value)))
            .collect();
        RawRecord::new(fields)
    })
    .filter(|record| !record.is_empty())
    .collect()
}

/// Map one cell; empty and error cells are absent, dates become `YYYY-MM-DD`
fn cell_value(cell: &Data) -> Option<CellValue> {
    match cell {
        Data::Empty | Data::Error(_) => None,
        Data::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(CellValue::text(trimmed))
            }
        }
        Data::Float(f) => Some(CellValue::Number(*f)),
        Data::Int(i) => Some(CellValue::Number(*i as f64)),
        Data::Bool(b) => Some(CellValue::text(b.to_string())),
        other => other
            .as_date()
            .map(|d| CellValue::text(d.format("%Y-%m-%d").to_string()))
            .or_else(|| other.as_string().map(CellValue::Text)),
    }
}
