// ============================================================
// CSV EXPORTER
// ============================================================
// Delimited-text export in canonical column order

use csv::WriterBuilder;

use crate::domain::error::{AppError, Result};
use crate::domain::record::{ClassifiedRecord, TargetField};

const STATUS_COLUMN: &str = "STATUS";

/// Writes `DATE, FULL NAME, CONTACT, ADDRESS` (and optionally `STATUS`)
#[derive(Debug, Clone, Default)]
pub struct CsvExporter {
    include_status: bool,
}

impl CsvExporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_status(mut self, include_status: bool) -> Self {
        self.include_status = include_status;
        self
    }

    pub fn headers(&self) -> Vec<&'static str> {
        let mut headers: Vec<&'static str> =
            TargetField::ALL.iter().map(|f| f.column_label()).collect();
        if self.include_status {
            headers.push(STATUS_COLUMN);
        }
        headers
    }

    /// Serialize records to CSV bytes. Nulls become empty cells.
    pub fn export(&self, records: &[ClassifiedRecord]) -> Result<Vec<u8>> {
        let mut writer = WriterBuilder::new().from_writer(Vec::new());

        writer.write_record(self.headers()).map_err(export_error)?;

        for record in records {
            let mut row: Vec<String> = TargetField::ALL
                .iter()
                .map(|f| record.field_text(*f).unwrap_or_default())
                .collect();
            if self.include_status {
                row.push(record.status.to_string());
            }
            writer.write_record(&row).map_err(export_error)?;
        }

        writer
            .into_inner()
            .map_err(|e| AppError::Internal(format!("Failed to flush CSV export: {}", e)))
    }
}

fn export_error(err: csv::Error) -> AppError {
    AppError::Internal(format!("Failed to write CSV export: {}", err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::record::CellValue;

    fn records() -> Vec<ClassifiedRecord> {
        vec![
            ClassifiedRecord::new(
                Some("2020-01-05".into()),
                Some("Ann Lee".into()),
                Some("5551234".into()),
                Some(CellValue::text("1 Main St, Apt 2")),
            ),
            ClassifiedRecord::new(None, Some("Bob".into()), None, Some(CellValue::Number(42.0))),
        ]
    }

    #[test]
    fn test_export_without_status() {
        let bytes = CsvExporter::new().export(&records()).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(lines[0], "DATE,FULL NAME,CONTACT,ADDRESS");
        assert_eq!(lines[1], "2020-01-05,Ann Lee,5551234,\"1 Main St, Apt 2\"");
        assert_eq!(lines[2], ",Bob,,42");
    }

    #[test]
    fn test_export_with_status() {
        let bytes = CsvExporter::new().with_status(true).export(&records()).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(lines[0], "DATE,FULL NAME,CONTACT,ADDRESS,STATUS");
        assert!(lines[1].ends_with(",VALID"));
        assert!(lines[2].ends_with(",MISSING_FIELDS"));
    }

    #[test]
    fn test_export_empty() {
        let bytes = CsvExporter::new().export(&[]).unwrap();
        assert_eq!(String::from_utf8(bytes).unwrap(), "DATE,FULL NAME,CONTACT,ADDRESS\n");
    }
}
