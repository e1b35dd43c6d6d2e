// ============================================================
// CSV PARSER
// ============================================================
// Decode delimited text into raw records

use csv::{ReaderBuilder, StringRecord, Trim};
use encoding_rs::WINDOWS_1252;

use crate::domain::error::AppError;
use crate::domain::record::{CellValue, RawField, RawRecord};

/// CSV parser with encoding detection
pub struct CsvParser {
    /// Delimiter character (default: comma)
    delimiter: u8,
}

impl Default for CsvParser {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

impl CsvParser {
    /// Create a new CSV parser with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set custom delimiter
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Decode raw bytes, detecting encoding and delimiter
    pub fn parse_bytes_auto_detect(bytes: &[u8]) -> Result<Vec<RawRecord>, AppError> {
        let content = Self::decode_text(bytes);
        let delimiter = Self::detect_delimiter(&content);
        Self::new().with_delimiter(delimiter).parse_content(&content)
    }

    /// Parse CSV content from string. The first row is the header row;
    /// headers and values are trimmed.
    pub fn parse_content(&self, content: &str) -> Result<Vec<RawRecord>, AppError> {
        let mut reader = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .trim(Trim::All)
            .flexible(true) // Allow rows with different lengths
            .from_reader(content.as_bytes());

        let headers = reader
            .headers()
            .map_err(|e| AppError::DecodeError(format!("Failed to read CSV headers: {}", e)))?
            .clone();

        if headers.iter().all(|h| h.trim().is_empty()) {
            return Err(AppError::DecodeError("CSV has no header row".to_string()));
        }

        let mut rows = Vec::new();

        for (index, result) in reader.records().enumerate() {
            let record = result.map_err(|e| {
                AppError::DecodeError(format!("Failed to parse CSV row {}: {}", index + 1, e))
            })?;

            // Skip fully blank lines
            if record.iter().all(|v| v.trim().is_empty()) {
                continue;
            }

            rows.push(Self::parse_row(&headers, &record));
        }

        Ok(rows)
    }

    /// UTF-8 (BOM stripped) with a Windows-1252 fallback
    pub fn decode_text(bytes: &[u8]) -> String {
        let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);

        match std::str::from_utf8(bytes) {
            Ok(content) => content.to_string(),
            Err(_) => {
                let (content, _, _) = WINDOWS_1252.decode(bytes);
                content.into_owned()
            }
        }
    }

    /// Parse a single CSV row. Blank and missing cells are absent values.
    fn parse_row(headers: &StringRecord, record: &StringRecord) -> RawRecord {
        let fields = headers
            .iter()
            .enumerate()
            .map(|(idx, header)| {
                let value = record
                    .get(idx)
                    .filter(|v| !v.trim().is_empty())
                    .map(CellValue::text);
                RawField::new(header, value)
            })
            .collect();

        RawRecord::new(fields)
    }

    /// Detect delimiter from content (comma, semicolon, tab, pipe)
    pub fn detect_delimiter(content: &str) -> u8 {
        let candidates = [b',', b';', b'\t', b'|'];

        let mut best_delimiter = b',';
        let mut best_score = 0.0f32;

        let sample_lines: Vec<_> = content.lines().take(10).collect();
        if sample_lines.is_empty() {
            return best_delimiter;
        }

        for &delimiter in &candidates {
            let field_counts: Vec<usize> = sample_lines
                .iter()
                .map(|line| line.bytes().filter(|&b| b == delimiter).count())
                .collect();

            // Score by consistency (low standard deviation) and frequency
            let avg = field_counts.iter().sum::<usize>() as f32 / field_counts.len() as f32;
            let variance = field_counts
                .iter()
                .map(|&x| (x as f32 - avg).powi(2))
                .sum::<f32>()
                / field_counts.len() as f32;

            let score = avg / (1.0 + variance.sqrt());

            if score > best_score {
                best_score = score;
                best_delimiter = delimiter;
            }
        }

        best_delimiter
    }
}
