// ============================================================
// PDF DECODER
// ============================================================
// Extract the text layer with lopdf, then segment labeled lines

use lopdf::Document;

use super::labeled_lines::segment_labeled_lines;
use crate::domain::batch::SourceTable;
use crate::domain::error::{AppError, Result};

pub fn decode_pdf(file_name: &str, bytes: &[u8]) -> Result<Vec<SourceTable>> {
    let document = Document::load_mem(bytes)
        .map_err(|e| AppError::DecodeError(format!("Failed to load PDF: {}", e)))?;

    let page_numbers: Vec<u32> = document.get_pages().keys().copied().collect();
    let mut text = String::new();

    // Extract text per page so one bad page does not lose the rest
    for page in page_numbers {
        match document.extract_text(&[page]) {
            Ok(page_text) => {
                text.push_str(&page_text);
                text.push('\n');
            }
            Err(e) => tracing::warn!(file = file_name, page, error = %e, "failed to extract PDF page text"),
        }
    }

    let records = segment_labeled_lines(&text);
    tracing::debug!(file = file_name, records = records.len(), "segmented PDF text");

    Ok(vec![SourceTable::new(file_name, records)])
}
