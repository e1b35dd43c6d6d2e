// ============================================================
// UPLOAD INGESTION USE CASE
// ============================================================
// Decode one uploaded file (or bundle) and run it through the pipeline

use crate::application::use_cases::batch_processor::BatchProcessor;
use crate::domain::batch::BatchSummary;
use crate::domain::error::{AppError, Result};
use crate::infrastructure::decoders::decode_upload;

pub struct UploadIngestionUseCase {
    processor: BatchProcessor,
    max_upload_bytes: u64,
}

impl UploadIngestionUseCase {
    pub fn new(processor: BatchProcessor, max_upload_bytes: u64) -> Self {
        Self {
            processor,
            max_upload_bytes,
        }
    }

    /// Process one upload. Only request-level problems (empty or oversized
    /// payload, unsupported file type) are errors; files that fail to decode
    /// are reported in the summary's `skipped` list.
    pub fn execute(&self, file_name: &str, bytes: &[u8]) -> Result<BatchSummary> {
        let file_name = file_name.trim();
        if file_name.is_empty() {
            return Err(AppError::ValidationError("A file name is required".to_string()));
        }

        if bytes.is_empty() {
            return Err(AppError::ValidationError(format!("Upload '{}' is empty", file_name)));
        }

        if bytes.len() as u64 > self.max_upload_bytes {
            return Err(AppError::ValidationError(format!(
                "Upload '{}' exceeds {} bytes",
                file_name, self.max_upload_bytes
            )));
        }

        let files = decode_upload(file_name, bytes, self.max_upload_bytes)?;
        Ok(self.processor.process_batch(files))
    }
}
