pub mod use_cases;

pub use use_cases::batch_processor::BatchProcessor;
pub use use_cases::column_mapper::ColumnMapper;
pub use use_cases::upload_ingestion::UploadIngestionUseCase;
