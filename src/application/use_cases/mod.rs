pub mod batch_processor;
pub mod column_mapper;
pub mod completeness;
pub mod deduplicator;
pub mod field_normalizer;
pub mod record_mapper;
pub mod upload_ingestion;
