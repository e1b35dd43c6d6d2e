// ============================================================
// EXPORT INFRASTRUCTURE LAYER
// ============================================================
// Serialize classified records for download

mod csv_writer;

pub use csv_writer::CsvExporter;
