// ============================================================
// CSV INFRASTRUCTURE LAYER
// ============================================================
// Delimited-text decoding with encoding and delimiter detection

mod csv_parser;

pub use csv_parser::CsvParser;
