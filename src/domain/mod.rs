pub mod batch;
pub mod error;
pub mod record;
pub mod synonyms;
