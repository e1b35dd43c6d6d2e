pub mod config;
pub mod csv;
pub mod decoders;
pub mod export;
