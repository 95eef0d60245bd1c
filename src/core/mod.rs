pub mod aggregate;
pub mod ingest;
pub mod parser;
pub mod timecalc;
