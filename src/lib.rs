//! COINSIGHT — crypto market snapshot reporter
//!
//! Library crate exposing all modules for use by integration tests
//! and the two binaries (`coinsight` live spreadsheet, `pdf_report`).

pub mod analysis;
pub mod config;
pub mod engine;
pub mod format;
pub mod logging;
pub mod market;
pub mod output;
pub mod types;
