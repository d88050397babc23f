//! Report renderers.
//!
//! Both renderers consume the same `InsightSet`:
//! - `pdf` — one-shot PDF market report
//! - `sheet` — spreadsheet rewritten on every refresh cycle

pub mod pdf;
pub mod sheet;
