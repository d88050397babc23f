//! Live spreadsheet updater.
//!
//! Each cycle clears the workbook's active sheet and rewrites it: an
//! 8-column header, one row per coin in source order, then an analysis
//! block two blank rows below the data. Other sheets in the workbook are
//! kept as they are.
//!
//! The workbook is edited in memory, written to a sibling staging file
//! and renamed over the target, so a failed cycle never leaves a partly
//! written file behind.

use anyhow::{anyhow, Context, Result};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::ffi::OsString;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use umya_spreadsheet::{reader, writer, Spreadsheet, Worksheet};

use crate::format::{format_usd, format_usd_whole};
use crate::types::{CoinRecord, InsightSet};

pub const HEADERS: [&str; 8] = [
    "Rank",
    "Name",
    "Symbol",
    "Price (USD)",
    "Market Cap (USD)",
    "24h Volume (USD)",
    "24h Change (%)",
    "Timestamp",
];

pub const ANALYSIS_HEADERS: [&str; 2] = ["Analysis", "Result"];

/// Sheet name used when the workbook is created from scratch.
pub const DEFAULT_SHEET_NAME: &str = "Sheet1";

/// Blank rows between the last coin row and the analysis header.
const ANALYSIS_GAP_ROWS: u32 = 2;

const PRICE_FORMAT: &str = "$#,##0.00########";
const USD_FORMAT: &str = "$#,##0";
const PERCENT_FORMAT: &str = "0.00";

// ---------------------------------------------------------------------------
// Sheet content
// ---------------------------------------------------------------------------

/// Zero-based row index of the analysis header for `data_rows` coins.
///
/// Row 0 is the header and rows `1..=data_rows` hold the coins, so the
/// analysis header lands on one-based row `data_rows + 4`.
pub fn analysis_start_row(data_rows: usize) -> u32 {
    data_rows as u32 + 1 + ANALYSIS_GAP_ROWS
}

/// The four label/value rows of the analysis block.
pub fn analysis_rows(insights: &InsightSet) -> Vec<(String, String)> {
    let top5 = insights
        .top5_by_market_cap
        .iter()
        .map(|c| format!("{} ({})", c.name, format_usd_whole(c.market_cap)))
        .collect::<Vec<_>>()
        .join(", ");

    vec![
        ("Top 5 by Market Cap".to_string(), top5),
        ("Average Price (Top 50)".to_string(), format_usd(insights.average_price)),
        (
            "Highest 24h Price Change".to_string(),
            insights.highest_or_placeholder().to_string(),
        ),
        (
            "Lowest 24h Price Change".to_string(),
            insights.lowest_or_placeholder().to_string(),
        ),
    ]
}

fn to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or_default()
}

// umya coordinates are one-based (column, row); the layout above is
// zero-based, so every write goes through this.
fn cell(row: u32, col: u32) -> (u32, u32) {
    (col + 1, row + 1)
}

fn write_text(sheet: &mut Worksheet, row: u32, col: u32, value: &str) {
    sheet.get_cell_mut(cell(row, col)).set_value(value);
}

fn write_bold(sheet: &mut Worksheet, row: u32, col: u32, value: &str) {
    write_text(sheet, row, col, value);
    sheet.get_style_mut(cell(row, col)).get_font_mut().set_bold(true);
}

fn write_optional(sheet: &mut Worksheet, row: u32, col: u32, value: Option<Decimal>, format: &str) {
    if let Some(v) = value {
        sheet.get_cell_mut(cell(row, col)).set_value_number(to_f64(v));
        sheet
            .get_style_mut(cell(row, col))
            .get_number_format_mut()
            .set_format_code(format);
    }
}

/// Remove every row of `sheet`, leaving it empty.
fn clear(sheet: &mut Worksheet) {
    let last_row = sheet.get_highest_row();
    if last_row > 0 {
        sheet.remove_row(&1, &last_row);
    }
}

/// Fill `sheet` with the coin table and the analysis block.
fn populate(sheet: &mut Worksheet, coins: &[CoinRecord], insights: &InsightSet, timestamp: &str) {
    for (col, header) in HEADERS.iter().enumerate() {
        write_bold(sheet, 0, col as u32, header);
    }

    for (i, coin) in coins.iter().enumerate() {
        let row = i as u32 + 1;
        sheet.get_cell_mut(cell(row, 0)).set_value_number((i + 1) as f64);
        write_text(sheet, row, 1, &coin.name);
        write_text(sheet, row, 2, &coin.symbol.to_uppercase());
        write_optional(sheet, row, 3, coin.current_price, PRICE_FORMAT);
        write_optional(sheet, row, 4, coin.market_cap, USD_FORMAT);
        write_optional(sheet, row, 5, coin.total_volume, USD_FORMAT);
        write_optional(sheet, row, 6, coin.price_change_percentage_24h, PERCENT_FORMAT);
        write_text(sheet, row, 7, timestamp);
    }

    let start = analysis_start_row(coins.len());
    for (col, header) in ANALYSIS_HEADERS.iter().enumerate() {
        write_bold(sheet, start, col as u32, header);
    }
    for (offset, (label, value)) in analysis_rows(insights).into_iter().enumerate() {
        let row = start + 1 + offset as u32;
        write_text(sheet, row, 0, &label);
        write_text(sheet, row, 1, &value);
    }

    for col in 1..=HEADERS.len() as u32 {
        sheet.get_column_dimension_by_number_mut(&col).set_auto_width(true);
    }
    sheet.calculation_auto_width();
}

/// Sibling path the workbook is written to before it replaces `path`.
fn staging_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(OsString::from).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Write `book` to a staging file next to `path`, then rename it into place.
fn save(book: &Spreadsheet, path: &Path) -> Result<()> {
    let staging = staging_path(path);
    let file = File::create(&staging)
        .with_context(|| format!("Failed to create {}", staging.display()))?;
    let mut out = BufWriter::new(file);

    let written = writer::xlsx::write_writer(book, &mut out)
        .map_err(|e| anyhow!("Failed to write workbook {}: {e:?}", staging.display()))
        .and_then(|()| out.flush().context("Failed to flush workbook"));
    drop(out);

    let result = written.and_then(|()| {
        std::fs::rename(&staging, path)
            .with_context(|| format!("Failed to replace workbook {}", path.display()))
    });
    if result.is_err() {
        let _ = std::fs::remove_file(&staging);
    }
    result
}

fn new_workbook() -> Result<Spreadsheet> {
    let mut book = umya_spreadsheet::new_file_empty_worksheet();
    book.new_sheet(DEFAULT_SHEET_NAME)
        .map_err(|e| anyhow!("Failed to add sheet {DEFAULT_SHEET_NAME}: {e}"))?;
    Ok(book)
}

// ---------------------------------------------------------------------------
// Updater
// ---------------------------------------------------------------------------

/// Owns one workbook path and rewrites its active sheet on every `update`.
pub struct SheetUpdater {
    path: PathBuf,
}

impl SheetUpdater {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Open the workbook if it exists, otherwise create and save an
    /// empty one.
    fn prepare(&self) -> Result<Spreadsheet> {
        if self.path.exists() {
            match reader::xlsx::read(&self.path) {
                Ok(book) => {
                    debug!(
                        path = %self.path.display(),
                        sheet = %book.get_active_sheet().get_name(),
                        sheets = book.get_sheet_collection().len(),
                        "Opened existing workbook"
                    );
                    return Ok(book);
                }
                Err(e) => {
                    warn!(
                        path = %self.path.display(),
                        error = ?e,
                        "Existing workbook is unreadable and will be replaced"
                    );
                    return new_workbook();
                }
            }
        }

        let book = new_workbook()?;
        save(&book, &self.path)
            .with_context(|| format!("Failed to create workbook {}", self.path.display()))?;
        info!(path = %self.path.display(), "Created new workbook");
        Ok(book)
    }

    /// Replace the active sheet's contents with the given snapshot.
    pub fn update(&self, coins: &[CoinRecord], insights: &InsightSet, timestamp: &str) -> Result<()> {
        let mut book = self.prepare()?;

        let sheet = book.get_active_sheet_mut();
        clear(sheet);
        populate(sheet, coins, insights, timestamp);

        save(&book, &self.path)
            .with_context(|| format!("Failed to save workbook {}", self.path.display()))?;

        info!(
            path = %self.path.display(),
            rows = coins.len(),
            "Spreadsheet updated successfully at {timestamp}"
        );
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Reading back
// ---------------------------------------------------------------------------

fn sheet_rows(sheet: &Worksheet) -> Vec<Vec<String>> {
    let (last_col, last_row) = sheet.get_highest_column_and_row();
    (1..=last_row)
        .map(|row| (1..=last_col).map(|col| sheet.get_value((col, row))).collect())
        .collect()
}

/// Read the active sheet of a workbook as rows of cell text.
pub fn read_rows(path: &Path) -> Result<Vec<Vec<String>>> {
    let book = reader::xlsx::read(path)
        .map_err(|e| anyhow!("Failed to open workbook {}: {e:?}", path.display()))?;
    Ok(sheet_rows(book.get_active_sheet()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
