//! Single fetch → analyze → write cycles for both outputs.
//!
//! The spreadsheet cycle never fails: every problem is logged and folded
//! into the returned `CycleReport` so the refresh loop keeps going. The
//! PDF run propagates write errors to the caller.

use anyhow::Result;
use chrono::Local;
use tracing::{error, info, warn};

use crate::analysis::compute_insights;
use crate::format::TIMESTAMP_FORMAT;
use crate::market::MarketDataSource;
use crate::output::pdf;
use crate::output::sheet::SheetUpdater;
use crate::types::{CycleReport, CycleStatus, FetchOutcome};

/// Message logged when a fetch produced nothing to render.
pub const NO_DATA_MESSAGE: &str = "No data available to generate the report.";

/// Run one spreadsheet refresh cycle.
pub async fn run_sheet_cycle(
    source: &dyn MarketDataSource,
    updater: &SheetUpdater,
    cycle_number: u64,
) -> CycleReport {
    info!(cycle = cycle_number, source = source.name(), "Fetching data and updating spreadsheet...");

    let outcome = source.fetch_snapshot().await;
    let coins_fetched = outcome.coin_count();
    let now = Local::now();

    let status = match outcome {
        FetchOutcome::Snapshot(coins) => {
            let insights = compute_insights(&coins);
            let timestamp = now.format(TIMESTAMP_FORMAT).to_string();
            match updater.update(&coins, &insights, &timestamp) {
                Ok(()) => CycleStatus::Updated,
                Err(e) => {
                    error!(
                        cycle = cycle_number,
                        path = %updater.path().display(),
                        error = format!("{e:#}"),
                        "Error updating spreadsheet"
                    );
                    CycleStatus::WriteFailed
                }
            }
        }
        FetchOutcome::NoData => {
            info!(cycle = cycle_number, "No data returned, skipping spreadsheet update");
            CycleStatus::NoData
        }
        FetchOutcome::Failed(_) => {
            warn!(cycle = cycle_number, "Fetch failed, skipping spreadsheet update");
            CycleStatus::FetchFailed
        }
    };

    CycleReport {
        cycle_number,
        coins_fetched,
        status,
        timestamp: now,
    }
}

/// What the one-shot PDF run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportOutcome {
    Written { path: String, coins: usize },
    NoData,
    FetchFailed,
}

/// Fetch once and write the PDF report to `path`.
///
/// No snapshot means no file is touched. A snapshot that cannot be
/// written is an error.
pub async fn run_pdf_report(source: &dyn MarketDataSource, path: &str) -> Result<ReportOutcome> {
    let outcome = match source.fetch_snapshot().await {
        FetchOutcome::Snapshot(coins) => coins,
        FetchOutcome::NoData => {
            info!("{NO_DATA_MESSAGE}");
            return Ok(ReportOutcome::NoData);
        }
        FetchOutcome::Failed(_) => {
            info!("{NO_DATA_MESSAGE}");
            return Ok(ReportOutcome::FetchFailed);
        }
    };

    let insights = compute_insights(&outcome);
    let generated_at = Local::now().format(TIMESTAMP_FORMAT).to_string();
    pdf::write_report(path, &insights, &generated_at)?;

    Ok(ReportOutcome::Written {
        path: path.to_string(),
        coins: outcome.len(),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
