//! End-to-end refresh loop and report runs against the mock source.

use std::path::PathBuf;
use std::time::Duration;

use coinsight::analysis::compute_insights;
use coinsight::engine::cycle::{run_pdf_report, run_sheet_cycle, ReportOutcome};
use coinsight::engine::scheduler::{RefreshScheduler, StopReason};
use coinsight::output::sheet::{analysis_start_row, read_rows, SheetUpdater, HEADERS};
use coinsight::types::FetchOutcome;

use crate::mock_source::{default_market, server_error, MockSource};

fn temp_path(ext: &str) -> PathBuf {
    let mut p = std::env::temp_dir();
    p.push(format!("coinsight_it_{}.{ext}", uuid::Uuid::new_v4()));
    p
}

#[test]
fn test_insights_for_default_market() {
    let insights = compute_insights(&default_market());

    let names: Vec<&str> = insights.top5_by_market_cap.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Bitcoin", "Ethereum", "Tether", "BNB", "Solana"]);
    assert_eq!(insights.highest_24h_change.unwrap().name, "Solana");
    assert_eq!(insights.lowest_24h_change.unwrap().name, "Dogecoin");
}

#[tokio::test]
async fn test_refresh_loop_keeps_last_good_sheet() {
    let path = temp_path("xlsx");
    let updater = SheetUpdater::new(&path);
    let source = MockSource::new(vec![
        FetchOutcome::Snapshot(default_market()),
        server_error(),
        FetchOutcome::NoData,
    ]);
    let scheduler = RefreshScheduler::new(Duration::from_millis(1), Some(3));

    let summary = scheduler
        .run(|n| run_sheet_cycle(&source, &updater, n), std::future::pending::<()>())
        .await;

    assert_eq!(summary.cycles_run, 3);
    assert_eq!(summary.stopped_by, StopReason::MaxCycles);
    assert_eq!(source.calls(), 3);

    // Only the first cycle wrote; the failed and empty cycles left it alone.
    let rows = read_rows(&path).unwrap();
    assert_eq!(rows[0], HEADERS.iter().map(|h| h.to_string()).collect::<Vec<_>>());
    assert_eq!(rows[1][1], "Bitcoin");
    assert_eq!(rows[7][2], "DOGE");
    // XRP has no 24h change: the cell stays blank.
    assert_eq!(rows[6][6], "");

    let start = analysis_start_row(7) as usize;
    assert_eq!(start + 1, 11);
    assert_eq!(rows[start], vec!["Analysis", "Result", "", "", "", "", "", ""]);
    assert_eq!(rows[start + 3][1], "Solana: 6.80%");
    assert_eq!(rows[start + 4][1], "Dogecoin: -4.30%");

    std::fs::remove_file(&path).unwrap();
}

#[tokio::test]
async fn test_refresh_loop_rewrites_each_cycle() {
    let path = temp_path("xlsx");
    let updater = SheetUpdater::new(&path);
    let mut smaller = default_market();
    smaller.truncate(2);
    let source = MockSource::new(vec![
        FetchOutcome::Snapshot(default_market()),
        FetchOutcome::Snapshot(smaller),
    ]);
    let scheduler = RefreshScheduler::new(Duration::from_millis(1), Some(2));

    scheduler
        .run(|n| run_sheet_cycle(&source, &updater, n), std::future::pending::<()>())
        .await;

    let rows = read_rows(&path).unwrap();
    assert_eq!(rows[analysis_start_row(2) as usize][0], "Analysis");
    assert!(!rows.iter().flatten().any(|c| c == "Dogecoin"));

    std::fs::remove_file(&path).unwrap();
}

#[tokio::test]
async fn test_pdf_report_from_mock_source() {
    let path = temp_path("pdf");
    let path_str = path.to_string_lossy().to_string();
    let source = MockSource::with_default_market(1);

    let outcome = run_pdf_report(&source, &path_str).await.unwrap();

    assert_eq!(outcome, ReportOutcome::Written { path: path_str.clone(), coins: 7 });
    assert!(std::fs::read(&path).unwrap().starts_with(b"%PDF"));
    std::fs::remove_file(&path).unwrap();
}

#[tokio::test]
async fn test_pdf_report_empty_snapshot_writes_nothing() {
    let path = temp_path("pdf");
    let path_str = path.to_string_lossy().to_string();
    let source = MockSource::new(vec![FetchOutcome::NoData]);

    let outcome = run_pdf_report(&source, &path_str).await.unwrap();

    assert_eq!(outcome, ReportOutcome::NoData);
    assert!(!path.exists());
}
