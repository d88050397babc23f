//! One-shot PDF market report.
//!
//! Fetches the current top-50 snapshot once, writes the report to
//! `report.output_path` and exits. A write failure exits non-zero.

use anyhow::Result;
use tracing::info;

use coinsight::config::{AppConfig, DEFAULT_CONFIG_FILE};
use coinsight::engine::cycle::{run_pdf_report, ReportOutcome};
use coinsight::logging::init_logging;
use coinsight::market::coingecko::CoinGeckoClient;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let _ = dotenv::dotenv();

    init_logging();
    let cfg = AppConfig::load_or_default(DEFAULT_CONFIG_FILE)?;

    let client = CoinGeckoClient::new(&cfg.fetcher)?;

    match run_pdf_report(&client, &cfg.report.output_path).await? {
        ReportOutcome::Written { path, coins } => info!(path = %path, coins, "Report complete"),
        ReportOutcome::NoData | ReportOutcome::FetchFailed => {}
    }

    Ok(())
}
