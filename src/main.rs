//! COINSIGHT — live spreadsheet updater
//!
//! Entry point. Loads configuration, initialises structured logging,
//! and refreshes the workbook from CoinGecko every refresh interval
//! until Ctrl+C (or `sheet.max_cycles`).

use anyhow::Result;
use tracing::info;

use coinsight::config::{AppConfig, DEFAULT_CONFIG_FILE};
use coinsight::engine::cycle::run_sheet_cycle;
use coinsight::engine::scheduler::{shutdown_signal, RefreshScheduler};
use coinsight::logging::init_logging;
use coinsight::market::coingecko::CoinGeckoClient;
use coinsight::output::sheet::SheetUpdater;

const BANNER: &str = r#"
  ____ ___ ___ _   _ ____ ___ ____ _   _ _____
 / ___/ _ \_ _| \ | / ___|_ _/ ___| | | |_   _|
| |  | | | | ||  \| \___ \| | |  _| |_| | | |
| |__| |_| | || |\  |___) | | |_| |  _  | | |
 \____\___/___|_| \_|____/___\____|_| |_| |_|

  Live crypto market spreadsheet
"#;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Load .env file if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    init_logging();
    let cfg = AppConfig::load_or_default(DEFAULT_CONFIG_FILE)?;

    println!("{BANNER}");

    let client = CoinGeckoClient::new(&cfg.fetcher)?;
    let updater = SheetUpdater::new(&cfg.sheet.workbook_path);
    let scheduler = RefreshScheduler::new(cfg.sheet.refresh_interval(), cfg.sheet.max_cycles);

    info!(
        workbook = %cfg.sheet.workbook_path,
        interval_secs = cfg.sheet.refresh_interval_secs,
        max_cycles = ?cfg.sheet.max_cycles,
        "Updating spreadsheet every {} seconds. Press Ctrl+C to stop.",
        cfg.sheet.refresh_interval_secs
    );

    let shutdown = shutdown_signal(tokio::signal::ctrl_c());

    let summary = scheduler
        .run(|n| run_sheet_cycle(&client, &updater, n), shutdown)
        .await;

    info!(cycles = summary.cycles_run, "COINSIGHT shut down cleanly.");
    Ok(())
}
