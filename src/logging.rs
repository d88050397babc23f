//! Structured logging setup shared by both binaries.

use tracing_subscriber::{fmt, EnvFilter};

/// Env var that switches the output to JSON lines.
pub const JSON_LOG_ENV: &str = "COINSIGHT_LOG_JSON";

/// Initialise the `tracing` subscriber.
///
/// Filter comes from `RUST_LOG`, defaulting to `coinsight=info`.
pub fn init_logging() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("coinsight=info,pdf_report=info"));

    if std::env::var(JSON_LOG_ENV).is_ok() {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .init();
    } else {
        fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .init();
    }
}
