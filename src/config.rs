//! Configuration loading from TOML.
//!
//! Reads `config.toml` and deserializes into strongly-typed structs.
//! Every key has a default matching the fixed CoinGecko endpoint,
//! output filenames and 5-minute refresh interval, so a missing file
//! simply means "run with defaults".

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::info;

/// Default config file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

/// Top-level application configuration.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub fetcher: FetcherConfig,
    pub report: ReportConfig,
    pub sheet: SheetConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct FetcherConfig {
    pub base_url: String,
    pub vs_currency: String,
    pub per_page: u32,
    pub page: u32,
    /// Request timeout. Unset means the HTTP client's default (none).
    pub timeout_secs: Option<u64>,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.coingecko.com/api/v3".to_string(),
            vs_currency: "usd".to_string(),
            per_page: 50,
            page: 1,
            timeout_secs: None,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ReportConfig {
    pub output_path: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output_path: "crypto_report.pdf".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SheetConfig {
    pub workbook_path: String,
    pub refresh_interval_secs: u64,
    /// Stop after this many cycles. `None` runs until Ctrl+C.
    pub max_cycles: Option<u64>,
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            workbook_path: "live_crypto_data.xlsx".to_string(),
            refresh_interval_secs: 300,
            max_cycles: None,
        }
    }
}

impl SheetConfig {
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path}"))?;
        Self::parse(&contents).with_context(|| format!("Failed to parse config file: {path}"))
    }

    /// Load from `path` if it exists, otherwise fall back to defaults.
    /// A file that exists but does not parse is still an error.
    pub fn load_or_default(path: &str) -> Result<Self> {
        if !Path::new(path).exists() {
            info!(path, "No config file found, using defaults");
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(contents: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(contents)?;
        if config.sheet.refresh_interval_secs == 0 {
            anyhow::bail!("sheet.refresh_interval_secs must be greater than zero");
        }
        Ok(config)
    }
}
