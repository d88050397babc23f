//! Shared types for COINSIGHT.
//!
//! These types form the data model used across all modules: the raw
//! coin records decoded from the market-data API, the derived insight
//! set, and the per-cycle outcome types.

use chrono::{DateTime, Local};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::fmt;

use crate::format::{format_percent, format_usd};

// ---------------------------------------------------------------------------
// Coin record
// ---------------------------------------------------------------------------

/// One coin from the `/coins/markets` endpoint.
///
/// Numeric fields are optional because the API sends `null` for coins
/// with incomplete data. Calculations treat an absent value as zero;
/// the spreadsheet writes it as a blank cell.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CoinRecord {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    pub symbol: String,
    #[serde(default)]
    pub current_price: Option<Decimal>,
    #[serde(default)]
    pub market_cap: Option<Decimal>,
    #[serde(default)]
    pub total_volume: Option<Decimal>,
    #[serde(default)]
    pub price_change_percentage_24h: Option<Decimal>,
}

impl CoinRecord {
    pub fn price_or_zero(&self) -> Decimal {
        self.current_price.unwrap_or_default()
    }

    pub fn market_cap_or_zero(&self) -> Decimal {
        self.market_cap.unwrap_or_default()
    }

    pub fn change_24h_or_zero(&self) -> Decimal {
        self.price_change_percentage_24h.unwrap_or_default()
    }

    /// Helper to build a test/sample record with sensible defaults.
    #[cfg(test)]
    pub fn sample(name: &str, market_cap: Decimal) -> Self {
        CoinRecord {
            id: Some(name.to_lowercase()),
            name: name.to_string(),
            symbol: name.chars().take(3).collect::<String>().to_lowercase(),
            current_price: Some(Decimal::ONE),
            market_cap: Some(market_cap),
            total_volume: Some(Decimal::ZERO),
            price_change_percentage_24h: Some(Decimal::ZERO),
        }
    }
}

impl fmt::Display for CoinRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}) {} | mcap {} | 24h {}",
            self.name,
            self.symbol.to_uppercase(),
            format_usd(self.price_or_zero()),
            format_usd(self.market_cap_or_zero()),
            format_percent(self.change_24h_or_zero()),
        )
    }
}

// ---------------------------------------------------------------------------
// Insights
// ---------------------------------------------------------------------------

/// A coin name paired with its market capitalisation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedCoin {
    pub name: String,
    pub market_cap: Decimal,
}

/// A coin name paired with its 24h percentage change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceMove {
    pub name: String,
    pub change_pct: Decimal,
}

impl fmt::Display for PriceMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, format_percent(self.change_pct))
    }
}

/// Summary statistics derived from one snapshot.
///
/// Empty input yields an empty `top5_by_market_cap`, a zero
/// `average_price` and `None` for both moves. Renderers show a missing
/// move as `N/A` at `0.00%`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsightSet {
    pub top5_by_market_cap: Vec<RankedCoin>,
    pub average_price: Decimal,
    pub highest_24h_change: Option<PriceMove>,
    pub lowest_24h_change: Option<PriceMove>,
}

/// Placeholder name shown when no move exists.
pub const NOT_AVAILABLE: &str = "N/A";

impl InsightSet {
    /// The highest move, or the `N/A` placeholder.
    pub fn highest_or_placeholder(&self) -> PriceMove {
        self.highest_24h_change.clone().unwrap_or_else(PriceMove::placeholder)
    }

    /// The lowest move, or the `N/A` placeholder.
    pub fn lowest_or_placeholder(&self) -> PriceMove {
        self.lowest_24h_change.clone().unwrap_or_else(PriceMove::placeholder)
    }
}

impl PriceMove {
    pub fn placeholder() -> Self {
        Self {
            name: NOT_AVAILABLE.to_string(),
            change_pct: Decimal::ZERO,
        }
    }
}

// ---------------------------------------------------------------------------
// Fetch outcome
// ---------------------------------------------------------------------------

/// Why a fetch produced no snapshot.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Error fetching data: request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("Error fetching data: HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Error fetching data: invalid response body: {0}")]
    Decode(String),
}

/// Result of one fetch call.
///
/// Keeps "the API answered with nothing" apart from "the API could not
/// be reached", so a transient outage is never mistaken for an empty
/// market.
#[derive(Debug)]
pub enum FetchOutcome {
    Snapshot(Vec<CoinRecord>),
    NoData,
    Failed(FetchError),
}

impl FetchOutcome {
    /// Wrap a decoded list, mapping an empty list to `NoData`.
    pub fn from_records(records: Vec<CoinRecord>) -> Self {
        if records.is_empty() {
            FetchOutcome::NoData
        } else {
            FetchOutcome::Snapshot(records)
        }
    }

    /// Number of coins fetched (zero unless a snapshot).
    pub fn coin_count(&self) -> usize {
        match self {
            FetchOutcome::Snapshot(coins) => coins.len(),
            _ => 0,
        }
    }
}

// ---------------------------------------------------------------------------
// Cycle report
// ---------------------------------------------------------------------------

/// How a refresh cycle ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleStatus {
    /// Output written from a fresh snapshot.
    Updated,
    /// The API returned an empty list; output left as is.
    NoData,
    /// The fetch failed; output left as is.
    FetchFailed,
    /// The snapshot was fetched but writing the output failed.
    WriteFailed,
}

impl fmt::Display for CycleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CycleStatus::Updated => write!(f, "updated"),
            CycleStatus::NoData => write!(f, "no-data"),
            CycleStatus::FetchFailed => write!(f, "fetch-failed"),
            CycleStatus::WriteFailed => write!(f, "write-failed"),
        }
    }
}

/// Summary of a single fetch→analyze→write cycle.
#[derive(Debug, Clone)]
pub struct CycleReport {
    pub cycle_number: u64,
    pub coins_fetched: usize,
    pub status: CycleStatus,
    pub timestamp: DateTime<Local>,
}

impl fmt::Display for CycleReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Cycle {} @ {}: {} coins, {}",
            self.cycle_number,
            self.timestamp.format(crate::format::TIMESTAMP_FORMAT),
            self.coins_fetched,
            self.status,
        )
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
