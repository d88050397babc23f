//! Market data sources.
//!
//! Defines the `MarketDataSource` trait and the CoinGecko implementation
//! used by both binaries. The cycle runner only sees the trait, so tests
//! can substitute a deterministic source.

pub mod coingecko;

use async_trait::async_trait;

use crate::types::FetchOutcome;

/// Abstraction over a provider of coin market snapshots.
///
/// Implementations never return an error: transport and decoding
/// failures are folded into `FetchOutcome::Failed` and logged there.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// Fetch the current snapshot.
    async fn fetch_snapshot(&self) -> FetchOutcome;

    /// Source name for logging and identification.
    fn name(&self) -> &'static str;
}
