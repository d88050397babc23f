//! Mock market data source for integration testing.
//!
//! Replays a scripted sequence of fetch outcomes, one per call, and
//! counts how often it was asked. Once the script runs out every call
//! returns `NoData`.

use async_trait::async_trait;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::VecDeque;
use std::sync::Mutex;

use coinsight::market::MarketDataSource;
use coinsight::types::{CoinRecord, FetchError, FetchOutcome};

pub struct MockSource {
    script: Mutex<VecDeque<FetchOutcome>>,
    calls: Mutex<u64>,
}

impl MockSource {
    pub fn new(script: Vec<FetchOutcome>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            calls: Mutex::new(0),
        }
    }

    /// A source that always has the default market.
    pub fn with_default_market(cycles: usize) -> Self {
        Self::new((0..cycles).map(|_| FetchOutcome::Snapshot(default_market())).collect())
    }

    pub fn calls(&self) -> u64 {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl MarketDataSource for MockSource {
    async fn fetch_snapshot(&self) -> FetchOutcome {
        *self.calls.lock().unwrap() += 1;
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(FetchOutcome::NoData)
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

pub fn coin(name: &str, symbol: &str, price: Decimal, cap: Decimal, change: Option<Decimal>) -> CoinRecord {
    CoinRecord {
        id: Some(name.to_lowercase()),
        name: name.to_string(),
        symbol: symbol.to_string(),
        current_price: Some(price),
        market_cap: Some(cap),
        total_volume: Some(cap / dec!(40)),
        price_change_percentage_24h: change,
    }
}

/// Seven coins in API order (already market-cap descending, as the
/// endpoint returns them) with known extremes.
pub fn default_market() -> Vec<CoinRecord> {
    vec![
        coin("Bitcoin", "btc", dec!(64000), dec!(1260000000000), Some(dec!(-1.2))),
        coin("Ethereum", "eth", dec!(3100), dec!(372000000000), Some(dec!(2.4))),
        coin("Tether", "usdt", dec!(1), dec!(110000000000), Some(dec!(0.01))),
        coin("BNB", "bnb", dec!(580), dec!(85000000000), Some(dec!(-0.5))),
        coin("Solana", "sol", dec!(150), dec!(70000000000), Some(dec!(6.8))),
        coin("XRP", "xrp", dec!(0.5), dec!(28000000000), None),
        coin("Dogecoin", "doge", dec!(0.12), dec!(17000000000), Some(dec!(-4.3))),
    ]
}

pub fn server_error() -> FetchOutcome {
    FetchOutcome::Failed(FetchError::Status {
        status: 500,
        body: "Internal Server Error".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_replays_script_then_no_data() {
        let source = MockSource::new(vec![FetchOutcome::Snapshot(default_market()), server_error()]);

        assert!(matches!(source.fetch_snapshot().await, FetchOutcome::Snapshot(_)));
        assert!(matches!(source.fetch_snapshot().await, FetchOutcome::Failed(_)));
        assert!(matches!(source.fetch_snapshot().await, FetchOutcome::NoData));
        assert_eq!(source.calls(), 3);
    }

    #[tokio::test]
    async fn test_default_market_shape() {
        let source = MockSource::with_default_market(1);
        assert_eq!(source.fetch_snapshot().await.coin_count(), 7);
        assert_eq!(source.name(), "mock");
    }
}
