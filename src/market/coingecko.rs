//! CoinGecko market data.
//!
//! One call per cycle to the public `/coins/markets` endpoint for the
//! first page of coins ordered by market cap.
//!
//! API: `https://api.coingecko.com/api/v3/coins/markets`
//! Auth: None required for the public tier.
//! Rate limit: roughly 10–30 calls/minute on the free tier, far above
//! one call every five minutes.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, error, info};

use super::MarketDataSource;
use crate::config::FetcherConfig;
use crate::types::{CoinRecord, FetchError, FetchOutcome};

const SOURCE_NAME: &str = "coingecko";

/// Longest slice of an error body kept in a `FetchError`.
const MAX_ERROR_BODY: usize = 200;

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// CoinGecko `/coins/markets` client.
pub struct CoinGeckoClient {
    http: Client,
    url: String,
}

impl CoinGeckoClient {
    pub fn new(cfg: &FetcherConfig) -> Result<Self> {
        let mut builder = Client::builder().user_agent("COINSIGHT/0.1.0");
        if let Some(secs) = cfg.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder
            .build()
            .context("Failed to build HTTP client for CoinGecko")?;

        Ok(Self {
            http,
            url: Self::markets_url(cfg),
        })
    }

    /// Full request URL, query string included.
    fn markets_url(cfg: &FetcherConfig) -> String {
        format!(
            "{}/coins/markets?vs_currency={}&order=market_cap_desc&per_page={}&page={}&sparkline=false",
            cfg.base_url.trim_end_matches('/'),
            urlencoding::encode(&cfg.vs_currency),
            cfg.per_page,
            cfg.page,
        )
    }

    async fn request(&self) -> Result<Vec<CoinRecord>, FetchError> {
        debug!(url = %self.url, "Fetching CoinGecko markets");

        let resp = self
            .http
            .get(&self.url)
            .send()
            .await
            .map_err(FetchError::Transport)?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let mut body = resp.text().await.unwrap_or_default();
            if body.len() > MAX_ERROR_BODY {
                let cut = (0..=MAX_ERROR_BODY).rev().find(|&i| body.is_char_boundary(i)).unwrap_or(0);
                body.truncate(cut);
            }
            return Err(FetchError::Status { status, body });
        }

        let body = resp.text().await.map_err(FetchError::Transport)?;
        serde_json::from_str(&body).map_err(|e| FetchError::Decode(e.to_string()))
    }
}

#[async_trait]
impl MarketDataSource for CoinGeckoClient {
    async fn fetch_snapshot(&self) -> FetchOutcome {
        info!(source = SOURCE_NAME, "Fetching market data");
        match self.request().await {
            Ok(coins) => {
                info!(source = SOURCE_NAME, count = coins.len(), "Market data fetched");
                for coin in &coins {
                    debug!(id = coin.id.as_deref().unwrap_or("-"), "{coin}");
                }
                FetchOutcome::from_records(coins)
            }
            Err(e) => {
                error!(source = SOURCE_NAME, error = %e, "Error fetching data");
                FetchOutcome::Failed(e)
            }
        }
    }

    fn name(&self) -> &'static str {
        SOURCE_NAME
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
