//! Integration tests.
//!
//! - `mock_source` — deterministic in-memory `MarketDataSource`
//! - `http_fetch` — CoinGecko client against a local axum server
//! - `pipeline` — scheduler + cycle runner + renderers end to end

mod http_fetch;
mod mock_source;
mod pipeline;
