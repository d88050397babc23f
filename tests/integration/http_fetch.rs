//! CoinGecko client against a local axum server.
//!
//! The server mounts `/api/v3/coins/markets` on an ephemeral port and
//! answers with a fixed status and body, recording the query string it
//! received.

use axum::extract::{RawQuery, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;
use rust_decimal_macros::dec;
use std::sync::{Arc, Mutex};

use coinsight::config::FetcherConfig;
use coinsight::market::coingecko::CoinGeckoClient;
use coinsight::market::MarketDataSource;
use coinsight::types::{FetchError, FetchOutcome};

#[derive(Clone)]
struct Canned {
    status: StatusCode,
    body: &'static str,
    seen_query: Arc<Mutex<Option<String>>>,
}

async fn markets(State(canned): State<Canned>, RawQuery(query): RawQuery) -> (StatusCode, String) {
    *canned.seen_query.lock().unwrap() = query;
    (canned.status, canned.body.to_string())
}

/// Start a server and return a fetcher config pointing at it.
async fn serve(status: StatusCode, body: &'static str) -> (FetcherConfig, Arc<Mutex<Option<String>>>) {
    let seen_query = Arc::new(Mutex::new(None));
    let app = Router::new()
        .route("/api/v3/coins/markets", get(markets))
        .with_state(Canned {
            status,
            body,
            seen_query: seen_query.clone(),
        });

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let cfg = FetcherConfig {
        base_url: format!("http://{addr}/api/v3"),
        timeout_secs: Some(5),
        ..FetcherConfig::default()
    };
    (cfg, seen_query)
}

const TWO_COINS: &str = r#"[
    {"id":"bitcoin","symbol":"btc","name":"Bitcoin","current_price":64000,"market_cap":1260000000000,"total_volume":31000000000,"price_change_percentage_24h":-1.2},
    {"id":"ethereum","symbol":"eth","name":"Ethereum","current_price":3100.5,"market_cap":372000000000,"total_volume":15000000000,"price_change_percentage_24h":null}
]"#;

#[tokio::test]
async fn test_fetch_success_decodes_snapshot() {
    let (cfg, seen_query) = serve(StatusCode::OK, TWO_COINS).await;
    let client = CoinGeckoClient::new(&cfg).unwrap();

    let outcome = client.fetch_snapshot().await;
    let coins = match outcome {
        FetchOutcome::Snapshot(coins) => coins,
        other => panic!("expected snapshot, got {other:?}"),
    };
    assert_eq!(coins.len(), 2);
    assert_eq!(coins[0].name, "Bitcoin");
    assert_eq!(coins[1].current_price, Some(dec!(3100.5)));
    assert_eq!(coins[1].price_change_percentage_24h, None);

    let query = seen_query.lock().unwrap().clone().unwrap();
    assert_eq!(
        query,
        "vs_currency=usd&order=market_cap_desc&per_page=50&page=1&sparkline=false"
    );
}

#[tokio::test]
async fn test_fetch_http_500_is_failed() {
    let (cfg, _) = serve(StatusCode::INTERNAL_SERVER_ERROR, "upstream exploded").await;
    let client = CoinGeckoClient::new(&cfg).unwrap();

    match client.fetch_snapshot().await {
        FetchOutcome::Failed(e) => {
            let msg = e.to_string();
            assert!(msg.contains("Error fetching data"), "{msg}");
            assert!(matches!(e, FetchError::Status { status: 500, .. }));
            assert!(msg.contains("upstream exploded"));
        }
        other => panic!("expected failure, got {other:?}"),
    }
}

#[tokio::test]
async fn test_fetch_rate_limited_is_failed() {
    let (cfg, _) = serve(StatusCode::TOO_MANY_REQUESTS, "").await;
    let client = CoinGeckoClient::new(&cfg).unwrap();

    let outcome = client.fetch_snapshot().await;
    assert!(matches!(outcome, FetchOutcome::Failed(FetchError::Status { status: 429, .. })));
}

#[tokio::test]
async fn test_fetch_empty_array_is_no_data() {
    let (cfg, _) = serve(StatusCode::OK, "[]").await;
    let client = CoinGeckoClient::new(&cfg).unwrap();

    assert!(matches!(client.fetch_snapshot().await, FetchOutcome::NoData));
}

#[tokio::test]
async fn test_fetch_garbage_body_is_failed() {
    let (cfg, _) = serve(StatusCode::OK, "{\"status\": \"not an array\"").await;
    let client = CoinGeckoClient::new(&cfg).unwrap();

    match client.fetch_snapshot().await {
        FetchOutcome::Failed(FetchError::Decode(msg)) => assert!(!msg.is_empty()),
        other => panic!("expected decode failure, got {other:?}"),
    }
}
