//! Insight calculator.
//!
//! Turns one snapshot of coin records into the fixed set of insights
//! shown by both renderers: top five by market cap, average price and
//! the largest 24h gain and loss.
//!
//! Pure and deterministic. Missing numeric fields count as zero. For an
//! empty snapshot the result is an empty top-five list, an average of
//! zero and no highest/lowest move.

use rust_decimal::Decimal;
use std::cmp::Ordering;

use crate::types::{CoinRecord, InsightSet, PriceMove, RankedCoin};

/// How many coins the market-cap ranking keeps.
pub const TOP_N: usize = 5;

/// Compute every insight for a snapshot.
pub fn compute_insights(coins: &[CoinRecord]) -> InsightSet {
    InsightSet {
        top5_by_market_cap: top_by_market_cap(coins, TOP_N),
        average_price: average_price(coins),
        highest_24h_change: extreme_change(coins, Ordering::Greater),
        lowest_24h_change: extreme_change(coins, Ordering::Less),
    }
}

/// The `n` largest coins by market cap, descending.
///
/// `sort_by` is stable, so coins with equal caps keep their input order.
pub fn top_by_market_cap(coins: &[CoinRecord], n: usize) -> Vec<RankedCoin> {
    let mut ranked: Vec<RankedCoin> = coins
        .iter()
        .map(|c| RankedCoin {
            name: c.name.clone(),
            market_cap: c.market_cap_or_zero(),
        })
        .collect();
    ranked.sort_by(|a, b| b.market_cap.cmp(&a.market_cap));
    ranked.truncate(n);
    ranked
}

/// Arithmetic mean of `current_price`; zero when there are no coins.
pub fn average_price(coins: &[CoinRecord]) -> Decimal {
    if coins.is_empty() {
        return Decimal::ZERO;
    }
    let total: Decimal = coins.iter().map(CoinRecord::price_or_zero).sum();
    total / Decimal::from(coins.len())
}

/// First coin whose 24h change compares `wanted` against every coin
/// kept so far. `Greater` finds the maximum, `Less` the minimum.
fn extreme_change(coins: &[CoinRecord], wanted: Ordering) -> Option<PriceMove> {
    let best = coins.iter().fold(None::<&CoinRecord>, |best, coin| match best {
        Some(b) if coin.change_24h_or_zero().cmp(&b.change_24h_or_zero()) != wanted => Some(b),
        _ => Some(coin),
    })?;

    Some(PriceMove {
        name: best.name.clone(),
        change_pct: best.change_24h_or_zero(),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
