//! Display helpers for money, percentages and timestamps.

use rust_decimal::{Decimal, RoundingStrategy};

/// Timestamp format used in the report, the spreadsheet and the logs.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Round half away from zero, the way people read prices.
fn round(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

/// Format a non-negative-or-negative decimal with thousands separators
/// and exactly `dp` fractional digits: `1234567.891` → `1,234,567.89`.
pub fn group_thousands(value: Decimal, dp: u32) -> String {
    let rounded = round(value, dp);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let text = format!("{:.*}", dp as usize, rounded.abs());

    let (int_part, frac_part) = match text.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (text.as_str(), None),
    };

    let mut grouped = String::with_capacity(text.len() + int_part.len() / 3 + 1);
    if negative {
        grouped.push('-');
    }
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if let Some(frac) = frac_part {
        grouped.push('.');
        grouped.push_str(frac);
    }
    grouped
}

/// `$1,234.56`
pub fn format_usd(value: Decimal) -> String {
    with_dollar(group_thousands(value, 2))
}

/// `$1,234` (whole dollars, used for market caps in summaries)
pub fn format_usd_whole(value: Decimal) -> String {
    with_dollar(group_thousands(value, 0))
}

/// `-1.23%`. A negative change that rounds to zero keeps its sign
/// (`-0.00%`), the way a `%.2f` float format prints it.
pub fn format_percent(value: Decimal) -> String {
    let rounded = round(value, 2);
    if rounded.is_zero() {
        let sign = if value.is_sign_negative() { "-" } else { "" };
        return format!("{sign}0.00%");
    }
    format!("{rounded:.2}%")
}

fn with_dollar(grouped: String) -> String {
    match grouped.strip_prefix('-') {
        Some(rest) => format!("-${rest}"),
        None => format!("${grouped}"),
    }
}
