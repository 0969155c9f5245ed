use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::types::Units;

const SECONDS_PER_DAY: i64 = 86_400;

/// Whole days from `reference` until `expiry`. Negative once the product has
/// expired.
pub fn days_until_expiry(expiry: NaiveDate, reference: NaiveDate) -> i64 {
    (expiry - reference).num_days()
}

/// Days until expiry measured from a timestamp. Partial days round up, so a
/// product with 23 hours left still has 1 day.
///
/// The expiry date is taken to begin at midnight.
pub fn days_until_expiry_at(expiry: NaiveDate, reference: NaiveDateTime) -> i64 {
    let expiry_start = expiry.and_time(chrono::NaiveTime::MIN);
    let seconds = (expiry_start - reference).num_seconds();
    // ceil(seconds / day) for either sign
    -((-seconds).div_euclid(SECONDS_PER_DAY))
}

/// Arithmetic mean of the sales history; zero for an empty history.
pub fn average_daily_sales(history: &[Units]) -> Units {
    if history.is_empty() {
        return Decimal::ZERO;
    }
    let total: Decimal = history.iter().sum();
    total / Decimal::from(history.len() as u64)
}

/// Days needed to sell `stock` at `avg_daily_sales`.
///
/// `None` means the stock never sells through (no sales velocity). Results
/// too large for a decimal or a `u64` saturate at `u64::MAX`.
pub fn days_to_sell_stock(stock: u32, avg_daily_sales: Units) -> Option<u64> {
    if avg_daily_sales <= Decimal::ZERO {
        return None;
    }
    let days = Decimal::from(stock)
        .checked_div(avg_daily_sales)
        .and_then(|d| d.ceil().to_u64())
        .unwrap_or(u64::MAX);
    Some(days)
}
