use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::policy::CategoryPolicy;
use crate::temporal::days_to_sell_stock;
use crate::types::{Product, Units};

/// Shelf-life ratio above which a product is fresh.
const FRESH_RATIO: Decimal = dec!(0.7);

/// How much of a product's useful life remains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShelfLifeStage {
    Fresh,
    Medium,
    Urgent,
    Critical,
    Expired,
}

impl ShelfLifeStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShelfLifeStage::Fresh => "fresh",
            ShelfLifeStage::Medium => "medium",
            ShelfLifeStage::Urgent => "urgent",
            ShelfLifeStage::Critical => "critical",
            ShelfLifeStage::Expired => "expired",
        }
    }
}

impl fmt::Display for ShelfLifeStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inventory risk relative to the time left to sell it, least to most.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockPressure {
    VeryLow,
    Low,
    Medium,
    High,
    VeryHigh,
}

impl StockPressure {
    pub fn as_str(&self) -> &'static str {
        match self {
            StockPressure::VeryLow => "very_low",
            StockPressure::Low => "low",
            StockPressure::Medium => "medium",
            StockPressure::High => "high",
            StockPressure::VeryHigh => "very_high",
        }
    }

    /// Scale applied to the stage's base discount.
    pub fn multiplier(&self) -> Decimal {
        match self {
            StockPressure::VeryHigh => dec!(1.8),
            StockPressure::High => dec!(1.4),
            StockPressure::Medium => dec!(1.1),
            StockPressure::Low => dec!(0.8),
            StockPressure::VeryLow => dec!(0.5),
        }
    }
}

impl fmt::Display for StockPressure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify remaining shelf life. Bands are checked most urgent first, so a
/// ratio sitting on a boundary takes the more urgent stage.
pub fn shelf_life_stage(
    product: &Product,
    days_to_expiry: i64,
    policy: &CategoryPolicy,
) -> ShelfLifeStage {
    if days_to_expiry <= 0 {
        return ShelfLifeStage::Expired;
    }

    let shelf_life = product
        .typical_consumption_days
        .unwrap_or(policy.max_shelf_life)
        .max(1);
    let ratio = Decimal::from(days_to_expiry) / Decimal::from(shelf_life);

    if ratio <= policy.critical_threshold {
        ShelfLifeStage::Critical
    } else if ratio <= policy.urgent_threshold {
        ShelfLifeStage::Urgent
    } else if ratio <= FRESH_RATIO {
        ShelfLifeStage::Medium
    } else {
        ShelfLifeStage::Fresh
    }
}

/// Classify stock against the days left to sell it. Stock that never sells
/// through is always very high pressure.
pub fn stock_pressure(stock: u32, days_to_expiry: i64, avg_daily_sales: Units) -> StockPressure {
    let days_to_sell = match days_to_sell_stock(stock, avg_daily_sales) {
        Some(days) => Decimal::from(days),
        None => return StockPressure::VeryHigh,
    };
    let ratio = days_to_sell / Decimal::from(days_to_expiry.max(1));

    if ratio > dec!(2.0) {
        StockPressure::VeryHigh
    } else if ratio > dec!(1.5) {
        StockPressure::High
    } else if ratio > dec!(1.0) {
        StockPressure::Medium
    } else if ratio > dec!(0.5) {
        StockPressure::Low
    } else {
        StockPressure::VeryLow
    }
}
