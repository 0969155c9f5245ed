use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::temporal::average_daily_sales;
use crate::types::{Rate, Units};

/// Number of days at each end of the history compared for the trend.
const TREND_WINDOW: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SalesTrend {
    Increasing,
    SlightlyIncreasing,
    Stable,
    SlightlyDecreasing,
    Decreasing,
}

impl SalesTrend {
    pub fn as_str(&self) -> &'static str {
        match self {
            SalesTrend::Increasing => "increasing",
            SalesTrend::SlightlyIncreasing => "slightly_increasing",
            SalesTrend::Stable => "stable",
            SalesTrend::SlightlyDecreasing => "slightly_decreasing",
            SalesTrend::Decreasing => "decreasing",
        }
    }

    pub fn is_declining(&self) -> bool {
        matches!(self, SalesTrend::SlightlyDecreasing | SalesTrend::Decreasing)
    }
}

impl fmt::Display for SalesTrend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DemandVolatility {
    Low,
    Medium,
    High,
}

impl DemandVolatility {
    pub fn as_str(&self) -> &'static str {
        match self {
            DemandVolatility::Low => "low",
            DemandVolatility::Medium => "medium",
            DemandVolatility::High => "high",
        }
    }
}

impl fmt::Display for DemandVolatility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Trend and volatility of a sales history with the figures behind them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendAnalysis {
    pub trend: SalesTrend,
    pub volatility: DemandVolatility,
    pub recent_average: Units,
    pub earlier_average: Units,
    pub trend_ratio: Rate,
    pub coefficient_of_variation: Rate,
}

/// Analyse a sales history, oldest first.
pub fn analyze_trend(history: &[Units]) -> TrendAnalysis {
    let (recent_average, earlier_average, trend_ratio) = window_ratio(history);
    let coefficient_of_variation = coefficient_of_variation(history);

    TrendAnalysis {
        trend: sales_trend(history),
        volatility: demand_volatility(history),
        recent_average,
        earlier_average,
        trend_ratio,
        coefficient_of_variation,
    }
}

/// Compare the mean of the last three days against the first three. Fewer
/// than three points is stable.
pub fn sales_trend(history: &[Units]) -> SalesTrend {
    if history.len() < TREND_WINDOW {
        return SalesTrend::Stable;
    }
    let (_, _, ratio) = window_ratio(history);

    if ratio > dec!(1.3) {
        SalesTrend::Increasing
    } else if ratio > dec!(1.1) {
        SalesTrend::SlightlyIncreasing
    } else if ratio < dec!(0.7) {
        SalesTrend::Decreasing
    } else if ratio < dec!(0.9) {
        SalesTrend::SlightlyDecreasing
    } else {
        SalesTrend::Stable
    }
}

/// Classify the coefficient of variation. Fewer than two points is low.
pub fn demand_volatility(history: &[Units]) -> DemandVolatility {
    if history.len() < 2 {
        return DemandVolatility::Low;
    }
    let cv = coefficient_of_variation(history);

    if cv > dec!(0.5) {
        DemandVolatility::High
    } else if cv > dec!(0.3) {
        DemandVolatility::Medium
    } else {
        DemandVolatility::Low
    }
}

/// (recent mean, earlier mean, recent / earlier). A zero earlier mean
/// divides by one; a ratio too large to represent saturates.
fn window_ratio(history: &[Units]) -> (Units, Units, Rate) {
    if history.len() < TREND_WINDOW {
        return (Decimal::ZERO, Decimal::ZERO, Decimal::ONE);
    }
    let recent = average_daily_sales(&history[history.len() - TREND_WINDOW..]);
    let earlier = average_daily_sales(&history[..TREND_WINDOW]);
    let denominator = if earlier.is_zero() { Decimal::ONE } else { earlier };
    let ratio = recent.checked_div(denominator).unwrap_or(Decimal::MAX);
    (recent, earlier, ratio)
}

/// Population standard deviation over the mean. A zero mean divides by one.
fn coefficient_of_variation(history: &[Units]) -> Rate {
    if history.len() < 2 {
        return Decimal::ZERO;
    }
    let mean = average_daily_sales(history);
    let variance: Decimal = history
        .iter()
        .map(|x| (*x - mean) * (*x - mean))
        .sum::<Decimal>()
        / Decimal::from(history.len() as u64);
    let std_dev = variance.sqrt().unwrap_or(Decimal::ZERO);
    let denominator = if mean.is_zero() { Decimal::ONE } else { mean };
    std_dev.checked_div(denominator).unwrap_or(Decimal::MAX)
}
