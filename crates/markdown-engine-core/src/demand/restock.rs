use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::demand::trend::{analyze_trend, DemandVolatility, SalesTrend};
use crate::temporal::average_daily_sales;
use crate::error::MarkdownError;
use crate::types::{Product, ProductId, Rate, Units};
use crate::MarkdownResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Ordering parameters for the next batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RestockPolicy {
    /// Days of supply a new batch should cover
    pub target_days: u32,
    /// Smallest order ever recommended
    pub minimum_order: u32,
    pub increasing: Rate,
    pub slightly_increasing: Rate,
    pub stable: Rate,
    pub slightly_decreasing: Rate,
    pub decreasing: Rate,
    pub low_volatility: Rate,
    pub medium_volatility: Rate,
    pub high_volatility: Rate,
}

impl Default for RestockPolicy {
    fn default() -> Self {
        RestockPolicy {
            target_days: 8,
            minimum_order: 5,
            increasing: dec!(1.3),
            slightly_increasing: dec!(1.15),
            stable: dec!(1.0),
            slightly_decreasing: dec!(0.85),
            decreasing: dec!(0.7),
            low_volatility: dec!(1.0),
            medium_volatility: dec!(1.1),
            high_volatility: dec!(1.2),
        }
    }
}

impl RestockPolicy {
    pub fn validate(&self) -> MarkdownResult<()> {
        if self.target_days == 0 {
            return Err(MarkdownError::InvalidInput {
                field: "restock.target_days".into(),
                reason: "Target days of supply must be at least one day.".into(),
            });
        }
        let multipliers = [
            ("increasing", self.increasing),
            ("slightly_increasing", self.slightly_increasing),
            ("stable", self.stable),
            ("slightly_decreasing", self.slightly_decreasing),
            ("decreasing", self.decreasing),
            ("low_volatility", self.low_volatility),
            ("medium_volatility", self.medium_volatility),
            ("high_volatility", self.high_volatility),
        ];
        for (name, value) in multipliers {
            if value < Decimal::ZERO {
                return Err(MarkdownError::InvalidInput {
                    field: format!("restock.{name}"),
                    reason: "Multipliers cannot be negative.".into(),
                });
            }
        }
        Ok(())
    }

    pub fn trend_multiplier(&self, trend: SalesTrend) -> Rate {
        match trend {
            SalesTrend::Increasing => self.increasing,
            SalesTrend::SlightlyIncreasing => self.slightly_increasing,
            SalesTrend::Stable => self.stable,
            SalesTrend::SlightlyDecreasing => self.slightly_decreasing,
            SalesTrend::Decreasing => self.decreasing,
        }
    }

    /// Safety stock grows with demand volatility.
    pub fn volatility_multiplier(&self, volatility: DemandVolatility) -> Rate {
        match volatility {
            DemandVolatility::Low => self.low_volatility,
            DemandVolatility::Medium => self.medium_volatility,
            DemandVolatility::High => self.high_volatility,
        }
    }
}

/// Stock on hand measured in days of average sales.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    Critical,
    Low,
    Adequate,
    Excess,
}

impl StockStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StockStatus::Critical => "critical",
            StockStatus::Low => "low",
            StockStatus::Adequate => "adequate",
            StockStatus::Excess => "excess",
        }
    }
}

impl fmt::Display for StockStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestockRecommendation {
    pub product_id: ProductId,
    pub recommended_quantity: u32,
    pub reasoning: String,
    pub current_stock: u32,
    pub stock_status: StockStatus,
    pub avg_daily_sales: Units,
    pub trend: SalesTrend,
    pub volatility: DemandVolatility,
    pub trend_multiplier: Rate,
    pub volatility_multiplier: Rate,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Size the next batch from sales velocity, trend and volatility.
pub fn restock_recommendation(product: &Product, policy: &RestockPolicy) -> RestockRecommendation {
    let avg = average_daily_sales(&product.sales_last_7_days);
    let analysis = analyze_trend(&product.sales_last_7_days);
    let trend_multiplier = policy.trend_multiplier(analysis.trend);
    let volatility_multiplier = policy.volatility_multiplier(analysis.volatility);

    let raw = avg * Decimal::from(policy.target_days) * trend_multiplier * volatility_multiplier;
    let recommended_quantity = raw
        .max(Decimal::ZERO)
        .ceil()
        .to_u32()
        .unwrap_or(u32::MAX)
        .max(policy.minimum_order);

    let reasoning = format!(
        "Based on {:.1} avg daily sales, {} days supply, {} trend (x{}), {} volatility (x{})",
        avg,
        policy.target_days,
        analysis.trend,
        trend_multiplier,
        analysis.volatility,
        volatility_multiplier
    );

    RestockRecommendation {
        product_id: product.id.clone(),
        recommended_quantity,
        reasoning,
        current_stock: product.stock,
        stock_status: stock_status(product.stock, avg, policy.target_days),
        avg_daily_sales: avg,
        trend: analysis.trend,
        volatility: analysis.volatility,
        trend_multiplier,
        volatility_multiplier,
    }
}

/// Classify stock by days of supply. Stock that does not sell is excess;
/// no stock and no sales is adequate.
pub fn stock_status(stock: u32, avg_daily_sales: Units, target_days: u32) -> StockStatus {
    if avg_daily_sales <= Decimal::ZERO {
        return if stock == 0 {
            StockStatus::Adequate
        } else {
            StockStatus::Excess
        };
    }
    let days_of_supply = match Decimal::from(stock).checked_div(avg_daily_sales) {
        Some(days) => days,
        None => return StockStatus::Excess,
    };

    if days_of_supply < Decimal::ONE {
        StockStatus::Critical
    } else if days_of_supply < dec!(3) {
        StockStatus::Low
    } else if days_of_supply > Decimal::from(target_days) * dec!(2) {
        StockStatus::Excess
    } else {
        StockStatus::Adequate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Category;
    use chrono::NaiveDate;

    fn product(stock: u32, sales: &[i64]) -> Product {
        Product {
            id: ProductId::Text("BRD-01".into()),
            name: "Modern Brown Bread".into(),
            category: Category::Bakery,
            section: "Bakery".into(),
            brand: Some("Modern".into()),
            price: dec!(40),
            expiry_date: NaiveDate::from_ymd_opt(2025, 6, 29).unwrap(),
            stock,
            sales_last_7_days: sales.iter().map(|v| Decimal::from(*v)).collect(),
            typical_consumption_days: Some(3),
        }
    }

    #[test]
    fn test_stable_low_volatility_orders_target_days() {
        let rec = restock_recommendation(&product(30, &[10, 10, 10, 10, 10, 10, 10]), &RestockPolicy::default());
        assert_eq!(rec.trend, SalesTrend::Stable);
        assert_eq!(rec.volatility, DemandVolatility::Low);
        assert_eq!(rec.recommended_quantity, 80);
        assert_eq!(rec.stock_status, StockStatus::Adequate);
        assert_eq!(rec.current_stock, 30);
        assert!(rec.reasoning.starts_with("Based on 10.0 avg daily sales, 8 days supply"));
    }

    #[test]
    fn test_increasing_trend_orders_more() {
        // avg 12, increasing (ratio 1.4) -> 12 * 8 * 1.3 = 124.8
        let rec = restock_recommendation(&product(30, &[10, 10, 10, 12, 14, 14, 14]), &RestockPolicy::default());
        assert_eq!(rec.trend, SalesTrend::Increasing);
        assert_eq!(rec.volatility, DemandVolatility::Low);
        assert_eq!(rec.recommended_quantity, 125);
    }

    #[test]
    fn test_minimum_order_floor() {
        let rec = restock_recommendation(&product(0, &[0, 0, 0, 0, 0, 0, 0]), &RestockPolicy::default());
        assert_eq!(rec.recommended_quantity, 5);
        assert_eq!(rec.stock_status, StockStatus::Adequate);
    }

    #[test]
    fn test_stock_status_bands() {
        assert_eq!(stock_status(4, dec!(5), 8), StockStatus::Critical);
        assert_eq!(stock_status(10, dec!(5), 8), StockStatus::Low);
        assert_eq!(stock_status(40, dec!(5), 8), StockStatus::Adequate);
        assert_eq!(stock_status(90, dec!(5), 8), StockStatus::Excess);
        assert_eq!(stock_status(3, Decimal::ZERO, 8), StockStatus::Excess);
    }

    #[test]
    fn test_policy_validation() {
        assert!(RestockPolicy::default().validate().is_ok());
        let negative = RestockPolicy {
            high_volatility: dec!(-0.5),
            ..RestockPolicy::default()
        };
        match negative.validate() {
            Err(MarkdownError::InvalidInput { field, .. }) => {
                assert_eq!(field, "restock.high_volatility")
            }
            other => panic!("expected invalid input, got {other:?}"),
        }
        let no_horizon = RestockPolicy {
            target_days: 0,
            ..RestockPolicy::default()
        };
        assert!(no_horizon.validate().is_err());
    }

    #[test]
    fn test_vanishing_sales_count_as_excess() {
        assert_eq!(
            stock_status(10, dec!(0.0000000000000000000000000001), 8),
            StockStatus::Excess
        );
    }

    #[test]
    fn test_negative_multiplier_never_inflates_order() {
        let policy = RestockPolicy {
            stable: dec!(-1),
            ..RestockPolicy::default()
        };
        let rec = restock_recommendation(&product(30, &[10, 10, 10, 10, 10, 10, 10]), &policy);
        assert_eq!(rec.recommended_quantity, policy.minimum_order);
    }
}
