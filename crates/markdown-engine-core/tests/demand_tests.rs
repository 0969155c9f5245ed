use chrono::NaiveDate;
use markdown_engine_core::demand::restock::{restock_recommendation, RestockPolicy, StockStatus};
use markdown_engine_core::demand::trend::{analyze_trend, DemandVolatility, SalesTrend};
use markdown_engine_core::{Category, Product, ProductId};
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn product(stock: u32, sales: &[i64]) -> Product {
    Product {
        id: ProductId::Text("PRD-204".into()),
        name: "Baby Spinach 250g".into(),
        category: Category::Produce,
        section: "Fruits & Vegetables".into(),
        brand: None,
        price: dec!(45),
        expiry_date: NaiveDate::from_ymd_opt(2025, 7, 1).unwrap(),
        stock,
        sales_last_7_days: sales.iter().map(|v| Decimal::from(*v)).collect(),
        typical_consumption_days: Some(5),
    }
}

// ===========================================================================
// Restock sizing
// ===========================================================================

#[test]
fn test_rising_steady_demand_orders_more() {
    let rec = restock_recommendation(&product(100, &[10, 10, 10, 12, 14, 14, 14]), &RestockPolicy::default());

    assert_eq!(rec.trend, SalesTrend::Increasing);
    assert_eq!(rec.volatility, DemandVolatility::Low);
    assert_eq!(rec.trend_multiplier, dec!(1.3));
    // 12/day x 8 days x 1.3 = 124.8
    assert_eq!(rec.recommended_quantity, 125);
    assert_eq!(rec.stock_status, StockStatus::Adequate);
    assert_eq!(
        rec.reasoning,
        "Based on 12.0 avg daily sales, 8 days supply, increasing trend (x1.3), low volatility (x1.0)"
    );
}

#[test]
fn test_falling_uneven_demand_orders_less() {
    let rec = restock_recommendation(&product(20, &[10, 10, 10, 7, 5, 5, 5]), &RestockPolicy::default());

    assert_eq!(rec.trend, SalesTrend::Decreasing);
    assert_eq!(rec.volatility, DemandVolatility::Medium);
    // 52/7 x 8 x 0.7 x 1.1 = 45.76
    assert_eq!(rec.recommended_quantity, 46);
    assert_eq!(rec.stock_status, StockStatus::Low);
}

#[test]
fn test_erratic_demand_adds_safety_stock() {
    let rec = restock_recommendation(&product(40, &[0, 20, 0, 20, 0, 20, 0]), &RestockPolicy::default());

    assert_eq!(rec.trend, SalesTrend::Stable);
    assert_eq!(rec.volatility, DemandVolatility::High);
    // 60/7 x 8 x 1.2 = 82.29
    assert_eq!(rec.recommended_quantity, 83);
}

#[test]
fn test_no_sales_falls_back_to_minimum_order() {
    let policy = RestockPolicy::default();

    let idle = restock_recommendation(&product(10, &[0; 7]), &policy);
    assert_eq!(idle.recommended_quantity, policy.minimum_order);
    assert_eq!(idle.stock_status, StockStatus::Excess);

    let empty = restock_recommendation(&product(0, &[0; 7]), &policy);
    assert_eq!(empty.stock_status, StockStatus::Adequate);
}

#[test]
fn test_custom_policy_changes_horizon() {
    let policy = RestockPolicy {
        target_days: 4,
        minimum_order: 1,
        ..RestockPolicy::default()
    };
    let rec = restock_recommendation(&product(10, &[3; 7]), &policy);
    assert_eq!(rec.recommended_quantity, 12);
    assert!(rec.reasoning.contains("4 days supply"));
}

// ===========================================================================
// Trend analysis
// ===========================================================================

#[test]
fn test_trend_analysis_figures() {
    let analysis = analyze_trend(&[dec!(4), dec!(4), dec!(4), dec!(4), dec!(2), dec!(2), dec!(2)]);
    assert_eq!(analysis.earlier_average, dec!(4));
    assert_eq!(analysis.recent_average, dec!(2));
    assert_eq!(analysis.trend_ratio, dec!(0.5));
    assert_eq!(analysis.trend, SalesTrend::Decreasing);
    assert!(analysis.trend.is_declining());
}

#[test]
fn test_flat_history_has_zero_variation() {
    let analysis = analyze_trend(&[dec!(6); 7]);
    assert_eq!(analysis.coefficient_of_variation, Decimal::ZERO);
    assert_eq!(analysis.volatility, DemandVolatility::Low);
    assert_eq!(analysis.trend, SalesTrend::Stable);
}
