use chrono::{Duration, NaiveDate};
use markdown_engine_core::pricing::classifier::{ShelfLifeStage, StockPressure};
use markdown_engine_core::pricing::discount::{calculate_discount, recommend_discount};
use markdown_engine_core::pricing::financial::{discounted_price, potential_loss};
use markdown_engine_core::policy::{PolicyTable, SeasonalCalendar};
use markdown_engine_core::{Action, Category, Engine, EngineConfig, MarkdownError, Product, ProductId, Urgency};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ===========================================================================
// Discount recommendation scenarios
// ===========================================================================

fn today() -> NaiveDate {
    // Thursday; every built-in seasonal factor is neutral in October
    NaiveDate::from_ymd_opt(2025, 10, 2).unwrap()
}

fn product(category: &str, days_left: i64, stock: u32, sales: Vec<Decimal>) -> Product {
    Product {
        id: ProductId::Number(1),
        name: "Catalog Item".into(),
        category: Category::from(category),
        section: "Aisle 1".into(),
        brand: None,
        price: dec!(100),
        expiry_date: today() + Duration::days(days_left),
        stock,
        sales_last_7_days: sales,
        typical_consumption_days: None,
    }
}

#[test]
fn test_expired_dairy_scenario() {
    let p = product("dairy", -1, 10, vec![dec!(5); 7]);
    let rec = calculate_discount(&p, today(), &PolicyTable::default());
    let policy = PolicyTable::default().resolve(&Category::Dairy).clone();

    assert_eq!(rec.analytics.shelf_life_stage, ShelfLifeStage::Expired);
    assert_eq!(rec.urgency, Urgency::Critical);
    assert_eq!(rec.action, Action::ImmediateClearance);
    assert_eq!(
        rec.discount,
        (policy.max_discount + 10).min(policy.max_discount + 15)
    );
}

#[test]
fn test_fresh_low_stock_scenario() {
    let mut p = product("produce", 9, 2, vec![dec!(1); 7]);
    p.typical_consumption_days = Some(10);
    let rec = calculate_discount(&p, today(), &PolicyTable::default());

    assert_eq!(rec.analytics.shelf_life_stage, ShelfLifeStage::Fresh);
    assert_eq!(rec.analytics.stock_pressure, StockPressure::VeryLow);
    assert_eq!(rec.analytics.days_to_sell_stock, Some(2));
    assert_eq!(rec.discount, 0);
    assert_eq!(rec.action, Action::NoAction);
    assert_eq!(rec.reason, "Fresh product with low stock — no discount needed");
}

#[test]
fn test_zero_sales_large_stock_scenario() {
    for category in ["dairy", "produce", "bakery", "meat", "prepared", "snacks"] {
        let p = product(category, 1, 50, vec![Decimal::ZERO; 7]);
        let rec = calculate_discount(&p, today(), &PolicyTable::default());
        assert_eq!(rec.analytics.avg_daily_sales, Decimal::ZERO);
        assert_eq!(rec.analytics.days_to_sell_stock, None);
        assert_eq!(rec.analytics.stock_pressure, StockPressure::VeryHigh, "{category}");
        assert!(rec.urgency >= Urgency::High, "{category}: {:?}", rec.urgency);
    }
}

#[test]
fn test_vanishing_sales_velocity_is_very_high_pressure() {
    let mut sales = vec![Decimal::ZERO; 6];
    sales.push(dec!(0.0000000000000000000000000007));
    let p = product("dairy", 5, 10, sales);

    let rec = calculate_discount(&p, today(), &PolicyTable::default());
    assert_eq!(rec.analytics.days_to_sell_stock, Some(u64::MAX));
    assert_eq!(rec.analytics.stock_pressure, StockPressure::VeryHigh);

    let metrics = Engine::default().performance_metrics(&p, today()).unwrap();
    assert_eq!(metrics.result.recommendation.discount, rec.discount);
}

#[test]
fn test_very_high_pressure_escalates_above_base_tier() {
    // produce, 10-day shelf life: 3 days -> 0.3 urgent, base 30
    let heavy = product("produce", 3, 100, vec![dec!(2); 7]);
    let light = product("produce", 3, 4, vec![dec!(2); 7]);
    let policies = PolicyTable::default();

    let heavy_rec = calculate_discount(&heavy, today(), &policies);
    let light_rec = calculate_discount(&light, today(), &policies);
    assert_eq!(heavy_rec.analytics.stock_pressure, StockPressure::VeryHigh);
    assert_eq!(light_rec.analytics.stock_pressure, StockPressure::Low);
    // 30 x 1.8 x 1.3 = 70.2, held at the 70 clearance tier
    assert_eq!(heavy_rec.discount, 70);
    // 30 x 0.8 x 1.3 = 31.2
    assert_eq!(light_rec.discount, 31);
    assert_eq!(heavy_rec.urgency, light_rec.urgency);
}

#[test]
fn test_unknown_category_uses_default_policy_silently() {
    let p = product("household", 3, 100, vec![dec!(2); 7]);
    let rec = calculate_discount(&p, today(), &PolicyTable::default());
    assert_eq!(rec.analytics.perishability_factor, Decimal::ONE);
    assert!(rec.discount <= 40 + 15);
}

#[test]
fn test_seasonal_neutral_date_matches_unadjusted() {
    let p = product("bakery", 2, 10, vec![dec!(4); 7]);
    let plain = calculate_discount(&p, today(), &PolicyTable::default());
    let seasonal = recommend_discount(
        &p,
        today(),
        &PolicyTable::default(),
        &SeasonalCalendar::default(),
    );
    assert_eq!(plain.discount, seasonal.discount);
    assert_eq!(seasonal.pre_seasonal_discount, plain.discount);
    assert_eq!(plain.reason, seasonal.reason);
}

// ===========================================================================
// Financial projection
// ===========================================================================

#[test]
fn test_discounted_price_identities() {
    for price in [dec!(1), dec!(28), dec!(145.50)] {
        assert_eq!(discounted_price(price, 0), price);
        assert_eq!(discounted_price(price, 100), Decimal::ZERO);
    }
}

#[test]
fn test_potential_loss_never_negative() {
    for days in -5..20 {
        for stock in [0u32, 1, 10, 200] {
            let p = product("meat", days, stock, vec![dec!(3); 7]);
            let loss = potential_loss(&p, today());
            assert!(loss.potential_unsold_units >= Decimal::ZERO);
            assert!(loss.potential_unsold_units <= Decimal::from(stock));
            assert!(loss.potential_revenue_loss >= Decimal::ZERO);
        }
    }
}

// ===========================================================================
// Engine entry points
// ===========================================================================

#[test]
fn test_engine_wraps_result_with_warnings() {
    let engine = Engine::default();
    let p = product("snacks", -2, 10, vec![dec!(1); 5]);
    let out = engine.discount_recommendation(&p, today()).unwrap();

    assert_eq!(out.result.urgency, Urgency::Critical);
    // unknown category, short history, past expiry
    assert_eq!(out.warnings.len(), 3, "{:?}", out.warnings);
    assert_eq!(out.metadata.precision, "rust_decimal_128bit");
}

#[test]
fn test_engine_rejects_contract_violations() {
    let engine = Engine::default();
    let mut p = product("dairy", 3, 10, vec![dec!(1); 7]);
    p.price = dec!(-5);
    match engine.discount_recommendation(&p, today()) {
        Err(MarkdownError::InvalidInput { field, .. }) => assert_eq!(field, "price"),
        other => panic!("expected invalid input, got {other:?}"),
    }
}

#[test]
fn test_engine_without_seasonal_layer() {
    let config = EngineConfig {
        apply_seasonal: false,
        ..EngineConfig::default()
    };
    let engine = Engine::new(config).unwrap();
    // Saturday in June would normally reduce a produce discount
    let saturday = NaiveDate::from_ymd_opt(2025, 6, 28).unwrap();
    let mut p = product("produce", 0, 30, vec![dec!(5); 7]);
    p.expiry_date = saturday + Duration::days(2);
    let out = engine.discount_recommendation(&p, saturday).unwrap();
    assert!(out.result.seasonal.is_none());
    assert_eq!(out.result.discount, out.result.pre_seasonal_discount);
}

#[test]
fn test_restock_via_engine() {
    let engine = Engine::default();
    let p = product("bakery", 4, 12, vec![dec!(3); 7]);
    let out = engine.restock_recommendation(&p).unwrap();
    // 3/day x 8 days
    assert_eq!(out.result.recommended_quantity, 24);
    assert_eq!(out.result.current_stock, 12);
}
