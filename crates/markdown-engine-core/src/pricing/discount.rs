use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::policy::seasonal::round_percent;
use crate::policy::{CategoryPolicy, PolicyTable, SeasonalAdjustment, SeasonalCalendar};
use crate::pricing::classifier::{shelf_life_stage, stock_pressure, ShelfLifeStage, StockPressure};
use crate::temporal::{average_daily_sales, days_to_sell_stock, days_until_expiry};
use crate::types::{Action, Category, Product, Rate, Units, Urgency};

const FRESH_LOW_STOCK_REASON: &str = "Fresh product with low stock — no discount needed";

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Markdown decision for one product on one reference date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscountRecommendation {
    /// Final discount in whole percent
    pub discount: u32,
    /// Discount before the seasonal calendar was applied
    pub pre_seasonal_discount: u32,
    pub urgency: Urgency,
    pub action: Action,
    pub reason: String,
    pub analytics: DiscountAnalytics,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seasonal: Option<SeasonalAdjustment>,
}

/// Inputs the decision was derived from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscountAnalytics {
    pub shelf_life_stage: ShelfLifeStage,
    pub stock_pressure: StockPressure,
    pub days_to_expiry: i64,
    pub category: Category,
    pub perishability_factor: Rate,
    pub avg_daily_sales: Units,
    /// `None` when the stock never sells through at current velocity
    pub days_to_sell_stock: Option<u64>,
}

/// Base decision for a shelf-life stage before stock pressure is applied.
struct StageTier {
    base: Decimal,
    urgency: Urgency,
    action: Action,
    reason: String,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Recommend a discount from shelf life, stock pressure and category policy.
/// No seasonal adjustment is applied.
pub fn calculate_discount(
    product: &Product,
    reference_date: NaiveDate,
    policies: &PolicyTable,
) -> DiscountRecommendation {
    let policy = policies.resolve(&product.category);
    let days_to_expiry = days_until_expiry(product.expiry_date, reference_date);
    let avg_daily_sales = average_daily_sales(&product.sales_last_7_days);

    let stage = shelf_life_stage(product, days_to_expiry, policy);
    let pressure = stock_pressure(product.stock, days_to_expiry, avg_daily_sales);

    let analytics = DiscountAnalytics {
        shelf_life_stage: stage,
        stock_pressure: pressure,
        days_to_expiry,
        category: product.category.clone(),
        perishability_factor: policy.perishability_factor,
        avg_daily_sales,
        days_to_sell_stock: days_to_sell_stock(product.stock, avg_daily_sales),
    };

    // Stock scarcity wins over any residual pressure on fresh goods.
    if stage == ShelfLifeStage::Fresh && pressure <= StockPressure::Low {
        return DiscountRecommendation {
            discount: 0,
            pre_seasonal_discount: 0,
            urgency: Urgency::None,
            action: Action::NoAction,
            reason: FRESH_LOW_STOCK_REASON.to_string(),
            analytics,
            seasonal: None,
        };
    }

    let tier = stage_tier(stage, policy, days_to_expiry);
    let discount = scale_discount(stage, &tier, pressure, policy);
    let (urgency, action) = escalate_for_pressure(stage, pressure, tier.urgency, tier.action);
    let reason = compose_reason(&tier.reason, pressure);

    tracing::debug!(
        product = %product.id,
        stage = %stage,
        pressure = %pressure,
        discount,
        urgency = %urgency,
        "discount calculated"
    );

    DiscountRecommendation {
        discount,
        pre_seasonal_discount: discount,
        urgency,
        action,
        reason,
        analytics,
        seasonal: None,
    }
}

/// Discount recommendation with the seasonal calendar layered on top. The
/// pre-seasonal discount is kept alongside the final one.
pub fn recommend_discount(
    product: &Product,
    reference_date: NaiveDate,
    policies: &PolicyTable,
    calendar: &SeasonalCalendar,
) -> DiscountRecommendation {
    let base = calculate_discount(product, reference_date, policies);
    apply_seasonal(base, reference_date, policies, calendar)
}

/// Layer the seasonal calendar over an already calculated recommendation.
pub fn apply_seasonal(
    mut rec: DiscountRecommendation,
    reference_date: NaiveDate,
    policies: &PolicyTable,
    calendar: &SeasonalCalendar,
) -> DiscountRecommendation {
    let ceiling = policies.resolve(&rec.analytics.category).discount_ceiling();
    let adjustment = calendar
        .adjust(rec.discount, &rec.analytics.category, reference_date)
        .capped(ceiling);

    if let Some(note) = &adjustment.note {
        rec.reason = format!("{}. {}", rec.reason, note);
    }
    rec.pre_seasonal_discount = rec.discount;
    rec.discount = adjustment.final_discount;
    rec.seasonal = Some(adjustment);
    rec
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn stage_tier(stage: ShelfLifeStage, policy: &CategoryPolicy, days_to_expiry: i64) -> StageTier {
    let max = Decimal::from(policy.max_discount);
    match stage {
        ShelfLifeStage::Expired => StageTier {
            base: Decimal::from(policy.clearance_discount()),
            urgency: Urgency::Critical,
            action: Action::ImmediateClearance,
            reason: "Expired - clearance sale required".to_string(),
        },
        ShelfLifeStage::Critical => StageTier {
            base: max * dec!(0.8),
            urgency: Urgency::Critical,
            action: Action::ApplyImmediately,
            reason: format!(
                "Critical: {} of shelf life left - deep discount needed",
                plural_days(days_to_expiry)
            ),
        },
        ShelfLifeStage::Urgent => StageTier {
            base: max * dec!(0.5),
            urgency: Urgency::High,
            action: Action::ApplyToday,
            reason: format!("Urgent: expires in {}", plural_days(days_to_expiry)),
        },
        ShelfLifeStage::Medium => StageTier {
            base: max * dec!(0.25),
            urgency: Urgency::Medium,
            action: Action::ScheduleDiscount,
            reason: format!(
                "Approaching expiry in {} - schedule a markdown",
                plural_days(days_to_expiry)
            ),
        },
        ShelfLifeStage::Fresh => StageTier {
            base: Decimal::ZERO,
            urgency: Urgency::None,
            action: Action::Monitor,
            reason: "Fresh product - normal sales expected".to_string(),
        },
    }
}

/// Expired stock takes the fixed clearance tier. Every other stage is scaled
/// by stock pressure and perishability and never exceeds clearance.
fn scale_discount(
    stage: ShelfLifeStage,
    tier: &StageTier,
    pressure: StockPressure,
    policy: &CategoryPolicy,
) -> u32 {
    if stage == ShelfLifeStage::Expired {
        return policy.clearance_discount().min(policy.discount_ceiling());
    }
    let scaled = tier.base * pressure.multiplier() * policy.perishability_factor;
    round_percent(scaled)
        .min(policy.clearance_discount())
        .min(policy.discount_ceiling())
}

/// Heavy stock on fresh goods creates urgency expiry alone would not.
fn escalate_for_pressure(
    stage: ShelfLifeStage,
    pressure: StockPressure,
    urgency: Urgency,
    action: Action,
) -> (Urgency, Action) {
    if stage != ShelfLifeStage::Fresh {
        return (urgency, action);
    }
    match pressure {
        StockPressure::VeryHigh => (Urgency::Medium, Action::ConsiderDiscount),
        StockPressure::High => (Urgency::Low, Action::Monitor),
        _ => (urgency, action),
    }
}

fn pressure_clause(pressure: StockPressure) -> Option<&'static str> {
    match pressure {
        StockPressure::VeryHigh => Some("stock will not sell through before expiry at current velocity"),
        StockPressure::High => Some("high stock relative to sales velocity"),
        StockPressure::Medium => Some("stock slightly exceeds the sales pace"),
        StockPressure::Low | StockPressure::VeryLow => None,
    }
}

fn compose_reason(base_reason: &str, pressure: StockPressure) -> String {
    let mut clauses = vec![base_reason];
    clauses.extend(pressure_clause(pressure));
    clauses.join("; ")
}

fn plural_days(days: i64) -> String {
    if days == 1 {
        "1 day".to_string()
    } else {
        format!("{days} days")
    }
}
