use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::demand::restock::{restock_recommendation, RestockRecommendation, StockStatus};
use crate::demand::trend::{analyze_trend, DemandVolatility, SalesTrend, TrendAnalysis};
use crate::pricing::discount::{calculate_discount, recommend_discount, DiscountRecommendation};
use crate::pricing::financial::{financial_metrics, potential_loss, FinancialMetrics};
use crate::types::{Action, Category, Product, ProductId, Urgency};

/// Per-product health view combining the markdown decision, financial
/// projection and demand outlook.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    pub product_id: ProductId,
    pub name: String,
    pub category: Category,
    pub section: String,
    pub days_to_expiry: i64,
    pub recommendation: DiscountRecommendation,
    pub financials: FinancialMetrics,
    pub demand: TrendAnalysis,
    pub restock: RestockRecommendation,
    /// 0-100, higher is healthier
    pub performance_score: u32,
    pub action_plan: Vec<String>,
}

impl PerformanceMetrics {
    pub fn urgency(&self) -> Urgency {
        self.recommendation.urgency
    }

    pub fn stock_status(&self) -> StockStatus {
        self.restock.stock_status
    }
}

/// Evaluate one product on `reference_date`.
pub fn performance_metrics(
    product: &Product,
    reference_date: NaiveDate,
    config: &EngineConfig,
) -> PerformanceMetrics {
    let recommendation = if config.apply_seasonal {
        recommend_discount(product, reference_date, &config.policies, &config.seasonal)
    } else {
        calculate_discount(product, reference_date, &config.policies)
    };
    let loss = potential_loss(product, reference_date);
    let financials = financial_metrics(product, &recommendation, &loss);
    let demand = analyze_trend(&product.sales_last_7_days);
    let restock = restock_recommendation(product, &config.restock);

    let performance_score = performance_score(
        recommendation.urgency,
        demand.trend,
        demand.volatility,
        restock.stock_status,
    );
    let action_plan = action_plan(&recommendation, &demand, &restock, config.restock.target_days);

    PerformanceMetrics {
        product_id: product.id.clone(),
        name: product.name.clone(),
        category: product.category.clone(),
        section: product.section.clone(),
        days_to_expiry: recommendation.analytics.days_to_expiry,
        recommendation,
        financials,
        demand,
        restock,
        performance_score,
        action_plan,
    }
}

/// Start at 100 and deduct for urgency, falling sales, volatile demand and
/// unhealthy stock levels.
pub fn performance_score(
    urgency: Urgency,
    trend: SalesTrend,
    volatility: DemandVolatility,
    stock_status: StockStatus,
) -> u32 {
    let mut score: i32 = 100;

    score -= match urgency {
        Urgency::Critical => 40,
        Urgency::High => 25,
        Urgency::Medium => 15,
        Urgency::Low => 5,
        Urgency::None => 0,
    };
    score -= match trend {
        SalesTrend::Decreasing => 20,
        SalesTrend::SlightlyDecreasing => 10,
        _ => 0,
    };
    score -= match volatility {
        DemandVolatility::High => 15,
        DemandVolatility::Medium => 5,
        DemandVolatility::Low => 0,
    };
    score -= match stock_status {
        StockStatus::Excess => 20,
        StockStatus::Critical => 30,
        _ => 0,
    };

    score.clamp(0, 100) as u32
}

fn action_plan(
    rec: &DiscountRecommendation,
    demand: &TrendAnalysis,
    restock: &RestockRecommendation,
    target_days: u32,
) -> Vec<String> {
    let d = rec.discount;
    let mut steps = vec![match rec.action {
        Action::ImmediateClearance => {
            format!("Move to clearance at {d}% off and pull from shelf by close")
        }
        Action::ApplyImmediately => format!("Apply {d}% markdown now"),
        Action::ApplyToday => format!("Apply {d}% markdown before end of day"),
        Action::ScheduleDiscount => format!("Schedule a {d}% markdown within the next few days"),
        Action::ConsiderDiscount => "Consider a promotional markdown to move excess stock".to_string(),
        Action::Monitor => "Monitor sell-through daily".to_string(),
        Action::NoAction => "No action needed".to_string(),
    }];

    match restock.stock_status {
        StockStatus::Critical => steps.push(format!(
            "Reorder now: {} units recommended",
            restock.recommended_quantity
        )),
        StockStatus::Low => steps.push(format!(
            "Plan a reorder of {} units",
            restock.recommended_quantity
        )),
        StockStatus::Excess => steps.push(format!(
            "Reduce the next order; stock covers more than {} days of sales",
            target_days * 2
        )),
        StockStatus::Adequate => {}
    }

    if demand.trend.is_declining() {
        steps.push("Sales are declining; review placement and pricing".to_string());
    }
    if demand.volatility == DemandVolatility::High {
        steps.push("Demand is volatile; review stock levels daily".to_string());
    }
    steps
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    #[test]
    fn test_perfect_score() {
        assert_eq!(
            performance_score(
                Urgency::None,
                SalesTrend::Stable,
                DemandVolatility::Low,
                StockStatus::Adequate
            ),
            100
        );
    }

    #[test]
    fn test_deductions_accumulate() {
        // 100 - 25 - 10 - 5 - 20
        assert_eq!(
            performance_score(
                Urgency::High,
                SalesTrend::SlightlyDecreasing,
                DemandVolatility::Medium,
                StockStatus::Excess
            ),
            40
        );
    }

    #[test]
    fn test_score_floors_at_zero() {
        // 100 - 40 - 20 - 15 - 30 = -5
        assert_eq!(
            performance_score(
                Urgency::Critical,
                SalesTrend::Decreasing,
                DemandVolatility::High,
                StockStatus::Critical
            ),
            0
        );
    }

    #[test]
    fn test_metrics_for_expiring_overstock() {
        let today = NaiveDate::from_ymd_opt(2025, 10, 2).unwrap();
        let product = Product {
            id: ProductId::Number(2),
            name: "Mother Dairy Toned Milk 1L".into(),
            category: Category::Dairy,
            section: "Dairy & Beverages".into(),
            brand: Some("Mother Dairy".into()),
            price: dec!(54),
            expiry_date: today + chrono::Duration::days(1),
            stock: 85,
            sales_last_7_days: vec![dec!(15), dec!(22), dec!(12), dec!(18), dec!(24), dec!(10), dec!(16)],
            typical_consumption_days: None,
        };
        let m = performance_metrics(&product, today, &EngineConfig::default());
        assert_eq!(m.days_to_expiry, 1);
        // 1 of 14 dairy days left: critical
        assert_eq!(m.urgency(), Urgency::Critical);
        assert_eq!(m.recommendation.discount, 60);
        assert_eq!(m.stock_status(), StockStatus::Adequate);
        assert_eq!(m.financials.potential_savings, m.financials.current_value - m.financials.potential_loss);
        assert!(m.financials.potential_loss > Decimal::ZERO);
        assert_eq!(m.performance_score, 60);
        assert!(m.action_plan[0].contains("markdown"));
    }
}
