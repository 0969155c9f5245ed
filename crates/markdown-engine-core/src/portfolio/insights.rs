use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::BTreeMap;

use crate::demand::restock::StockStatus;
use crate::portfolio::analysis::PortfolioSummary;
use crate::portfolio::category::{CategoryStats, RiskStatus};
use crate::portfolio::performance::PerformanceMetrics;
use crate::types::Category;

/// Plain-language findings for store managers, most pressing first.
pub fn portfolio_insights(
    metrics: &[PerformanceMetrics],
    summary: &PortfolioSummary,
    categories: &BTreeMap<Category, CategoryStats>,
) -> Vec<String> {
    let mut insights = Vec::new();
    let dist = &summary.risk_distribution;

    if dist.critical > 0 {
        insights.push(format!(
            "{} product(s) need clearance or markdown immediately",
            dist.critical
        ));
    }
    if dist.high > 0 {
        insights.push(format!("{} product(s) should be marked down today", dist.high));
    }

    if summary.total_potential_loss > Decimal::ZERO {
        insights.push(format!(
            "Potential loss of {} ({}% of inventory value) if unsold stock expires",
            summary.total_potential_loss.round_dp(2),
            (summary.loss_ratio * dec!(100)).round_dp(1)
        ));
    }

    let riskiest = categories
        .values()
        .filter(|c| c.status != RiskStatus::LowRisk)
        .max_by(|a, b| a.risk_level.cmp(&b.risk_level));
    if let Some(c) = riskiest {
        insights.push(format!(
            "{} is the highest-risk category: {}% of products are critical or high urgency",
            c.category,
            (c.risk_level * dec!(100)).round_dp(0)
        ));
    }

    let declining = metrics.iter().filter(|m| m.demand.trend.is_declining()).count();
    if declining > 0 {
        insights.push(format!(
            "{declining} product(s) show declining sales; review placement and pricing"
        ));
    }

    let overstocked = metrics
        .iter()
        .filter(|m| m.stock_status() == StockStatus::Excess)
        .count();
    if overstocked > 0 {
        insights.push(format!(
            "{overstocked} product(s) are overstocked relative to demand; reduce next orders"
        ));
    }

    if insights.is_empty() {
        insights.push("Inventory is healthy; no markdowns required".to_string());
    }
    insights
}
