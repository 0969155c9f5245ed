use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::portfolio::analysis::RiskDistribution;
use crate::portfolio::performance::PerformanceMetrics;
use crate::types::{Category, Money, Rate};

/// Risk label for a category from its share of critical or high products.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskStatus {
    #[serde(rename = "High Risk")]
    HighRisk,
    #[serde(rename = "Medium Risk")]
    MediumRisk,
    #[serde(rename = "Low Risk")]
    LowRisk,
}

impl RiskStatus {
    pub fn from_risk_level(level: Rate) -> Self {
        if level > dec!(0.4) {
            RiskStatus::HighRisk
        } else if level > dec!(0.2) {
            RiskStatus::MediumRisk
        } else {
            RiskStatus::LowRisk
        }
    }
}

/// Rollup of every product in one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryStats {
    pub category: Category,
    pub product_count: usize,
    pub total_value: Money,
    pub potential_loss: Money,
    pub potential_savings: Money,
    pub risk_distribution: RiskDistribution,
    pub critical_or_high_count: usize,
    /// critical_or_high_count / product_count
    pub risk_level: Rate,
    pub status: RiskStatus,
    pub average_discount: Decimal,
    pub average_performance_score: Decimal,
}

/// Group evaluated products by category.
pub fn category_rollup(metrics: &[PerformanceMetrics]) -> BTreeMap<Category, CategoryStats> {
    let mut groups: BTreeMap<Category, Vec<&PerformanceMetrics>> = BTreeMap::new();
    for m in metrics {
        groups.entry(m.category.clone()).or_default().push(m);
    }

    groups
        .into_iter()
        .map(|(category, members)| {
            let stats = category_stats(category.clone(), &members);
            (category, stats)
        })
        .collect()
}

fn category_stats(category: Category, members: &[&PerformanceMetrics]) -> CategoryStats {
    let product_count = members.len();
    let count = Decimal::from(product_count as u64);
    let risk_distribution = RiskDistribution::from_urgencies(members.iter().map(|m| m.urgency()));
    let critical_or_high_count = risk_distribution.critical + risk_distribution.high;

    let risk_level = if product_count == 0 {
        Decimal::ZERO
    } else {
        Decimal::from(critical_or_high_count as u64) / count
    };

    let total_value: Money = members.iter().map(|m| m.financials.current_value).sum();
    let potential_loss: Money = members.iter().map(|m| m.financials.potential_loss).sum();
    let potential_savings: Money = members.iter().map(|m| m.financials.potential_savings).sum();

    let (average_discount, average_performance_score) = if product_count == 0 {
        (Decimal::ZERO, Decimal::ZERO)
    } else {
        let discounts: Decimal = members
            .iter()
            .map(|m| Decimal::from(m.recommendation.discount))
            .sum();
        let scores: Decimal = members
            .iter()
            .map(|m| Decimal::from(m.performance_score))
            .sum();
        ((discounts / count).round_dp(2), (scores / count).round_dp(2))
    };

    CategoryStats {
        category,
        product_count,
        total_value,
        potential_loss,
        potential_savings,
        risk_distribution,
        critical_or_high_count,
        risk_level,
        status: RiskStatus::from_risk_level(risk_level),
        average_discount,
        average_performance_score,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_risk_status_thresholds() {
        assert_eq!(RiskStatus::from_risk_level(dec!(0.5)), RiskStatus::HighRisk);
        assert_eq!(RiskStatus::from_risk_level(dec!(0.4)), RiskStatus::MediumRisk);
        assert_eq!(RiskStatus::from_risk_level(dec!(0.25)), RiskStatus::MediumRisk);
        assert_eq!(RiskStatus::from_risk_level(dec!(0.2)), RiskStatus::LowRisk);
        assert_eq!(RiskStatus::from_risk_level(Decimal::ZERO), RiskStatus::LowRisk);
    }

    #[test]
    fn test_risk_status_serializes_as_label() {
        let json = serde_json::to_string(&RiskStatus::HighRisk).unwrap();
        assert_eq!(json, "\"High Risk\"");
    }

    #[test]
    fn test_empty_rollup() {
        assert!(category_rollup(&[]).is_empty());
    }
}
