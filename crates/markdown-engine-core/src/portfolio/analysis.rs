use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::config::EngineConfig;
use crate::portfolio::category::{category_rollup, CategoryStats};
use crate::portfolio::insights::portfolio_insights;
use crate::portfolio::performance::{performance_metrics, PerformanceMetrics};
use crate::types::{Category, Money, Product, ProductId, Rate, Urgency};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Product count per urgency tier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskDistribution {
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
    pub none: usize,
}

impl RiskDistribution {
    pub fn from_urgencies(urgencies: impl IntoIterator<Item = Urgency>) -> Self {
        let mut dist = RiskDistribution::default();
        for urgency in urgencies {
            match urgency {
                Urgency::Critical => dist.critical += 1,
                Urgency::High => dist.high += 1,
                Urgency::Medium => dist.medium += 1,
                Urgency::Low => dist.low += 1,
                Urgency::None => dist.none += 1,
            }
        }
        dist
    }

    pub fn total(&self) -> usize {
        self.critical + self.high + self.medium + self.low + self.none
    }
}

/// Executive totals across the whole catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSummary {
    pub total_products: usize,
    pub total_inventory_value: Money,
    pub total_potential_loss: Money,
    pub total_potential_savings: Money,
    pub total_markdown_cost: Money,
    /// Potential loss as a share of inventory value
    pub loss_ratio: Rate,
    pub risk_distribution: RiskDistribution,
    pub average_performance_score: Decimal,
}

/// Portfolio-wide markdown analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioAnalysis {
    pub reference_date: NaiveDate,
    /// Most urgent first, then largest potential loss
    pub products: Vec<PerformanceMetrics>,
    pub summary: PortfolioSummary,
    /// Critical or high urgency
    pub immediate_action: Vec<ProductId>,
    /// Medium urgency
    pub monitor: Vec<ProductId>,
    /// Low or no urgency
    pub stable: Vec<ProductId>,
    pub categories: BTreeMap<Category, CategoryStats>,
    pub insights: Vec<String>,
}

/// Catalog shape without any pricing decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogStats {
    pub total_products: usize,
    pub categories: Vec<String>,
    pub sections: Vec<String>,
    pub brands: Vec<String>,
    pub total_inventory_value: Money,
    pub average_stock: Decimal,
    pub average_price: Money,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Evaluate every product and rank by urgency, then potential loss. Ties
/// keep their catalog order.
pub fn analyze_portfolio(
    products: &[Product],
    reference_date: NaiveDate,
    config: &EngineConfig,
) -> PortfolioAnalysis {
    let mut metrics: Vec<PerformanceMetrics> = products
        .iter()
        .map(|p| performance_metrics(p, reference_date, config))
        .collect();

    rank(&mut metrics);

    let summary = summarize(&metrics);
    let categories = category_rollup(&metrics);

    let mut immediate_action = Vec::new();
    let mut monitor = Vec::new();
    let mut stable = Vec::new();
    for m in &metrics {
        let bucket = match m.urgency() {
            Urgency::Critical | Urgency::High => &mut immediate_action,
            Urgency::Medium => &mut monitor,
            Urgency::Low | Urgency::None => &mut stable,
        };
        bucket.push(m.product_id.clone());
    }

    let insights = portfolio_insights(&metrics, &summary, &categories);

    tracing::debug!(
        products = summary.total_products,
        immediate = immediate_action.len(),
        potential_loss = %summary.total_potential_loss,
        "portfolio analysed"
    );

    PortfolioAnalysis {
        reference_date,
        products: metrics,
        summary,
        immediate_action,
        monitor,
        stable,
        categories,
        insights,
    }
}

/// Category rollups for a catalog.
pub fn category_insights(
    products: &[Product],
    reference_date: NaiveDate,
    config: &EngineConfig,
) -> BTreeMap<Category, CategoryStats> {
    let metrics: Vec<PerformanceMetrics> = products
        .iter()
        .map(|p| performance_metrics(p, reference_date, config))
        .collect();
    category_rollup(&metrics)
}

/// Counts, distinct groupings and averages over the raw catalog.
pub fn catalog_stats(products: &[Product]) -> CatalogStats {
    let categories: BTreeSet<String> = products.iter().map(|p| p.category.to_string()).collect();
    let sections: BTreeSet<String> = products
        .iter()
        .filter(|p| !p.section.is_empty())
        .map(|p| p.section.clone())
        .collect();
    let brands: BTreeSet<String> = products.iter().filter_map(|p| p.brand.clone()).collect();

    let total_inventory_value: Money = products.iter().map(|p| p.inventory_value()).sum();

    let (average_stock, average_price) = if products.is_empty() {
        (Decimal::ZERO, Decimal::ZERO)
    } else {
        let n = Decimal::from(products.len() as u64);
        let stock: Decimal = products.iter().map(|p| Decimal::from(p.stock)).sum();
        let price: Money = products.iter().map(|p| p.price).sum();
        (round_whole(stock / n), round_whole(price / n))
    };

    CatalogStats {
        total_products: products.len(),
        categories: categories.into_iter().collect(),
        sections: sections.into_iter().collect(),
        brands: brands.into_iter().collect(),
        total_inventory_value,
        average_stock,
        average_price,
    }
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// Nearest whole number, halves away from zero.
fn round_whole(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Stable sort: urgency descending, then potential loss descending.
fn rank(metrics: &mut [PerformanceMetrics]) {
    metrics.sort_by(|a, b| {
        b.urgency()
            .cmp(&a.urgency())
            .then_with(|| b.financials.potential_loss.cmp(&a.financials.potential_loss))
    });
}

fn summarize(metrics: &[PerformanceMetrics]) -> PortfolioSummary {
    let total_inventory_value: Money = metrics.iter().map(|m| m.financials.current_value).sum();
    let total_potential_loss: Money = metrics.iter().map(|m| m.financials.potential_loss).sum();
    let total_potential_savings: Money = metrics.iter().map(|m| m.financials.potential_savings).sum();
    let total_markdown_cost: Money = metrics.iter().map(|m| m.financials.markdown_cost).sum();

    let loss_ratio = if total_inventory_value.is_zero() {
        Decimal::ZERO
    } else {
        total_potential_loss / total_inventory_value
    };

    let average_performance_score = if metrics.is_empty() {
        Decimal::ZERO
    } else {
        let total: Decimal = metrics.iter().map(|m| Decimal::from(m.performance_score)).sum();
        (total / Decimal::from(metrics.len() as u64)).round_dp(2)
    };

    PortfolioSummary {
        total_products: metrics.len(),
        total_inventory_value,
        total_potential_loss,
        total_potential_savings,
        total_markdown_cost,
        loss_ratio,
        risk_distribution: RiskDistribution::from_urgencies(metrics.iter().map(|m| m.urgency())),
        average_performance_score,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_risk_distribution_counts() {
        let dist = RiskDistribution::from_urgencies([
            Urgency::Critical,
            Urgency::Critical,
            Urgency::Low,
            Urgency::None,
        ]);
        assert_eq!(dist.critical, 2);
        assert_eq!(dist.low, 1);
        assert_eq!(dist.none, 1);
        assert_eq!(dist.total(), 4);
    }

    #[test]
    fn test_empty_portfolio() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 25).unwrap();
        let analysis = analyze_portfolio(&[], today, &EngineConfig::default());
        assert!(analysis.products.is_empty());
        assert_eq!(analysis.summary.total_products, 0);
        assert_eq!(analysis.summary.average_performance_score, Decimal::ZERO);
        assert_eq!(analysis.summary.loss_ratio, Decimal::ZERO);
        assert_eq!(analysis.insights.len(), 1);
    }

    #[test]
    fn test_catalog_stats() {
        let p = |id: u64, category: &str, brand: Option<&str>, price, stock| Product {
            id: ProductId::Number(id),
            name: format!("Product {id}"),
            category: Category::from(category),
            section: "Aisle".into(),
            brand: brand.map(String::from),
            price,
            expiry_date: NaiveDate::from_ymd_opt(2025, 7, 1).unwrap(),
            stock,
            sales_last_7_days: vec![],
            typical_consumption_days: None,
        };
        let stats = catalog_stats(&[
            p(1, "dairy", Some("Amul"), dec!(28), 120),
            p(2, "dairy", Some("Amul"), dec!(35), 65),
            p(3, "snacks", None, dec!(10), 20),
        ]);
        assert_eq!(stats.total_products, 3);
        assert_eq!(stats.categories, vec!["dairy".to_string(), "snacks".to_string()]);
        assert_eq!(stats.brands, vec!["Amul".to_string()]);
        assert_eq!(stats.total_inventory_value, dec!(5835));
        // 205 / 3 = 68.33, 73 / 3 = 24.33
        assert_eq!(stats.average_stock, dec!(68));
        assert_eq!(stats.average_price, dec!(24));

        // 137 / 2 = 68.5 and 24.5 both round up
        let halves = catalog_stats(&[
            p(4, "bakery", None, dec!(24), 68),
            p(5, "bakery", None, dec!(25), 69),
        ]);
        assert_eq!(halves.average_stock, dec!(69));
        assert_eq!(halves.average_price, dec!(25));
    }
}
