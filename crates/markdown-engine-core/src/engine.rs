use chrono::NaiveDate;
use serde_json::json;
use std::time::Instant;

use crate::config::EngineConfig;
use crate::pricing::discount::{calculate_discount, recommend_discount, DiscountRecommendation};
use crate::types::{with_metadata, ComputationOutput, Product};
use crate::validation::{validate_catalog, validate_product, validate_record};
use crate::MarkdownResult;

#[cfg(feature = "demand")]
use crate::demand::restock::{restock_recommendation, RestockRecommendation};
#[cfg(feature = "portfolio")]
use crate::portfolio::analysis::{self, CatalogStats, PortfolioAnalysis};
#[cfg(feature = "portfolio")]
use crate::portfolio::category::CategoryStats;
#[cfg(feature = "portfolio")]
use crate::portfolio::performance::{self, PerformanceMetrics};
#[cfg(feature = "portfolio")]
use crate::types::Category;
#[cfg(feature = "portfolio")]
use std::collections::BTreeMap;

/// Markdown engine bound to one configuration.
///
/// Every method is a pure function of its arguments and the configuration:
/// inputs are validated, warnings collected, and the result wrapped in the
/// standard output envelope.
#[derive(Debug, Clone, Default)]
pub struct Engine {
    config: EngineConfig,
}

impl Engine {
    pub fn new(config: EngineConfig) -> MarkdownResult<Self> {
        config.validate()?;
        Ok(Engine { config })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Discount, urgency, action and reason for one product.
    pub fn discount_recommendation(
        &self,
        product: &Product,
        reference_date: NaiveDate,
    ) -> MarkdownResult<ComputationOutput<DiscountRecommendation>> {
        let start = Instant::now();
        let warnings = validate_product(product, reference_date, &self.config.policies)?;

        let rec = if self.config.apply_seasonal {
            recommend_discount(
                product,
                reference_date,
                &self.config.policies,
                &self.config.seasonal,
            )
        } else {
            calculate_discount(product, reference_date, &self.config.policies)
        };

        let assumptions = json!({
            "reference_date": reference_date,
            "category_policy": self.config.policies.resolve(&product.category),
            "apply_seasonal": self.config.apply_seasonal,
        });

        Ok(with_metadata(
            "Shelf-life staged markdown with stock pressure and seasonal adjustment",
            &assumptions,
            warnings,
            start.elapsed().as_micros() as u64,
            rec,
        ))
    }

    /// Next batch size for one product.
    #[cfg(feature = "demand")]
    pub fn restock_recommendation(
        &self,
        product: &Product,
    ) -> MarkdownResult<ComputationOutput<RestockRecommendation>> {
        let start = Instant::now();
        let warnings = validate_record(product, &self.config.policies)?;

        let rec = restock_recommendation(product, &self.config.restock);

        Ok(with_metadata(
            "Target days of supply scaled by sales trend and demand volatility",
            &self.config.restock,
            warnings,
            start.elapsed().as_micros() as u64,
            rec,
        ))
    }

    /// Discount, financial and demand view of one product.
    #[cfg(feature = "portfolio")]
    pub fn performance_metrics(
        &self,
        product: &Product,
        reference_date: NaiveDate,
    ) -> MarkdownResult<ComputationOutput<PerformanceMetrics>> {
        let start = Instant::now();
        let warnings = validate_product(product, reference_date, &self.config.policies)?;

        let metrics = performance::performance_metrics(product, reference_date, &self.config);

        Ok(with_metadata(
            "Per-product performance score with financial projection and demand outlook",
            &json!({ "reference_date": reference_date }),
            warnings,
            start.elapsed().as_micros() as u64,
            metrics,
        ))
    }

    /// Rank a whole catalog and summarise it.
    #[cfg(feature = "portfolio")]
    pub fn analyze_portfolio(
        &self,
        products: &[Product],
        reference_date: NaiveDate,
    ) -> MarkdownResult<ComputationOutput<PortfolioAnalysis>> {
        let start = Instant::now();
        let warnings = validate_catalog(products, reference_date, &self.config.policies)?;

        let result = analysis::analyze_portfolio(products, reference_date, &self.config);

        Ok(with_metadata(
            "Portfolio markdown analysis ranked by urgency then potential loss",
            &json!({ "reference_date": reference_date, "products": products.len() }),
            warnings,
            start.elapsed().as_micros() as u64,
            result,
        ))
    }

    /// Per-category rollups for a catalog.
    #[cfg(feature = "portfolio")]
    pub fn category_insights(
        &self,
        products: &[Product],
        reference_date: NaiveDate,
    ) -> MarkdownResult<ComputationOutput<BTreeMap<Category, CategoryStats>>> {
        let start = Instant::now();
        let warnings = validate_catalog(products, reference_date, &self.config.policies)?;

        let result = analysis::category_insights(products, reference_date, &self.config);

        Ok(with_metadata(
            "Category rollup of urgency, value at risk and performance",
            &json!({ "reference_date": reference_date, "products": products.len() }),
            warnings,
            start.elapsed().as_micros() as u64,
            result,
        ))
    }

    /// Catalog counts and averages; no pricing decision involved.
    #[cfg(feature = "portfolio")]
    pub fn catalog_stats(&self, products: &[Product]) -> ComputationOutput<CatalogStats> {
        let start = Instant::now();
        let result = analysis::catalog_stats(products);
        with_metadata(
            "Catalog summary statistics",
            &json!({ "products": products.len() }),
            Vec::new(),
            start.elapsed().as_micros() as u64,
            result,
        )
    }
}
