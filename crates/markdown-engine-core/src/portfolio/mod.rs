pub mod analysis;
pub mod category;
pub mod insights;
pub mod performance;

pub use analysis::{CatalogStats, PortfolioAnalysis, PortfolioSummary, RiskDistribution};
pub use category::{CategoryStats, RiskStatus};
pub use performance::PerformanceMetrics;
