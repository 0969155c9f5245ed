pub mod restock;
pub mod trend;

pub use restock::{RestockPolicy, RestockRecommendation, StockStatus};
pub use trend::{DemandVolatility, SalesTrend, TrendAnalysis};
