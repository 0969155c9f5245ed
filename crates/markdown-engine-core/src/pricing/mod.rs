pub mod classifier;
pub mod discount;
pub mod financial;

pub use classifier::{ShelfLifeStage, StockPressure};
pub use discount::{DiscountAnalytics, DiscountRecommendation};
pub use financial::LossProjection;
