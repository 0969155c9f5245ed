pub mod category;
pub mod seasonal;

pub use category::{CategoryPolicy, PolicyTable};
pub use seasonal::{SeasonalAdjustment, SeasonalCalendar};
