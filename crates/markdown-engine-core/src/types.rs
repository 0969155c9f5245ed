use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Ratios and multipliers expressed as decimals (0.3 = 30%).
pub type Rate = Decimal;

/// Sales volumes in units (may be fractional for averages).
pub type Units = Decimal;

/// Product identifier: catalogs key products by integer or by string SKU.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProductId {
    Number(u64),
    Text(String),
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProductId::Number(n) => write!(f, "{n}"),
            ProductId::Text(s) => f.write_str(s),
        }
    }
}

/// Product category. Categories without a dedicated policy are kept trimmed
/// and lowercased in `Other` and priced with the default policy.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    Dairy,
    Produce,
    Bakery,
    Meat,
    Prepared,
    Other(String),
}

impl Category {
    pub fn as_str(&self) -> &str {
        match self {
            Category::Dairy => "dairy",
            Category::Produce => "produce",
            Category::Bakery => "bakery",
            Category::Meat => "meat",
            Category::Prepared => "prepared",
            Category::Other(name) => name,
        }
    }
}

impl From<String> for Category {
    fn from(value: String) -> Self {
        let name = value.trim().to_ascii_lowercase();
        match name.as_str() {
            "dairy" => Category::Dairy,
            "produce" => Category::Produce,
            "bakery" => Category::Bakery,
            "meat" => Category::Meat,
            "prepared" => Category::Prepared,
            _ => Category::Other(name),
        }
    }
}

impl From<&str> for Category {
    fn from(value: &str) -> Self {
        Category::from(value.to_string())
    }
}

impl From<Category> for String {
    fn from(value: Category) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A product record as supplied by the catalog. Never mutated by the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub category: Category,
    /// Display grouping, e.g. "Dairy & Beverages"
    #[serde(default)]
    pub section: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    /// Unit price
    pub price: Money,
    pub expiry_date: NaiveDate,
    /// Units on hand
    pub stock: u32,
    /// Daily units sold, oldest first
    #[serde(default)]
    pub sales_last_7_days: Vec<Units>,
    /// Expected shelf-life window for this product; falls back to the
    /// category's max shelf life when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub typical_consumption_days: Option<u32>,
}

impl Product {
    /// Current inventory value at full price.
    pub fn inventory_value(&self) -> Money {
        self.price * Decimal::from(self.stock)
    }
}

/// Priority tier for acting on a product, ordered least to most urgent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    None,
    Low,
    Medium,
    High,
    Critical,
}

impl Urgency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Urgency::None => "none",
            Urgency::Low => "low",
            Urgency::Medium => "medium",
            Urgency::High => "high",
            Urgency::Critical => "critical",
        }
    }
}

impl fmt::Display for Urgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Recommended store action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    NoAction,
    Monitor,
    ConsiderDiscount,
    ScheduleDiscount,
    ApplyToday,
    ApplyImmediately,
    ImmediateClearance,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::NoAction => "no_action",
            Action::Monitor => "monitor",
            Action::ConsiderDiscount => "consider_discount",
            Action::ScheduleDiscount => "schedule_discount",
            Action::ApplyToday => "apply_today",
            Action::ApplyImmediately => "apply_immediately",
            Action::ImmediateClearance => "immediate_clearance",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}
