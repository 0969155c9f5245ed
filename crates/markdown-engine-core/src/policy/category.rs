use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::MarkdownError;
use crate::types::{Category, Rate};
use crate::MarkdownResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Pricing policy for one product category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryPolicy {
    /// Shelf life in days used when a product has no consumption window
    pub max_shelf_life: u32,
    /// Fraction of shelf life remaining at or below which a product is urgent
    pub urgent_threshold: Rate,
    /// Fraction of shelf life remaining at or below which a product is critical
    pub critical_threshold: Rate,
    /// Discount cap in whole percent
    pub max_discount: u32,
    /// Multiplier (>= 1) amplifying discounts for fast-decaying goods
    pub perishability_factor: Rate,
}

impl CategoryPolicy {
    /// Clearance discount for expired stock; also the ceiling for every
    /// non-expired shelf-life stage.
    pub fn clearance_discount(&self) -> u32 {
        self.max_discount + 10
    }

    /// Absolute ceiling for any final discount in this category.
    pub fn discount_ceiling(&self) -> u32 {
        self.max_discount + 15
    }
}

/// Immutable mapping of category to policy with a required default entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyTable {
    pub categories: BTreeMap<Category, CategoryPolicy>,
    pub default: CategoryPolicy,
}

impl Default for PolicyTable {
    fn default() -> Self {
        let mut categories = BTreeMap::new();
        categories.insert(Category::Dairy, policy(14, dec!(0.30), dec!(0.15), 50, dec!(1.2)));
        categories.insert(Category::Produce, policy(10, dec!(0.35), dec!(0.15), 60, dec!(1.3)));
        categories.insert(Category::Bakery, policy(5, dec!(0.40), dec!(0.20), 50, dec!(1.4)));
        categories.insert(Category::Meat, policy(7, dec!(0.35), dec!(0.20), 55, dec!(1.5)));
        categories.insert(Category::Prepared, policy(3, dec!(0.50), dec!(0.25), 60, dec!(1.5)));

        PolicyTable {
            categories,
            default: policy(30, dec!(0.25), dec!(0.10), 40, dec!(1.0)),
        }
    }
}

impl PolicyTable {
    /// Policy for `category`, falling back to the default entry.
    pub fn resolve(&self, category: &Category) -> &CategoryPolicy {
        match self.categories.get(category) {
            Some(p) => p,
            None => {
                tracing::trace!(category = %category, "no category policy, using default");
                &self.default
            }
        }
    }

    /// Whether `category` has its own policy entry.
    pub fn has_policy(&self, category: &Category) -> bool {
        self.categories.contains_key(category)
    }

    /// Check every entry is internally consistent.
    pub fn validate(&self) -> MarkdownResult<()> {
        validate_policy("default", &self.default)?;
        for (category, p) in &self.categories {
            validate_policy(category.as_str(), p)?;
        }
        Ok(())
    }
}

fn policy(
    max_shelf_life: u32,
    urgent_threshold: Rate,
    critical_threshold: Rate,
    max_discount: u32,
    perishability_factor: Rate,
) -> CategoryPolicy {
    CategoryPolicy {
        max_shelf_life,
        urgent_threshold,
        critical_threshold,
        max_discount,
        perishability_factor,
    }
}

fn validate_policy(name: &str, p: &CategoryPolicy) -> MarkdownResult<()> {
    if p.max_shelf_life == 0 {
        return Err(MarkdownError::InvalidInput {
            field: format!("policies.{name}.max_shelf_life"),
            reason: "Max shelf life must be at least one day.".into(),
        });
    }
    if p.critical_threshold < Decimal::ZERO || p.urgent_threshold > Decimal::ONE {
        return Err(MarkdownError::InvalidInput {
            field: format!("policies.{name}"),
            reason: "Thresholds must lie between 0 and 1.".into(),
        });
    }
    if p.critical_threshold > p.urgent_threshold {
        return Err(MarkdownError::InvalidInput {
            field: format!("policies.{name}.critical_threshold"),
            reason: "Critical threshold cannot exceed the urgent threshold.".into(),
        });
    }
    if p.max_discount > 85 {
        return Err(MarkdownError::InvalidInput {
            field: format!("policies.{name}.max_discount"),
            reason: "Max discount above 85% would allow discounts over 100%.".into(),
        });
    }
    if p.perishability_factor < Decimal::ONE {
        return Err(MarkdownError::InvalidInput {
            field: format!("policies.{name}.perishability_factor"),
            reason: "Perishability factor must be at least 1.".into(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_category_resolves_own_policy() {
        let table = PolicyTable::default();
        let dairy = table.resolve(&Category::Dairy);
        assert_eq!(dairy.max_shelf_life, 14);
        assert_eq!(dairy.max_discount, 50);
        assert_eq!(dairy.clearance_discount(), 60);
        assert_eq!(dairy.discount_ceiling(), 65);
    }

    #[test]
    fn test_unknown_category_falls_back_to_default() {
        let table = PolicyTable::default();
        let snacks = table.resolve(&Category::from("snacks"));
        assert_eq!(snacks, &table.default);
        assert!(!table.has_policy(&Category::from("snacks")));
    }

    #[test]
    fn test_builtin_table_is_valid() {
        assert!(PolicyTable::default().validate().is_ok());
    }

    #[test]
    fn test_inverted_thresholds_rejected() {
        let mut table = PolicyTable::default();
        table.default.critical_threshold = dec!(0.5);
        table.default.urgent_threshold = dec!(0.2);
        assert!(table.validate().is_err());
    }

    #[test]
    fn test_partial_table_deserializes_with_defaults() {
        let json = r#"{"default": {"max_shelf_life": 20, "urgent_threshold": "0.3",
            "critical_threshold": "0.1", "max_discount": 35, "perishability_factor": "1"}}"#;
        let table: PolicyTable = serde_json::from_str(json).unwrap();
        assert_eq!(table.default.max_discount, 35);
        // categories keep built-in values
        assert!(table.has_policy(&Category::Meat));
    }
}
