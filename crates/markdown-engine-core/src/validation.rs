use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::HashSet;

use crate::error::MarkdownError;
use crate::policy::PolicyTable;
use crate::temporal::days_until_expiry;
use crate::types::Product;
use crate::MarkdownResult;

/// Expected length of the daily sales history.
pub const SALES_HISTORY_DAYS: usize = 7;

/// Check a product against the input contract on `reference_date`.
///
/// Broken upstream data (non-positive price, negative sales, zero
/// consumption window, blank name) is an error. Anything the engine can
/// default around comes back as a warning.
pub fn validate_product(
    product: &Product,
    reference_date: NaiveDate,
    policies: &PolicyTable,
) -> MarkdownResult<Vec<String>> {
    let mut warnings = validate_record(product, policies)?;

    if days_until_expiry(product.expiry_date, reference_date) <= 0 {
        warnings.push(format!(
            "Product '{}' is past expiry ({} on {}).",
            product.id, product.expiry_date, reference_date
        ));
    }
    Ok(warnings)
}

/// Date-independent part of [`validate_product`].
pub fn validate_record(product: &Product, policies: &PolicyTable) -> MarkdownResult<Vec<String>> {
    let mut warnings = Vec::new();
    let id = &product.id;

    if product.name.trim().is_empty() {
        return Err(MarkdownError::InvalidInput {
            field: "name".into(),
            reason: format!("Product '{id}' has an empty name."),
        });
    }
    if product.price <= Decimal::ZERO {
        return Err(MarkdownError::InvalidInput {
            field: "price".into(),
            reason: format!("Price must be positive for product '{id}'."),
        });
    }
    if product.sales_last_7_days.iter().any(|s| *s < Decimal::ZERO) {
        return Err(MarkdownError::InvalidInput {
            field: "sales_last_7_days".into(),
            reason: format!("Daily sales cannot be negative for product '{id}'."),
        });
    }
    if product.typical_consumption_days == Some(0) {
        return Err(MarkdownError::InvalidInput {
            field: "typical_consumption_days".into(),
            reason: format!("Consumption window must be at least one day for product '{id}'."),
        });
    }

    match product.sales_last_7_days.len() {
        0 => warnings.push(format!(
            "Product '{id}': no sales history; average daily sales treated as 0."
        )),
        SALES_HISTORY_DAYS => {}
        n => warnings.push(format!(
            "Product '{id}': sales history has {n} days, expected {SALES_HISTORY_DAYS}."
        )),
    }

    if !policies.has_policy(&product.category) {
        warnings.push(format!(
            "Product '{id}': category '{}' has no policy; default policy applied.",
            product.category
        ));
    }

    Ok(warnings)
}

/// Validate every product in a catalog and flag duplicate ids.
pub fn validate_catalog(
    products: &[Product],
    reference_date: NaiveDate,
    policies: &PolicyTable,
) -> MarkdownResult<Vec<String>> {
    let mut warnings = Vec::new();
    let mut seen = HashSet::new();

    for product in products {
        warnings.extend(validate_product(product, reference_date, policies)?);
        if !seen.insert(&product.id) {
            warnings.push(format!("Duplicate product id '{}'.", product.id));
        }
    }
    Ok(warnings)
}
