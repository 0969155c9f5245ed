use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::pricing::discount::DiscountRecommendation;
use crate::temporal::{average_daily_sales, days_until_expiry};
use crate::types::{Money, Product, Units};

/// Projected unsold stock at expiry given current sales velocity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LossProjection {
    pub expected_sales: Units,
    pub potential_unsold_units: Units,
    pub potential_revenue_loss: Money,
}

/// Financial view of a product at the recommended discount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialMetrics {
    /// stock x price
    pub current_value: Money,
    pub discounted_price: Money,
    /// stock x discounted price
    pub discounted_value: Money,
    /// Revenue forfeited if unsold stock expires
    pub potential_loss: Money,
    /// current value - potential loss
    pub potential_savings: Money,
    /// Revenue given up by marking down the full stock
    pub markdown_cost: Money,
    pub potential_unsold_units: Units,
}

/// Price after a whole-percent discount.
pub fn discounted_price(price: Money, discount_pct: u32) -> Money {
    price * (Decimal::ONE - Decimal::from(discount_pct) / dec!(100))
}

/// Project unsold units and the revenue lost if they expire. Both figures are
/// non-negative; expired stock is entirely at risk.
pub fn potential_loss(product: &Product, reference_date: NaiveDate) -> LossProjection {
    let avg = average_daily_sales(&product.sales_last_7_days);
    let days_left = days_until_expiry(product.expiry_date, reference_date).max(0);
    let stock = Decimal::from(product.stock);

    let expected_sales = stock.min(avg * Decimal::from(days_left));
    let potential_unsold_units = (stock - expected_sales).max(Decimal::ZERO);

    LossProjection {
        expected_sales,
        potential_unsold_units,
        potential_revenue_loss: potential_unsold_units * product.price,
    }
}

/// Revenue difference from marking the full stock down to the recommended
/// price. Assumes the whole stock sells at the discounted price.
pub fn markdown_savings(product: &Product, rec: &DiscountRecommendation) -> Money {
    (product.price - discounted_price(product.price, rec.discount)) * Decimal::from(product.stock)
}

/// Combine the recommendation and the loss projection into one view.
pub fn financial_metrics(
    product: &Product,
    rec: &DiscountRecommendation,
    loss: &LossProjection,
) -> FinancialMetrics {
    let stock = Decimal::from(product.stock);
    let current_value = product.inventory_value();
    let price_after = discounted_price(product.price, rec.discount);

    FinancialMetrics {
        current_value,
        discounted_price: price_after,
        discounted_value: stock * price_after,
        potential_loss: loss.potential_revenue_loss,
        potential_savings: current_value - loss.potential_revenue_loss,
        markdown_cost: markdown_savings(product, rec),
        potential_unsold_units: loss.potential_unsold_units,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::PolicyTable;
    use crate::pricing::discount::calculate_discount;
    use crate::types::{Category, ProductId};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 25).unwrap()
    }

    fn product(days_left: i64, stock: u32, daily: Decimal) -> Product {
        Product {
            id: ProductId::Number(3),
            name: "Masti Dahi 400g".into(),
            category: Category::Dairy,
            section: "Dairy & Beverages".into(),
            brand: Some("Amul".into()),
            price: dec!(35),
            expiry_date: today() + chrono::Duration::days(days_left),
            stock,
            sales_last_7_days: vec![daily; 7],
            typical_consumption_days: Some(3),
        }
    }

    #[test]
    fn test_discounted_price_bounds() {
        assert_eq!(discounted_price(dec!(54), 0), dec!(54));
        assert_eq!(discounted_price(dec!(54), 100), Decimal::ZERO);
        assert_eq!(discounted_price(dec!(80), 25), dec!(60));
    }

    #[test]
    fn test_potential_loss_with_partial_sell_through() {
        // 2 days x 10/day = 20 expected of 65
        let loss = potential_loss(&product(2, 65, dec!(10)), today());
        assert_eq!(loss.expected_sales, dec!(20));
        assert_eq!(loss.potential_unsold_units, dec!(45));
        assert_eq!(loss.potential_revenue_loss, dec!(1575));
    }

    #[test]
    fn test_potential_loss_zero_when_stock_sells() {
        let loss = potential_loss(&product(5, 20, dec!(10)), today());
        assert_eq!(loss.expected_sales, dec!(20));
        assert_eq!(loss.potential_unsold_units, Decimal::ZERO);
        assert_eq!(loss.potential_revenue_loss, Decimal::ZERO);
    }

    #[test]
    fn test_expired_stock_is_fully_at_risk() {
        let loss = potential_loss(&product(-2, 12, dec!(10)), today());
        assert_eq!(loss.expected_sales, Decimal::ZERO);
        assert_eq!(loss.potential_unsold_units, dec!(12));
        assert_eq!(loss.potential_revenue_loss, dec!(420));
    }

    #[test]
    fn test_financial_metrics_identities() {
        let p = product(1, 40, dec!(8));
        let rec = calculate_discount(&p, today(), &PolicyTable::default());
        let loss = potential_loss(&p, today());
        let fin = financial_metrics(&p, &rec, &loss);

        assert_eq!(fin.current_value, dec!(1400));
        assert_eq!(fin.discounted_value, Decimal::from(p.stock) * fin.discounted_price);
        assert_eq!(fin.potential_savings, fin.current_value - fin.potential_loss);
        assert_eq!(fin.markdown_cost, fin.current_value - fin.discounted_value);
        assert!(fin.potential_loss >= Decimal::ZERO);
    }
}
