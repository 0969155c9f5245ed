use chrono::{Datelike, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::MarkdownError;
use crate::types::{Category, Rate};
use crate::MarkdownResult;

/// Month factor above which demand is seasonally high.
const HIGH_SEASON: Decimal = dec!(1.1);
/// Month factor below which demand is seasonally low.
const LOW_SEASON: Decimal = dec!(0.9);
/// Day factor above which store traffic is busy.
const BUSY_DAY: Decimal = dec!(1.2);
/// Day factor below which store traffic is slow.
const SLOW_DAY: Decimal = dec!(0.9);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Declarative demand calendar: month factors per category and one
/// day-of-week table (Sunday first).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeasonalCalendar {
    pub month_factors: BTreeMap<Category, [Rate; 12]>,
    pub day_factors: [Rate; 7],
}

/// Result of layering the seasonal calendar over a base discount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonalAdjustment {
    pub base_discount: u32,
    pub month_factor: Rate,
    pub day_factor: Rate,
    /// Product of the month and day adjustments applied to the base
    pub adjustment_factor: Rate,
    pub final_discount: u32,
    /// Calendar conditions that moved the factor away from 1.0
    pub drivers: Vec<String>,
    /// Explanation, present when the adjustment changed the discount
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl Default for SeasonalCalendar {
    fn default() -> Self {
        let mut month_factors = BTreeMap::new();
        month_factors.insert(
            Category::Dairy,
            [
                dec!(0.95), dec!(0.95), dec!(1.0), dec!(1.05), dec!(1.15), dec!(1.2),
                dec!(1.2), dec!(1.15), dec!(1.05), dec!(1.0), dec!(0.95), dec!(1.0),
            ],
        );
        month_factors.insert(
            Category::Produce,
            [
                dec!(0.85), dec!(0.9), dec!(1.0), dec!(1.1), dec!(1.2), dec!(1.25),
                dec!(1.25), dec!(1.2), dec!(1.1), dec!(1.0), dec!(0.9), dec!(0.85),
            ],
        );
        month_factors.insert(
            Category::Bakery,
            [
                dec!(0.85), dec!(0.9), dec!(0.95), dec!(1.0), dec!(1.0), dec!(0.95),
                dec!(0.95), dec!(0.95), dec!(1.0), dec!(1.1), dec!(1.2), dec!(1.3),
            ],
        );
        month_factors.insert(
            Category::Meat,
            [
                dec!(0.9), dec!(0.85), dec!(0.95), dec!(1.05), dec!(1.15), dec!(1.2),
                dec!(1.2), dec!(1.15), dec!(1.0), dec!(0.95), dec!(1.0), dec!(1.15),
            ],
        );
        month_factors.insert(
            Category::Prepared,
            [
                dec!(1.0), dec!(1.0), dec!(1.0), dec!(1.0), dec!(1.05), dec!(1.1),
                dec!(1.1), dec!(1.05), dec!(1.0), dec!(1.0), dec!(1.0), dec!(1.05),
            ],
        );

        SeasonalCalendar {
            month_factors,
            // Sun, Mon, Tue, Wed, Thu, Fri, Sat
            day_factors: [
                dec!(1.25), dec!(0.85), dec!(0.9), dec!(0.95), dec!(1.0), dec!(1.15), dec!(1.3),
            ],
        }
    }
}

impl SeasonalCalendar {
    pub fn validate(&self) -> MarkdownResult<()> {
        for (category, row) in &self.month_factors {
            if row.iter().any(|f| *f < Decimal::ZERO) {
                return Err(MarkdownError::InvalidInput {
                    field: format!("seasonal.month_factors.{category}"),
                    reason: "Seasonal factors cannot be negative.".into(),
                });
            }
        }
        if self.day_factors.iter().any(|f| *f < Decimal::ZERO) {
            return Err(MarkdownError::InvalidInput {
                field: "seasonal.day_factors".into(),
                reason: "Seasonal factors cannot be negative.".into(),
            });
        }
        Ok(())
    }

    /// Demand factor for `category` in the month of `date`; 1.0 for
    /// categories without a row.
    pub fn month_factor(&self, category: &Category, date: NaiveDate) -> Rate {
        self.month_factors
            .get(category)
            .map(|row| row[date.month0() as usize])
            .unwrap_or(Decimal::ONE)
    }

    /// Traffic factor for the weekday of `date`.
    pub fn day_factor(&self, date: NaiveDate) -> Rate {
        self.day_factors[date.weekday().num_days_from_sunday() as usize]
    }

    /// Scale `base_discount` for seasonal demand. High demand needs less
    /// discount, low demand needs more.
    pub fn adjust(&self, base_discount: u32, category: &Category, date: NaiveDate) -> SeasonalAdjustment {
        let month_factor = self.month_factor(category, date);
        let day_factor = self.day_factor(date);

        let mut adjustment_factor = Decimal::ONE;
        let mut drivers: Vec<String> = Vec::new();

        if month_factor > HIGH_SEASON {
            adjustment_factor *= dec!(0.8);
            drivers.push("high seasonal demand".to_string());
        } else if month_factor < LOW_SEASON {
            adjustment_factor *= dec!(1.2);
            drivers.push("low seasonal demand".to_string());
        }

        if day_factor > BUSY_DAY {
            adjustment_factor *= dec!(0.9);
            drivers.push("busy shopping day".to_string());
        } else if day_factor < SLOW_DAY {
            adjustment_factor *= dec!(1.1);
            drivers.push("slow shopping day".to_string());
        }

        let final_discount = round_percent(Decimal::from(base_discount) * adjustment_factor);
        let note = describe(&drivers, base_discount, final_discount);

        SeasonalAdjustment {
            base_discount,
            month_factor,
            day_factor,
            adjustment_factor,
            final_discount,
            drivers,
            note,
        }
    }
}

impl SeasonalAdjustment {
    /// Hold the final discount at `ceiling`, keeping the note in step.
    pub fn capped(mut self, ceiling: u32) -> Self {
        if self.final_discount > ceiling {
            self.final_discount = ceiling;
            self.note = describe(&self.drivers, self.base_discount, self.final_discount);
        }
        self
    }
}

fn describe(drivers: &[String], base_discount: u32, final_discount: u32) -> Option<String> {
    if final_discount == base_discount {
        return None;
    }
    Some(format!(
        "Seasonal adjustment ({}): {}% -> {}%",
        drivers.join(", "),
        base_discount,
        final_discount
    ))
}

/// Round a non-negative percentage to the nearest whole percent, halves up.
pub(crate) fn round_percent(value: Decimal) -> u32 {
    use rust_decimal::prelude::ToPrimitive;

    if value <= Decimal::ZERO {
        return 0;
    }
    value
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_u32()
        .unwrap_or(u32::MAX)
}
