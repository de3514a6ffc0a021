//! Lot-costing domain types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Snapshot of one inventory lot as loaded inside the caller's transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LotState {
    /// The lot (batch) ID.
    pub id: Uuid,
    /// Units still available in this lot.
    pub quantity_remaining: Decimal,
    /// Historical unit cost the lot was stocked at.
    pub unit_cost: Decimal,
    /// Manufacturing date; the FIFO ordering key.
    pub manufacturing_date: NaiveDate,
}

/// One draw a consumption plan takes from a single lot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LotDraw {
    /// The lot drawn from.
    pub lot_id: Uuid,
    /// Units taken from this lot.
    pub quantity: Decimal,
    /// The lot's unit cost.
    pub unit_cost: Decimal,
    /// `quantity * unit_cost`, kept per draw so the audit trail shows where
    /// every rupee of COGS came from.
    pub cost: Decimal,
}

/// The resolved plan for consuming a requested quantity.
///
/// `total_cost` is the exact sum of the per-draw costs; COGS postings use it
/// directly. `unit_cost_realized` is derived (`total_cost / quantity`) and
/// exists for composition - production orders price their output lot with it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsumptionPlan {
    /// The draws, in consumption order.
    pub draws: Vec<LotDraw>,
    /// Total units consumed.
    pub quantity: Decimal,
    /// Exact weighted cost of the consumed units.
    pub total_cost: Decimal,
    /// Weighted actual unit cost (`total_cost / quantity`).
    pub unit_cost_realized: Decimal,
}

impl ConsumptionPlan {
    /// Builds a plan from its draws.
    #[must_use]
    pub fn from_draws(draws: Vec<LotDraw>) -> Self {
        let quantity: Decimal = draws.iter().map(|d| d.quantity).sum();
        let total_cost: Decimal = draws.iter().map(|d| d.cost).sum();
        let unit_cost_realized = if quantity.is_zero() {
            Decimal::ZERO
        } else {
            total_cost / quantity
        };
        Self {
            draws,
            quantity,
            total_cost,
            unit_cost_realized,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_plan_from_draws_weighs_cost() {
        let plan = ConsumptionPlan::from_draws(vec![
            LotDraw {
                lot_id: Uuid::new_v4(),
                quantity: dec!(10),
                unit_cost: dec!(8.00),
                cost: dec!(80.00),
            },
            LotDraw {
                lot_id: Uuid::new_v4(),
                quantity: dec!(5),
                unit_cost: dec!(10.00),
                cost: dec!(50.00),
            },
        ]);

        assert_eq!(plan.quantity, dec!(15));
        assert_eq!(plan.total_cost, dec!(130.00));
        // 130 / 15 = 8.666..., the weighted actual cost, not either lot's price.
        assert_eq!(plan.unit_cost_realized.round_dp(4), dec!(8.6667));
    }

    #[test]
    fn test_empty_plan_has_zero_unit_cost() {
        let plan = ConsumptionPlan::from_draws(vec![]);
        assert_eq!(plan.quantity, Decimal::ZERO);
        assert_eq!(plan.unit_cost_realized, Decimal::ZERO);
    }
}
