//! Consumption planning over inventory lots.

use std::collections::HashSet;

use rust_decimal::Decimal;
use uuid::Uuid;

use super::error::CostingError;
use super::types::{ConsumptionPlan, LotDraw, LotState};

/// Plans a FIFO consumption of `quantity` units.
///
/// Lots are ordered by manufacturing date (oldest first, lot ID as the
/// tie-break so the order is deterministic); empty lots are skipped. The walk
/// takes `min(remaining, still_needed)` from each lot until satisfied.
///
/// # Errors
///
/// Returns [`CostingError::NonPositiveQuantity`] for a zero or negative
/// request, and [`CostingError::InsufficientStock`] when the usable lots
/// together hold less than `quantity` - the caller must abort its
/// transaction so no partial consumption persists.
pub fn plan_fifo(lots: &[LotState], quantity: Decimal) -> Result<ConsumptionPlan, CostingError> {
    if quantity <= Decimal::ZERO {
        return Err(CostingError::NonPositiveQuantity { quantity });
    }

    let mut ordered: Vec<&LotState> = lots
        .iter()
        .filter(|lot| lot.quantity_remaining > Decimal::ZERO)
        .collect();
    ordered.sort_by(|a, b| {
        a.manufacturing_date
            .cmp(&b.manufacturing_date)
            .then(a.id.cmp(&b.id))
    });

    let available: Decimal = ordered.iter().map(|lot| lot.quantity_remaining).sum();
    if available < quantity {
        return Err(CostingError::InsufficientStock {
            requested: quantity,
            available,
        });
    }

    Ok(walk(&ordered, quantity))
}

/// Plans a consumption from explicitly referenced lots, in caller order.
///
/// Used when the caller tracks serials or has reserved specific batches.
/// Each referenced lot must exist in `lots` and hold at least one unit.
/// A lot referenced more than once collapses to its first occurrence, so
/// its remaining stock is counted and drawn only once.
///
/// # Errors
///
/// Returns [`CostingError::LotNotAvailable`] for an unknown or exhausted
/// reference, and [`CostingError::InsufficientStock`] when the referenced
/// lots together cannot cover `quantity`.
pub fn plan_explicit(
    lots: &[LotState],
    lot_refs: &[Uuid],
    quantity: Decimal,
) -> Result<ConsumptionPlan, CostingError> {
    if quantity <= Decimal::ZERO {
        return Err(CostingError::NonPositiveQuantity { quantity });
    }

    let mut seen = HashSet::with_capacity(lot_refs.len());
    let mut ordered = Vec::with_capacity(lot_refs.len());
    for lot_id in lot_refs {
        if !seen.insert(*lot_id) {
            continue;
        }
        let lot = lots
            .iter()
            .find(|lot| lot.id == *lot_id && lot.quantity_remaining > Decimal::ZERO)
            .ok_or(CostingError::LotNotAvailable { lot_id: *lot_id })?;
        ordered.push(lot);
    }

    let available: Decimal = ordered.iter().map(|lot| lot.quantity_remaining).sum();
    if available < quantity {
        return Err(CostingError::InsufficientStock {
            requested: quantity,
            available,
        });
    }

    Ok(walk(&ordered, quantity))
}

/// Walks the ordered lots, drawing until the requested quantity is covered.
///
/// Precondition: the lots hold at least `quantity` units in total.
fn walk(ordered: &[&LotState], quantity: Decimal) -> ConsumptionPlan {
    let mut still_needed = quantity;
    let mut draws = Vec::new();

    for lot in ordered {
        if still_needed.is_zero() {
            break;
        }

        let take = still_needed.min(lot.quantity_remaining);
        draws.push(LotDraw {
            lot_id: lot.id,
            quantity: take,
            unit_cost: lot.unit_cost,
            cost: take * lot.unit_cost,
        });
        still_needed -= take;
    }

    ConsumptionPlan::from_draws(draws)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn lot(qty: Decimal, cost: Decimal, date: (i32, u32, u32)) -> LotState {
        LotState {
            id: Uuid::new_v4(),
            quantity_remaining: qty,
            unit_cost: cost,
            manufacturing_date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
        }
    }

    #[test]
    fn test_fifo_draws_oldest_lot_first() {
        // Two lots: 10 @ 8.00 (older), 10 @ 10.00 (newer); consume 15.
        let older = lot(dec!(10), dec!(8.00), (2026, 1, 5));
        let newer = lot(dec!(10), dec!(10.00), (2026, 2, 1));
        let lots = vec![newer.clone(), older.clone()];

        let plan = plan_fifo(&lots, dec!(15)).unwrap();

        assert_eq!(plan.draws.len(), 2);
        assert_eq!(plan.draws[0].lot_id, older.id);
        assert_eq!(plan.draws[0].quantity, dec!(10));
        assert_eq!(plan.draws[1].lot_id, newer.id);
        assert_eq!(plan.draws[1].quantity, dec!(5));
        // 10 x 8.00 + 5 x 10.00 = 130.00
        assert_eq!(plan.total_cost, dec!(130.00));
    }

    #[test]
    fn test_fifo_single_lot_partial_draw() {
        let only = lot(dec!(100), dec!(50.00), (2026, 3, 10));
        let plan = plan_fifo(&[only.clone()], dec!(40)).unwrap();

        assert_eq!(plan.draws.len(), 1);
        assert_eq!(plan.draws[0].quantity, dec!(40));
        assert_eq!(plan.total_cost, dec!(2000.00));
        assert_eq!(plan.unit_cost_realized, dec!(50.00));
    }

    #[test]
    fn test_fifo_skips_exhausted_lots() {
        let empty = lot(dec!(0), dec!(5.00), (2026, 1, 1));
        let live = lot(dec!(20), dec!(7.00), (2026, 1, 15));
        let plan = plan_fifo(&[empty, live.clone()], dec!(20)).unwrap();

        assert_eq!(plan.draws.len(), 1);
        assert_eq!(plan.draws[0].lot_id, live.id);
    }

    #[test]
    fn test_fifo_tie_breaks_on_lot_id() {
        let date = (2026, 4, 1);
        let mut a = lot(dec!(5), dec!(1.00), date);
        let mut b = lot(dec!(5), dec!(2.00), date);
        // Force a known ID order.
        a.id = Uuid::from_u128(1);
        b.id = Uuid::from_u128(2);

        let plan = plan_fifo(&[b.clone(), a.clone()], dec!(6)).unwrap();
        assert_eq!(plan.draws[0].lot_id, a.id);
        assert_eq!(plan.draws[1].lot_id, b.id);
    }

    #[test]
    fn test_fifo_insufficient_stock_reports_available() {
        let lots = vec![
            lot(dec!(4), dec!(8.00), (2026, 1, 5)),
            lot(dec!(6), dec!(9.00), (2026, 1, 9)),
        ];
        match plan_fifo(&lots, dec!(11)) {
            Err(CostingError::InsufficientStock {
                requested,
                available,
            }) => {
                assert_eq!(requested, dec!(11));
                assert_eq!(available, dec!(10));
            }
            other => panic!("expected InsufficientStock, got {other:?}"),
        }
    }

    #[test]
    fn test_fifo_rejects_non_positive_quantity() {
        let lots = vec![lot(dec!(10), dec!(8.00), (2026, 1, 5))];
        assert!(matches!(
            plan_fifo(&lots, Decimal::ZERO),
            Err(CostingError::NonPositiveQuantity { .. })
        ));
        assert!(matches!(
            plan_fifo(&lots, dec!(-3)),
            Err(CostingError::NonPositiveQuantity { .. })
        ));
    }

    #[test]
    fn test_explicit_follows_caller_order() {
        let older = lot(dec!(10), dec!(8.00), (2026, 1, 5));
        let newer = lot(dec!(10), dec!(10.00), (2026, 2, 1));
        let lots = vec![older.clone(), newer.clone()];

        // Caller asks for the newer lot first, overriding FIFO.
        let plan = plan_explicit(&lots, &[newer.id, older.id], dec!(12)).unwrap();

        assert_eq!(plan.draws[0].lot_id, newer.id);
        assert_eq!(plan.draws[0].quantity, dec!(10));
        assert_eq!(plan.draws[1].lot_id, older.id);
        assert_eq!(plan.draws[1].quantity, dec!(2));
        assert_eq!(plan.total_cost, dec!(116.00));
    }

    #[test]
    fn test_explicit_unknown_lot_rejected() {
        let lots = vec![lot(dec!(10), dec!(8.00), (2026, 1, 5))];
        let ghost = Uuid::new_v4();
        assert!(matches!(
            plan_explicit(&lots, &[ghost], dec!(1)),
            Err(CostingError::LotNotAvailable { lot_id }) if lot_id == ghost
        ));
    }

    #[test]
    fn test_explicit_duplicate_refs_count_stock_once() {
        let only = lot(dec!(10), dec!(8.00), (2026, 1, 5));
        let lots = vec![only.clone()];

        // Listing the same lot twice must not double its availability.
        match plan_explicit(&lots, &[only.id, only.id], dec!(15)) {
            Err(CostingError::InsufficientStock {
                requested,
                available,
            }) => {
                assert_eq!(requested, dec!(15));
                assert_eq!(available, dec!(10));
            }
            other => panic!("expected InsufficientStock, got {other:?}"),
        }

        // Within availability, the repeated ref yields a single draw.
        let plan = plan_explicit(&lots, &[only.id, only.id], dec!(8)).unwrap();
        assert_eq!(plan.draws.len(), 1);
        assert_eq!(plan.draws[0].lot_id, only.id);
        assert_eq!(plan.draws[0].quantity, dec!(8));
    }

    #[test]
    fn test_explicit_insufficient_across_refs() {
        let a = lot(dec!(3), dec!(8.00), (2026, 1, 5));
        let b = lot(dec!(2), dec!(9.00), (2026, 1, 6));
        let lots = vec![a.clone(), b.clone()];

        assert!(matches!(
            plan_explicit(&lots, &[a.id, b.id], dec!(6)),
            Err(CostingError::InsufficientStock { .. })
        ));
    }
}
