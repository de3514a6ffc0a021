//! Property-based tests for consumption planning.

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use uuid::Uuid;

use super::error::CostingError;
use super::plan::{plan_explicit, plan_fifo};
use super::types::LotState;

/// Strategy for a single lot: 1-500 units at 0.01-200.00 per unit, stocked
/// on an arbitrary day of 2026.
fn lot_strategy() -> impl Strategy<Value = LotState> {
    (1i64..=500i64, 1i64..=20_000i64, 0u64..365u64).prop_map(|(qty, cost_cents, day_offset)| {
        let base = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        LotState {
            id: Uuid::new_v4(),
            quantity_remaining: Decimal::from(qty),
            unit_cost: Decimal::new(cost_cents, 2),
            manufacturing_date: base + chrono::Days::new(day_offset),
        }
    })
}

fn lots_strategy() -> impl Strategy<Value = Vec<LotState>> {
    proptest::collection::vec(lot_strategy(), 1..8)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Property 2.1: A satisfiable plan consumes exactly the requested
    /// quantity, and its total cost is the sum of draw quantity x unit cost.
    #[test]
    fn prop_plan_conserves_quantity_and_cost(
        lots in lots_strategy(),
        fraction in 1u32..=100u32,
    ) {
        let available: Decimal = lots.iter().map(|l| l.quantity_remaining).sum();
        let requested = (available * Decimal::from(fraction) / Decimal::from(100u32)).floor();
        prop_assume!(requested > Decimal::ZERO);

        let plan = plan_fifo(&lots, requested).unwrap();

        let drawn: Decimal = plan.draws.iter().map(|d| d.quantity).sum();
        prop_assert_eq!(drawn, requested);
        prop_assert_eq!(plan.quantity, requested);

        let weighted: Decimal = plan.draws.iter().map(|d| d.quantity * d.unit_cost).sum();
        prop_assert_eq!(plan.total_cost, weighted);
    }

    /// Property 2.2: FIFO never draws from a lot while an older lot still
    /// has stock - every draw except the last fully exhausts its lot, and
    /// draws come out in manufacturing-date order.
    #[test]
    fn prop_fifo_exhausts_older_lots_first(
        lots in lots_strategy(),
        fraction in 1u32..=99u32,
    ) {
        let available: Decimal = lots.iter().map(|l| l.quantity_remaining).sum();
        let requested = (available * Decimal::from(fraction) / Decimal::from(100u32)).floor();
        prop_assume!(requested > Decimal::ZERO);

        let plan = plan_fifo(&lots, requested).unwrap();

        let date_of = |id: Uuid| {
            lots.iter()
                .find(|l| l.id == id)
                .map(|l| l.manufacturing_date)
                .unwrap()
        };

        for pair in plan.draws.windows(2) {
            prop_assert!(date_of(pair[0].lot_id) <= date_of(pair[1].lot_id));
        }

        // Every draw but the last must take the lot's full remaining quantity.
        for (i, draw) in plan.draws.iter().enumerate() {
            if i + 1 < plan.draws.len() {
                let lot = lots.iter().find(|l| l.id == draw.lot_id).unwrap();
                prop_assert_eq!(draw.quantity, lot.quantity_remaining);
            }
        }
    }

    /// Property 2.3: Requesting more than the total available fails with
    /// InsufficientStock carrying the exact availability.
    #[test]
    fn prop_over_request_fails_with_availability(
        lots in lots_strategy(),
        excess in 1i64..=100i64,
    ) {
        let available: Decimal = lots.iter().map(|l| l.quantity_remaining).sum();
        let requested = available + Decimal::from(excess);

        match plan_fifo(&lots, requested) {
            Err(CostingError::InsufficientStock { requested: r, available: a }) => {
                prop_assert_eq!(r, requested);
                prop_assert_eq!(a, available);
            }
            other => prop_assert!(false, "expected InsufficientStock, got {:?}", other),
        }
    }

    /// Property 2.4: Consuming everything drains every lot exactly.
    #[test]
    fn prop_full_consumption_drains_all_lots(lots in lots_strategy()) {
        let available: Decimal = lots.iter().map(|l| l.quantity_remaining).sum();

        let plan = plan_fifo(&lots, available).unwrap();

        prop_assert_eq!(plan.quantity, available);
        prop_assert_eq!(plan.draws.len(), lots.len());
        for draw in &plan.draws {
            let lot = lots.iter().find(|l| l.id == draw.lot_id).unwrap();
            prop_assert_eq!(draw.quantity, lot.quantity_remaining);
        }
    }

    /// Property 2.5: An explicit plan draws each lot at most once and never
    /// beyond its remaining quantity, even when the caller repeats
    /// references.
    #[test]
    fn prop_explicit_duplicate_refs_never_overdraw(
        lots in lots_strategy(),
        fraction in 1u32..=100u32,
    ) {
        let available: Decimal = lots.iter().map(|l| l.quantity_remaining).sum();
        let requested = (available * Decimal::from(fraction) / Decimal::from(100u32)).floor();
        prop_assume!(requested > Decimal::ZERO);

        // Every lot referenced twice.
        let refs: Vec<Uuid> = lots.iter().flat_map(|l| [l.id, l.id]).collect();
        let plan = plan_explicit(&lots, &refs, requested).unwrap();

        let drawn: Decimal = plan.draws.iter().map(|d| d.quantity).sum();
        prop_assert_eq!(drawn, requested);
        for draw in &plan.draws {
            let lot = lots.iter().find(|l| l.id == draw.lot_id).unwrap();
            prop_assert!(draw.quantity <= lot.quantity_remaining);
        }

        let mut drawn_ids: Vec<Uuid> = plan.draws.iter().map(|d| d.lot_id).collect();
        drawn_ids.sort_unstable();
        drawn_ids.dedup();
        prop_assert_eq!(drawn_ids.len(), plan.draws.len());
    }

    /// Property 2.6: Over-requesting against duplicated references fails
    /// with the true availability, each lot counted once.
    #[test]
    fn prop_explicit_over_request_counts_each_lot_once(
        lots in lots_strategy(),
        excess in 1i64..=100i64,
    ) {
        let available: Decimal = lots.iter().map(|l| l.quantity_remaining).sum();
        let requested = available + Decimal::from(excess);
        let refs: Vec<Uuid> = lots.iter().flat_map(|l| [l.id, l.id]).collect();

        match plan_explicit(&lots, &refs, requested) {
            Err(CostingError::InsufficientStock { requested: r, available: a }) => {
                prop_assert_eq!(r, requested);
                prop_assert_eq!(a, available);
            }
            other => prop_assert!(false, "expected InsufficientStock, got {:?}", other),
        }
    }
}
