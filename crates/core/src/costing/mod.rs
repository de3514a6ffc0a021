//! Inventory lot-costing logic.
//!
//! This module implements the pure half of the Costing Engine: given the
//! current lot states for a product, it plans which lots a consumption draws
//! from (oldest manufacturing date first, or an explicit caller-supplied lot
//! order) and what the realized cost is. The database layer loads lots under
//! row locks, runs the planner, and applies the decrements.

pub mod error;
pub mod plan;
pub mod types;

#[cfg(test)]
mod plan_props;

pub use error::CostingError;
pub use plan::{plan_explicit, plan_fifo};
pub use types::{ConsumptionPlan, LotDraw, LotState};
