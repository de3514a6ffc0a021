//! Inventory repository: the persistence half of the costing engine.
//!
//! Loads lot rows under row locks, runs the pure consumption planner, and
//! applies the decrements plus a lot-draw log row per draw. The log is what
//! makes reversal exact: `restore` re-adds the logged quantities to their
//! original batches and clears the log.

use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use khata_core::costing::{plan_explicit, plan_fifo, ConsumptionPlan, CostingError, LotState};
use khata_core::ledger::ReferenceType;

use crate::entities::{batches, lot_draws, sea_orm_active_enums};

/// Error types for inventory operations.
#[derive(Debug, thiserror::Error)]
pub enum InventoryError {
    /// Planning failure (insufficient stock, bad quantity, unknown lot);
    /// the caller must roll back.
    #[error(transparent)]
    Costing(#[from] CostingError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl InventoryError {
    /// Returns the stable error code for logs and CLI output.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Costing(err) => err.error_code(),
            Self::Database(_) => "DATABASE_ERROR",
        }
    }
}

/// Input for consuming stock from a product's lots.
#[derive(Debug, Clone)]
pub struct ConsumeInput {
    /// The business consuming.
    pub business_id: Uuid,
    /// Product whose lots are drawn.
    pub product_id: Uuid,
    /// Warehouse the lots live in.
    pub warehouse_id: Uuid,
    /// Units to consume.
    pub quantity: Decimal,
    /// Explicit lot order; `None` selects FIFO by manufacturing date.
    pub lot_refs: Option<Vec<Uuid>>,
    /// The consuming document's kind, logged on every draw.
    pub reference_type: ReferenceType,
    /// The consuming document's ID.
    pub reference_id: Uuid,
}

/// Input for stocking a new lot.
#[derive(Debug, Clone)]
pub struct ProduceLotInput {
    /// The business receiving stock.
    pub business_id: Uuid,
    /// Product the lot holds.
    pub product_id: Uuid,
    /// Warehouse the lot lives in.
    pub warehouse_id: Uuid,
    /// Units received.
    pub quantity: Decimal,
    /// Historical unit cost for this lot.
    pub unit_cost: Decimal,
    /// Manufacturing date; the FIFO ordering key.
    pub manufacturing_date: NaiveDate,
    /// Optional expiry date.
    pub expiry_date: Option<NaiveDate>,
}

/// Units re-added to one product's lots by a restore.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestoredQuantity {
    /// The product whose lots were topped back up.
    pub product_id: Uuid,
    /// Total units restored across its lots.
    pub quantity: Decimal,
}

/// Open-lot summary for one product.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StockOnHand {
    /// Units across open lots.
    pub quantity: Decimal,
    /// Value at historical cost (`Σ quantity × unit_cost`).
    pub value: Decimal,
}

/// Inventory repository over batches and the lot-draw log.
#[derive(Debug, Clone)]
pub struct InventoryRepository {
    db: DatabaseConnection,
}

impl InventoryRepository {
    /// Creates a new inventory repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Consumes stock inside the caller's transaction.
    ///
    /// Open lots are loaded with `FOR UPDATE` so concurrent consumers
    /// serialize and `quantity_remaining` can never go negative; the
    /// `InsufficientStock` check runs against that locked snapshot. Each
    /// draw decrements its batch and writes one lot-draw log row tagged
    /// with the consuming document.
    ///
    /// # Errors
    ///
    /// Returns [`CostingError::InsufficientStock`] (and the other planning
    /// errors) or a database error; either way the caller must roll back.
    pub async fn consume(
        &self,
        txn: &DatabaseTransaction,
        input: ConsumeInput,
    ) -> Result<ConsumptionPlan, InventoryError> {
        let rows = batches::Entity::find()
            .filter(batches::Column::BusinessId.eq(input.business_id))
            .filter(batches::Column::ProductId.eq(input.product_id))
            .filter(batches::Column::WarehouseId.eq(input.warehouse_id))
            .filter(batches::Column::QuantityRemaining.gt(Decimal::ZERO))
            .order_by_asc(batches::Column::ManufacturingDate)
            .order_by_asc(batches::Column::Id)
            .lock_exclusive()
            .all(txn)
            .await?;

        let lots: Vec<LotState> = rows
            .iter()
            .map(|row| LotState {
                id: row.id,
                quantity_remaining: row.quantity_remaining,
                unit_cost: row.unit_cost,
                manufacturing_date: row.manufacturing_date,
            })
            .collect();

        let plan = match &input.lot_refs {
            Some(refs) => plan_explicit(&lots, refs, input.quantity)?,
            None => plan_fifo(&lots, input.quantity)?,
        };

        let now = chrono::Utc::now().into();
        for draw in &plan.draws {
            batches::Entity::update_many()
                .col_expr(
                    batches::Column::QuantityRemaining,
                    Expr::col(batches::Column::QuantityRemaining).sub(draw.quantity),
                )
                .filter(batches::Column::Id.eq(draw.lot_id))
                .exec(txn)
                .await?;

            lot_draws::ActiveModel {
                id: Set(Uuid::new_v4()),
                business_id: Set(input.business_id),
                batch_id: Set(draw.lot_id),
                reference_type: Set(input.reference_type.into()),
                reference_id: Set(input.reference_id),
                quantity: Set(draw.quantity),
                unit_cost: Set(draw.unit_cost),
                created_at: Set(now),
            }
            .insert(txn)
            .await?;
        }

        tracing::info!(
            business_id = %input.business_id,
            product_id = %input.product_id,
            warehouse_id = %input.warehouse_id,
            quantity = %plan.quantity,
            total_cost = %plan.total_cost,
            lots = plan.draws.len(),
            reference_type = %input.reference_type,
            reference_id = %input.reference_id,
            "stock consumed"
        );
        Ok(plan)
    }

    /// Stocks a new lot inside the caller's transaction.
    ///
    /// Used by purchase receipt, production completion, and manual stock
    /// adds. Returns the new lot's ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub async fn produce(
        &self,
        txn: &DatabaseTransaction,
        input: ProduceLotInput,
    ) -> Result<Uuid, InventoryError> {
        let lot_id = Uuid::new_v4();
        batches::ActiveModel {
            id: Set(lot_id),
            business_id: Set(input.business_id),
            product_id: Set(input.product_id),
            warehouse_id: Set(input.warehouse_id),
            quantity_received: Set(input.quantity),
            quantity_remaining: Set(input.quantity),
            unit_cost: Set(input.unit_cost),
            manufacturing_date: Set(input.manufacturing_date),
            expiry_date: Set(input.expiry_date),
            created_at: Set(chrono::Utc::now().into()),
        }
        .insert(txn)
        .await?;

        tracing::info!(
            business_id = %input.business_id,
            product_id = %input.product_id,
            warehouse_id = %input.warehouse_id,
            lot_id = %lot_id,
            quantity = %input.quantity,
            unit_cost = %input.unit_cost,
            "lot stocked"
        );
        Ok(lot_id)
    }

    /// Re-adds every quantity a document drew back to its original lots.
    ///
    /// Deletes the document's lot-draw log rows and returns the total
    /// restored per product so the caller can fix stock counters. Zero
    /// logged draws is a success returning an empty vec.
    ///
    /// # Errors
    ///
    /// Returns an error if a database operation fails.
    pub async fn restore(
        &self,
        txn: &DatabaseTransaction,
        business_id: Uuid,
        reference_type: ReferenceType,
        reference_id: Uuid,
    ) -> Result<Vec<RestoredQuantity>, InventoryError> {
        let draws = lot_draws::Entity::find()
            .filter(lot_draws::Column::BusinessId.eq(business_id))
            .filter(lot_draws::Column::ReferenceType.eq(
                sea_orm_active_enums::ReferenceType::from(reference_type),
            ))
            .filter(lot_draws::Column::ReferenceId.eq(reference_id))
            .all(txn)
            .await?;
        if draws.is_empty() {
            return Ok(Vec::new());
        }

        let batch_ids: Vec<Uuid> = draws.iter().map(|draw| draw.batch_id).collect();
        let batch_rows = batches::Entity::find()
            .filter(batches::Column::Id.is_in(batch_ids))
            .lock_exclusive()
            .all(txn)
            .await?;
        let product_of: HashMap<Uuid, Uuid> = batch_rows
            .into_iter()
            .map(|row| (row.id, row.product_id))
            .collect();

        for draw in &draws {
            batches::Entity::update_many()
                .col_expr(
                    batches::Column::QuantityRemaining,
                    Expr::col(batches::Column::QuantityRemaining).add(draw.quantity),
                )
                .filter(batches::Column::Id.eq(draw.batch_id))
                .exec(txn)
                .await?;
        }

        let restored = sum_restored(
            draws.iter().map(|draw| (draw.batch_id, draw.quantity)),
            &product_of,
        );

        let draw_ids: Vec<Uuid> = draws.iter().map(|draw| draw.id).collect();
        lot_draws::Entity::delete_many()
            .filter(lot_draws::Column::Id.is_in(draw_ids))
            .exec(txn)
            .await?;

        tracing::info!(
            %business_id,
            reference_type = %reference_type,
            %reference_id,
            draws = draws.len(),
            "lot draws restored"
        );
        Ok(restored)
    }

    /// Summarizes a product's open lots: units on hand plus value at cost.
    ///
    /// `warehouse_id` narrows to one warehouse; `None` covers all of them.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn stock_on_hand(
        &self,
        business_id: Uuid,
        product_id: Uuid,
        warehouse_id: Option<Uuid>,
    ) -> Result<StockOnHand, InventoryError> {
        let mut query = batches::Entity::find()
            .filter(batches::Column::BusinessId.eq(business_id))
            .filter(batches::Column::ProductId.eq(product_id))
            .filter(batches::Column::QuantityRemaining.gt(Decimal::ZERO));
        if let Some(warehouse_id) = warehouse_id {
            query = query.filter(batches::Column::WarehouseId.eq(warehouse_id));
        }
        let rows = query.all(&self.db).await?;

        let mut on_hand = StockOnHand {
            quantity: Decimal::ZERO,
            value: Decimal::ZERO,
        };
        for row in rows {
            on_hand.quantity += row.quantity_remaining;
            on_hand.value += row.quantity_remaining * row.unit_cost;
        }
        Ok(on_hand)
    }
}

/// Folds draw rows into per-product restored totals, ordered by product ID
/// for deterministic output.
fn sum_restored(
    draws: impl Iterator<Item = (Uuid, Decimal)>,
    product_of: &HashMap<Uuid, Uuid>,
) -> Vec<RestoredQuantity> {
    let mut by_product: HashMap<Uuid, Decimal> = HashMap::new();
    for (batch_id, quantity) in draws {
        if let Some(product_id) = product_of.get(&batch_id) {
            *by_product.entry(*product_id).or_insert(Decimal::ZERO) += quantity;
        }
    }

    let mut restored: Vec<RestoredQuantity> = by_product
        .into_iter()
        .map(|(product_id, quantity)| RestoredQuantity {
            product_id,
            quantity,
        })
        .collect();
    restored.sort_by_key(|r| r.product_id);
    restored
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_sum_restored_groups_batches_by_product() {
        let product_a = Uuid::from_u128(1);
        let product_b = Uuid::from_u128(2);
        let batch_1 = Uuid::from_u128(10);
        let batch_2 = Uuid::from_u128(11);
        let batch_3 = Uuid::from_u128(12);
        let product_of: HashMap<Uuid, Uuid> = [
            (batch_1, product_a),
            (batch_2, product_a),
            (batch_3, product_b),
        ]
        .into_iter()
        .collect();

        // A sale that drew from two lots of product A and one of product B.
        let draws = vec![
            (batch_1, dec!(10)),
            (batch_2, dec!(5)),
            (batch_3, dec!(3)),
        ];

        let restored = sum_restored(draws.into_iter(), &product_of);
        assert_eq!(restored.len(), 2);
        assert_eq!(restored[0].product_id, product_a);
        assert_eq!(restored[0].quantity, dec!(15));
        assert_eq!(restored[1].product_id, product_b);
        assert_eq!(restored[1].quantity, dec!(3));
    }

    #[test]
    fn test_sum_restored_empty() {
        assert!(sum_restored(std::iter::empty(), &HashMap::new()).is_empty());
    }
}
