//! Production order lifecycle: create and complete.
//!
//! Completing an order consumes its component lots (FIFO, or the pinned
//! batch per component), writes any scrap cost off to operating expense,
//! and stocks one finished lot carrying the rest of the consumed cost.
//! The finished unit cost is actual, never standard: what the components
//! really cost divided by what came out.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    QueryFilter, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use khata_core::chart::AccountRole;
use khata_core::costing::CostingError;
use khata_core::documents::ProductionStatus;
use khata_core::ledger::{JournalLineInput, PostJournalInput, ReferenceType};
use khata_db::entities::{production_components, production_orders};
use khata_db::repositories::{
    ConsumeInput, CounterRepository, InventoryError, InventoryRepository, JournalRepository,
    ProduceLotInput,
};
use khata_shared::ActorContext;

use crate::error::EngineError;

/// One component drawn by a production order.
#[derive(Debug, Clone)]
pub struct ComponentInput {
    /// The raw-material product consumed.
    pub product_id: Uuid,
    /// The warehouse its lots live in.
    pub warehouse_id: Uuid,
    /// Pins the component to one lot; `None` draws FIFO.
    pub batch_id: Option<Uuid>,
    /// Units consumed.
    pub quantity: Decimal,
}

/// Input for creating a pending production order.
#[derive(Debug, Clone)]
pub struct CreateProductionInput {
    /// The finished product.
    pub product_id: Uuid,
    /// The warehouse the finished lot lands in.
    pub warehouse_id: Uuid,
    /// Finished units expected; must be positive.
    pub quantity: Decimal,
    /// The order date.
    pub order_date: NaiveDate,
    /// The bill of materials.
    pub components: Vec<ComponentInput>,
}

/// Input for completing a pending production order.
#[derive(Debug, Clone)]
pub struct CompleteProductionInput {
    /// The completion date, used as the journal and lot date.
    pub completion_date: NaiveDate,
    /// Consumed cost written off to operating expense instead of the
    /// finished lot.
    pub scrap_cost: Decimal,
}

/// A completed production order with its posting detail.
#[derive(Debug, Clone)]
pub struct CompletedProduction {
    /// The order, now completed.
    pub order: production_orders::Model,
    /// The costing journal.
    pub journal_id: Uuid,
    /// Total component cost consumed.
    pub consumed_cost: Decimal,
    /// The finished lot stocked.
    pub finished_lot_id: Uuid,
    /// The finished lot's unit cost.
    pub unit_cost: Decimal,
}

/// Drives the production-order state machine and its ledger effects.
#[derive(Debug, Clone)]
pub struct ProductionAdapter {
    db: DatabaseConnection,
    journal: JournalRepository,
    inventory: InventoryRepository,
    counters: CounterRepository,
}

impl ProductionAdapter {
    /// Creates a production adapter over a connection pool.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            journal: JournalRepository::new(db.clone()),
            inventory: InventoryRepository::new(db.clone()),
            counters: CounterRepository::new(db.clone()),
            db,
        }
    }

    /// Creates a pending production order with its bill of materials. No
    /// ledger effect.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::EmptyDocument`] when `components` is empty,
    /// a costing error for a non-positive finished quantity, or a
    /// database error.
    pub async fn create(
        &self,
        ctx: &ActorContext,
        input: CreateProductionInput,
    ) -> Result<production_orders::Model, EngineError> {
        if input.components.is_empty() {
            return Err(EngineError::EmptyDocument {
                document: "production_order",
            });
        }
        if input.quantity <= Decimal::ZERO {
            return Err(InventoryError::from(CostingError::NonPositiveQuantity {
                quantity: input.quantity,
            })
            .into());
        }

        let txn = self.db.begin().await?;
        let order_id = Uuid::new_v4();
        let now = chrono::Utc::now().into();
        let order = production_orders::ActiveModel {
            id: Set(order_id),
            business_id: Set(ctx.business_id),
            product_id: Set(input.product_id),
            warehouse_id: Set(input.warehouse_id),
            quantity: Set(input.quantity),
            scrap_cost: Set(Decimal::ZERO),
            status: Set(ProductionStatus::Pending.into()),
            order_date: Set(input.order_date),
            completed_at: Set(None),
            created_by: Set(ctx.user_id),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;

        let components: Vec<production_components::ActiveModel> = input
            .components
            .iter()
            .map(|component| production_components::ActiveModel {
                id: Set(Uuid::new_v4()),
                production_order_id: Set(order_id),
                product_id: Set(component.product_id),
                warehouse_id: Set(component.warehouse_id),
                batch_id: Set(component.batch_id),
                quantity: Set(component.quantity),
            })
            .collect();
        production_components::Entity::insert_many(components)
            .exec(&txn)
            .await?;

        txn.commit().await?;
        tracing::info!(
            business_id = %ctx.business_id,
            order_id = %order_id,
            quantity = %order.quantity,
            "production order created"
        );
        Ok(order)
    }

    /// Completes a pending order: consumes components, stocks the
    /// finished lot, and posts the costing journal.
    ///
    /// The journal moves the consumed value out of inventory and back in
    /// under the finished product, with any scrap cost debited to
    /// operating expense instead.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::ProductionOrderNotFound`] for an unknown ID,
    /// an [`InvalidTransition`](khata_core::documents::DocumentError)
    /// unless the order is pending, an inventory error when components are
    /// short, or [`EngineError::ScrapOutOfRange`].
    pub async fn complete(
        &self,
        ctx: &ActorContext,
        order_id: Uuid,
        input: CompleteProductionInput,
    ) -> Result<CompletedProduction, EngineError> {
        let txn = self.db.begin().await?;

        let order = self.find_locked(&txn, ctx.business_id, order_id).await?;
        let next = ProductionStatus::from(order.status).transition_to(ProductionStatus::Completed)?;

        let components = production_components::Entity::find()
            .filter(production_components::Column::ProductionOrderId.eq(order.id))
            .all(&txn)
            .await?;

        let mut consumed_cost = Decimal::ZERO;
        for component in &components {
            let plan = self
                .inventory
                .consume(
                    &txn,
                    ConsumeInput {
                        business_id: ctx.business_id,
                        product_id: component.product_id,
                        warehouse_id: component.warehouse_id,
                        quantity: component.quantity,
                        lot_refs: component.batch_id.map(|batch| vec![batch]),
                        reference_type: ReferenceType::ProductionOrder,
                        reference_id: order.id,
                    },
                )
                .await?;
            consumed_cost += plan.total_cost;
            self.counters
                .adjust_product_stock(&txn, component.product_id, -component.quantity)
                .await?;
        }

        if input.scrap_cost < Decimal::ZERO || input.scrap_cost > consumed_cost {
            return Err(EngineError::ScrapOutOfRange {
                scrap: input.scrap_cost,
                consumed: consumed_cost,
            });
        }
        let finished_cost = consumed_cost - input.scrap_cost;
        let unit_cost = (finished_cost / order.quantity).round_dp(4);

        let finished_lot_id = self
            .inventory
            .produce(
                &txn,
                ProduceLotInput {
                    business_id: ctx.business_id,
                    product_id: order.product_id,
                    warehouse_id: order.warehouse_id,
                    quantity: order.quantity,
                    unit_cost,
                    manufacturing_date: input.completion_date,
                    expiry_date: None,
                },
            )
            .await?;
        self.counters
            .adjust_product_stock(&txn, order.product_id, order.quantity)
            .await?;

        let journal_id = self
            .journal
            .post(
                &txn,
                PostJournalInput {
                    business_id: ctx.business_id,
                    date: input.completion_date,
                    description: format!("Production order completed ({} units)", order.quantity),
                    reference_type: ReferenceType::ProductionOrder,
                    reference_id: order.id,
                    lines: completion_lines(consumed_cost, input.scrap_cost),
                    created_by: ctx.user_id,
                },
            )
            .await?;

        let mut active: production_orders::ActiveModel = order.into();
        active.status = Set(next.into());
        active.scrap_cost = Set(input.scrap_cost);
        active.completed_at = Set(Some(chrono::Utc::now().into()));
        let order = active.update(&txn).await?;

        txn.commit().await?;
        tracing::info!(
            business_id = %ctx.business_id,
            order_id = %order.id,
            journal_id = %journal_id,
            consumed_cost = %consumed_cost,
            scrap_cost = %order.scrap_cost,
            unit_cost = %unit_cost,
            "production order completed"
        );
        Ok(CompletedProduction {
            order,
            journal_id,
            consumed_cost,
            finished_lot_id,
            unit_cost,
        })
    }

    async fn find_locked(
        &self,
        txn: &DatabaseTransaction,
        business_id: Uuid,
        order_id: Uuid,
    ) -> Result<production_orders::Model, EngineError> {
        production_orders::Entity::find_by_id(order_id)
            .filter(production_orders::Column::BusinessId.eq(business_id))
            .lock_exclusive()
            .one(txn)
            .await?
            .ok_or(EngineError::ProductionOrderNotFound(order_id))
    }
}

/// GL lines for completing a production order.
///
/// The consumed component value leaves inventory; what is not scrap comes
/// back in under the finished product. Scrap debits operating expense.
/// Inventory appears on both sides when both amounts are non-zero.
fn completion_lines(consumed: Decimal, scrap: Decimal) -> Vec<JournalLineInput> {
    let finished = consumed - scrap;
    let mut lines = Vec::with_capacity(3);
    if finished > Decimal::ZERO {
        lines.push(JournalLineInput::debit(AccountRole::InventoryAsset, finished));
    }
    if scrap > Decimal::ZERO {
        lines.push(JournalLineInput::debit(AccountRole::OperatingExpense, scrap));
    }
    lines.push(JournalLineInput::credit(AccountRole::InventoryAsset, consumed));
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use khata_core::ledger::validate_lines;
    use rust_decimal_macros::dec;

    #[test]
    fn test_completion_lines_without_scrap() {
        let lines = completion_lines(dec!(130), Decimal::ZERO);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].account_code, "1200");
        assert_eq!(lines[0].as_columns().0, dec!(130));
        assert_eq!(lines[1].account_code, "1200");
        assert_eq!(lines[1].as_columns().1, dec!(130));
        assert!(validate_lines(&lines).is_ok());
    }

    #[test]
    fn test_completion_lines_split_scrap_to_expense() {
        let lines = completion_lines(dec!(130), dec!(30));
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].account_code, "1200");
        assert_eq!(lines[0].as_columns().0, dec!(100));
        assert_eq!(lines[1].account_code, "6000");
        assert_eq!(lines[1].as_columns().0, dec!(30));
        assert_eq!(lines[2].account_code, "1200");
        assert_eq!(lines[2].as_columns().1, dec!(130));
        let totals = validate_lines(&lines).expect("completion lines must balance");
        assert_eq!(totals.debit, totals.credit);
    }

    #[test]
    fn test_completion_lines_all_scrap_still_balance() {
        let lines = completion_lines(dec!(80), dec!(80));
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].account_code, "6000");
        assert!(validate_lines(&lines).is_ok());
    }
}
