//! Purchase order lifecycle: create, receive, pay.
//!
//! Stock and GL move exactly once, on the `draft -> received` edge: one
//! lot per line is stocked at the purchase unit cost and the payable
//! journal posts, guarded by a row lock on the purchase so a concurrent
//! double-click cannot post twice. Payment settles the payable.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    QueryFilter, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use khata_core::chart::AccountRole;
use khata_core::documents::{PartyType, PurchaseStatus};
use khata_core::ledger::{JournalLineInput, PostJournalInput, ReferenceType};
use khata_db::entities::{payments, purchase_items, purchases};
use khata_db::repositories::{
    CounterRepository, InventoryRepository, JournalRepository, ProduceLotInput,
};
use khata_shared::ActorContext;

use crate::error::EngineError;
use crate::payment::{settlement_lines, SettleInput};

/// One line of a new purchase.
#[derive(Debug, Clone)]
pub struct PurchaseItemInput {
    /// The product bought.
    pub product_id: Uuid,
    /// The warehouse the stock lands in.
    pub warehouse_id: Uuid,
    /// Units bought.
    pub quantity: Decimal,
    /// Cost per unit before tax; becomes the lot's unit cost.
    pub unit_cost: Decimal,
    /// Tax charged on the line.
    pub tax_amount: Decimal,
    /// The lot's manufacturing date; the purchase date when `None`.
    pub manufacturing_date: Option<NaiveDate>,
    /// The lot's expiry date, if any.
    pub expiry_date: Option<NaiveDate>,
}

/// Input for creating a draft purchase.
#[derive(Debug, Clone)]
pub struct CreatePurchaseInput {
    /// The supplying vendor.
    pub vendor_id: Uuid,
    /// The caller-assigned purchase number.
    pub purchase_number: String,
    /// The purchase date, used as the journal date on receipt.
    pub purchase_date: NaiveDate,
    /// The purchase lines.
    pub items: Vec<PurchaseItemInput>,
}

/// A received purchase with its posting detail.
#[derive(Debug, Clone)]
pub struct ReceivedPurchase {
    /// The purchase, now received.
    pub purchase: purchases::Model,
    /// The payable journal.
    pub journal_id: Uuid,
    /// The lots stocked, one per line in line order.
    pub lot_ids: Vec<Uuid>,
}

/// A settlement applied to a purchase.
#[derive(Debug, Clone)]
pub struct PurchaseSettlement {
    /// The purchase, moved to paid when fully settled.
    pub purchase: purchases::Model,
    /// The stored payment row.
    pub payment: payments::Model,
    /// The cash journal.
    pub journal_id: Uuid,
    /// What the purchase still owes after this payment.
    pub remaining: Decimal,
}

/// Drives the purchase state machine and its ledger effects.
#[derive(Debug, Clone)]
pub struct PurchaseAdapter {
    db: DatabaseConnection,
    journal: JournalRepository,
    inventory: InventoryRepository,
    counters: CounterRepository,
}

impl PurchaseAdapter {
    /// Creates a purchase adapter over a connection pool.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            journal: JournalRepository::new(db.clone()),
            inventory: InventoryRepository::new(db.clone()),
            counters: CounterRepository::new(db.clone()),
            db,
        }
    }

    /// Creates a draft purchase with its lines. No ledger effect.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::EmptyDocument`] when `items` is empty, or a
    /// database error.
    pub async fn create(
        &self,
        ctx: &ActorContext,
        input: CreatePurchaseInput,
    ) -> Result<purchases::Model, EngineError> {
        if input.items.is_empty() {
            return Err(EngineError::EmptyDocument {
                document: "purchase",
            });
        }
        let (subtotal, tax_amount) = purchase_totals(&input.items);

        let txn = self.db.begin().await?;
        let purchase_id = Uuid::new_v4();
        let now = chrono::Utc::now().into();
        let purchase = purchases::ActiveModel {
            id: Set(purchase_id),
            business_id: Set(ctx.business_id),
            vendor_id: Set(input.vendor_id),
            purchase_number: Set(input.purchase_number.clone()),
            status: Set(PurchaseStatus::Draft.into()),
            purchase_date: Set(input.purchase_date),
            subtotal: Set(subtotal),
            tax_amount: Set(tax_amount),
            total: Set(subtotal + tax_amount),
            created_by: Set(ctx.user_id),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;

        let items: Vec<purchase_items::ActiveModel> = input
            .items
            .iter()
            .map(|item| purchase_items::ActiveModel {
                id: Set(Uuid::new_v4()),
                purchase_id: Set(purchase_id),
                product_id: Set(item.product_id),
                warehouse_id: Set(item.warehouse_id),
                quantity: Set(item.quantity),
                unit_cost: Set(item.unit_cost),
                tax_amount: Set(item.tax_amount),
                line_total: Set(item.quantity * item.unit_cost + item.tax_amount),
                manufacturing_date: Set(item.manufacturing_date),
                expiry_date: Set(item.expiry_date),
            })
            .collect();
        purchase_items::Entity::insert_many(items)
            .exec(&txn)
            .await?;

        txn.commit().await?;
        tracing::info!(
            business_id = %ctx.business_id,
            purchase_id = %purchase_id,
            total = %purchase.total,
            "purchase drafted"
        );
        Ok(purchase)
    }

    /// Receives a draft purchase: stocks one lot per line and posts the
    /// payable journal.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::PurchaseNotFound`] for an unknown ID, an
    /// [`InvalidTransition`](khata_core::documents::DocumentError) when the
    /// purchase is not a draft, or a journal error.
    pub async fn receive(
        &self,
        ctx: &ActorContext,
        purchase_id: Uuid,
    ) -> Result<ReceivedPurchase, EngineError> {
        let txn = self.db.begin().await?;

        let purchase = self.find_locked(&txn, ctx.business_id, purchase_id).await?;
        let next = PurchaseStatus::from(purchase.status).transition_to(PurchaseStatus::Received)?;

        let items = purchase_items::Entity::find()
            .filter(purchase_items::Column::PurchaseId.eq(purchase.id))
            .all(&txn)
            .await?;

        let mut lot_ids = Vec::with_capacity(items.len());
        for item in &items {
            let lot_id = self
                .inventory
                .produce(
                    &txn,
                    ProduceLotInput {
                        business_id: ctx.business_id,
                        product_id: item.product_id,
                        warehouse_id: item.warehouse_id,
                        quantity: item.quantity,
                        unit_cost: item.unit_cost,
                        manufacturing_date: item
                            .manufacturing_date
                            .unwrap_or(purchase.purchase_date),
                        expiry_date: item.expiry_date,
                    },
                )
                .await?;
            lot_ids.push(lot_id);
            self.counters
                .adjust_product_stock(&txn, item.product_id, item.quantity)
                .await?;
        }

        let journal_id = self
            .journal
            .post(
                &txn,
                PostJournalInput {
                    business_id: ctx.business_id,
                    date: purchase.purchase_date,
                    description: format!("Purchase {} received", purchase.purchase_number),
                    reference_type: ReferenceType::Purchase,
                    reference_id: purchase.id,
                    lines: receive_lines(purchase.subtotal, purchase.tax_amount),
                    created_by: ctx.user_id,
                },
            )
            .await?;
        self.counters
            .adjust_vendor_outstanding(&txn, purchase.vendor_id, purchase.total)
            .await?;

        let mut active: purchases::ActiveModel = purchase.into();
        active.status = Set(next.into());
        let purchase = active.update(&txn).await?;

        txn.commit().await?;
        tracing::info!(
            business_id = %ctx.business_id,
            purchase_id = %purchase.id,
            journal_id = %journal_id,
            total = %purchase.total,
            lots = lot_ids.len(),
            "purchase received"
        );
        Ok(ReceivedPurchase {
            purchase,
            journal_id,
            lot_ids,
        })
    }

    /// Applies a payment to a received purchase.
    ///
    /// Posts the cash journal tagged with the payment's own ID and drops
    /// the vendor's outstanding balance. Moves the purchase to `paid`
    /// once payments cover the total.
    ///
    /// # Errors
    ///
    /// Returns an `InvalidTransition` unless the purchase is received, and
    /// [`EngineError::Overpayment`] when the amount exceeds what the
    /// purchase still owes.
    pub async fn pay(
        &self,
        ctx: &ActorContext,
        purchase_id: Uuid,
        input: SettleInput,
    ) -> Result<PurchaseSettlement, EngineError> {
        let txn = self.db.begin().await?;

        let purchase = self.find_locked(&txn, ctx.business_id, purchase_id).await?;
        let paid = PurchaseStatus::from(purchase.status).transition_to(PurchaseStatus::Paid)?;

        let prior: Decimal = payments::Entity::find()
            .filter(payments::Column::PurchaseId.eq(purchase.id))
            .all(&txn)
            .await?
            .iter()
            .map(|payment| payment.amount)
            .sum();
        let remaining = purchase.total - prior;
        if input.amount > remaining {
            return Err(EngineError::Overpayment {
                amount: input.amount,
                remaining,
            });
        }

        let payment_id = Uuid::new_v4();
        let payment = payments::ActiveModel {
            id: Set(payment_id),
            business_id: Set(ctx.business_id),
            party_type: Set(PartyType::Vendor.into()),
            customer_id: Set(None),
            vendor_id: Set(Some(purchase.vendor_id)),
            invoice_id: Set(None),
            purchase_id: Set(Some(purchase.id)),
            amount: Set(input.amount),
            method: Set(input.method.into()),
            payment_date: Set(input.payment_date),
            notes: Set(input.notes.clone()),
            created_by: Set(ctx.user_id),
            created_at: Set(chrono::Utc::now().into()),
        }
        .insert(&txn)
        .await?;

        let journal_id = self
            .journal
            .post(
                &txn,
                PostJournalInput {
                    business_id: ctx.business_id,
                    date: input.payment_date,
                    description: format!("Payment for purchase {}", purchase.purchase_number),
                    reference_type: ReferenceType::Payment,
                    reference_id: payment_id,
                    lines: settlement_lines(PartyType::Vendor, input.method, input.amount),
                    created_by: ctx.user_id,
                },
            )
            .await?;
        self.counters
            .adjust_vendor_outstanding(&txn, purchase.vendor_id, -input.amount)
            .await?;

        let remaining = remaining - input.amount;
        let purchase = if remaining.is_zero() {
            let mut active: purchases::ActiveModel = purchase.into();
            active.status = Set(paid.into());
            active.update(&txn).await?
        } else {
            purchase
        };

        txn.commit().await?;
        tracing::info!(
            business_id = %ctx.business_id,
            purchase_id = %purchase.id,
            payment_id = %payment_id,
            journal_id = %journal_id,
            amount = %input.amount,
            remaining = %remaining,
            "purchase payment recorded"
        );
        Ok(PurchaseSettlement {
            purchase,
            payment,
            journal_id,
            remaining,
        })
    }

    async fn find_locked(
        &self,
        txn: &DatabaseTransaction,
        business_id: Uuid,
        purchase_id: Uuid,
    ) -> Result<purchases::Model, EngineError> {
        purchases::Entity::find_by_id(purchase_id)
            .filter(purchases::Column::BusinessId.eq(business_id))
            .lock_exclusive()
            .one(txn)
            .await?
            .ok_or(EngineError::PurchaseNotFound(purchase_id))
    }
}

/// Net and tax totals across purchase lines.
fn purchase_totals(items: &[PurchaseItemInput]) -> (Decimal, Decimal) {
    items
        .iter()
        .fold((Decimal::ZERO, Decimal::ZERO), |(net, tax), item| {
            (net + item.quantity * item.unit_cost, tax + item.tax_amount)
        })
}

/// GL lines for receiving a purchase.
///
/// Inventory carries the net cost, input tax credit the recoverable tax,
/// and the payable the gross total. Zero tax drops its line.
fn receive_lines(subtotal: Decimal, tax: Decimal) -> Vec<JournalLineInput> {
    let mut lines = vec![JournalLineInput::debit(AccountRole::InventoryAsset, subtotal)];
    if tax > Decimal::ZERO {
        lines.push(JournalLineInput::debit(AccountRole::InputTaxCredit, tax));
    }
    lines.push(JournalLineInput::credit(
        AccountRole::AccountsPayable,
        subtotal + tax,
    ));
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use khata_core::ledger::validate_lines;
    use rust_decimal_macros::dec;

    #[test]
    fn test_receive_lines_split_net_and_tax() {
        let lines = receive_lines(dec!(5000), dec!(900));
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].account_code, "1200");
        assert_eq!(lines[0].as_columns().0, dec!(5000));
        assert_eq!(lines[1].account_code, "1300");
        assert_eq!(lines[1].as_columns().0, dec!(900));
        assert_eq!(lines[2].account_code, "2000");
        assert_eq!(lines[2].as_columns().1, dec!(5900));
        assert!(validate_lines(&lines).is_ok());
    }

    #[test]
    fn test_receive_lines_drop_zero_tax() {
        let lines = receive_lines(dec!(5000), Decimal::ZERO);
        assert_eq!(lines.len(), 2);
        assert!(validate_lines(&lines).is_ok());
    }

    #[test]
    fn test_purchase_totals_sum_lines() {
        let items = vec![
            PurchaseItemInput {
                product_id: Uuid::new_v4(),
                warehouse_id: Uuid::new_v4(),
                quantity: dec!(10),
                unit_cost: dec!(8),
                tax_amount: dec!(14.40),
                manufacturing_date: None,
                expiry_date: None,
            },
            PurchaseItemInput {
                product_id: Uuid::new_v4(),
                warehouse_id: Uuid::new_v4(),
                quantity: dec!(5),
                unit_cost: dec!(10),
                tax_amount: dec!(9),
                manufacturing_date: None,
                expiry_date: None,
            },
        ];
        let (subtotal, tax) = purchase_totals(&items);
        assert_eq!(subtotal, dec!(130));
        assert_eq!(tax, dec!(23.40));
    }
}
