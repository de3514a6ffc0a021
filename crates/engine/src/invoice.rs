//! Sales invoice lifecycle: create, issue, settle, cancel.
//!
//! Only the `draft -> pending` edge touches the ledger: issuing consumes
//! stock, posts the revenue journal, and bumps the customer's outstanding
//! balance. Settlement posts a cash journal per payment. Cancellation
//! unwinds everything through the reversal and lot-restore primitives, so
//! a cancelled invoice leaves the ledger and the lots exactly as they
//! were.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    ModelTrait, QueryFilter, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use khata_core::chart::AccountRole;
use khata_core::documents::{InvoiceStatus, PartyType};
use khata_core::ledger::{JournalLineInput, PostJournalInput, ReferenceType};
use khata_db::entities::{invoice_items, invoices, payments};
use khata_db::repositories::{
    ConsumeInput, CounterRepository, InventoryRepository, JournalRepository, RestoredQuantity,
};
use khata_shared::ActorContext;

use crate::error::EngineError;
use crate::payment::{settlement_lines, SettleInput};

/// One line of a new invoice.
#[derive(Debug, Clone)]
pub struct InvoiceItemInput {
    /// The product sold.
    pub product_id: Uuid,
    /// The warehouse stock is drawn from.
    pub warehouse_id: Uuid,
    /// Pins the line to one lot; `None` draws FIFO.
    pub batch_id: Option<Uuid>,
    /// Units sold.
    pub quantity: Decimal,
    /// Price per unit before tax.
    pub unit_price: Decimal,
    /// Tax charged on the line.
    pub tax_amount: Decimal,
}

/// Input for creating a draft invoice.
#[derive(Debug, Clone)]
pub struct CreateInvoiceInput {
    /// The billed customer.
    pub customer_id: Uuid,
    /// The caller-assigned invoice number.
    pub invoice_number: String,
    /// The invoice date, used as the journal date on issue.
    pub invoice_date: NaiveDate,
    /// The invoice lines.
    pub items: Vec<InvoiceItemInput>,
}

/// An issued invoice with its posting detail.
#[derive(Debug, Clone)]
pub struct PostedInvoice {
    /// The invoice, now pending.
    pub invoice: invoices::Model,
    /// The revenue journal.
    pub journal_id: Uuid,
    /// FIFO cost of the stock the issue consumed.
    pub cost_of_goods: Decimal,
}

/// A settlement applied to an invoice.
#[derive(Debug, Clone)]
pub struct InvoiceSettlement {
    /// The invoice, moved to paid when fully settled.
    pub invoice: invoices::Model,
    /// The stored payment row.
    pub payment: payments::Model,
    /// The cash journal.
    pub journal_id: Uuid,
    /// What the invoice still owes after this payment.
    pub remaining: Decimal,
}

/// A cancelled invoice with its unwind detail.
#[derive(Debug, Clone)]
pub struct CancelledInvoice {
    /// The invoice, now cancelled.
    pub invoice: invoices::Model,
    /// Quantities put back on their original lots, per product.
    pub restored: Vec<RestoredQuantity>,
    /// Settlement payments reversed and removed.
    pub payments_removed: usize,
}

/// Drives the sales-invoice state machine and its ledger effects.
#[derive(Debug, Clone)]
pub struct InvoiceAdapter {
    db: DatabaseConnection,
    journal: JournalRepository,
    inventory: InventoryRepository,
    counters: CounterRepository,
}

impl InvoiceAdapter {
    /// Creates an invoice adapter over a connection pool.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            journal: JournalRepository::new(db.clone()),
            inventory: InventoryRepository::new(db.clone()),
            counters: CounterRepository::new(db.clone()),
            db,
        }
    }

    /// Creates a draft invoice with its lines. No ledger effect.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::EmptyDocument`] when `items` is empty, or a
    /// database error.
    pub async fn create(
        &self,
        ctx: &ActorContext,
        input: CreateInvoiceInput,
    ) -> Result<invoices::Model, EngineError> {
        if input.items.is_empty() {
            return Err(EngineError::EmptyDocument {
                document: "invoice",
            });
        }
        let (subtotal, tax_amount) = invoice_totals(&input.items);

        let txn = self.db.begin().await?;
        let invoice_id = Uuid::new_v4();
        let now = chrono::Utc::now().into();
        let invoice = invoices::ActiveModel {
            id: Set(invoice_id),
            business_id: Set(ctx.business_id),
            customer_id: Set(input.customer_id),
            invoice_number: Set(input.invoice_number.clone()),
            status: Set(InvoiceStatus::Draft.into()),
            invoice_date: Set(input.invoice_date),
            subtotal: Set(subtotal),
            tax_amount: Set(tax_amount),
            total: Set(subtotal + tax_amount),
            created_by: Set(ctx.user_id),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;

        let items: Vec<invoice_items::ActiveModel> = input
            .items
            .iter()
            .map(|item| invoice_items::ActiveModel {
                id: Set(Uuid::new_v4()),
                invoice_id: Set(invoice_id),
                product_id: Set(item.product_id),
                warehouse_id: Set(item.warehouse_id),
                batch_id: Set(item.batch_id),
                quantity: Set(item.quantity),
                unit_price: Set(item.unit_price),
                tax_amount: Set(item.tax_amount),
                line_total: Set(item.quantity * item.unit_price + item.tax_amount),
            })
            .collect();
        invoice_items::Entity::insert_many(items).exec(&txn).await?;

        txn.commit().await?;
        tracing::info!(
            business_id = %ctx.business_id,
            invoice_id = %invoice_id,
            total = %invoice.total,
            "invoice drafted"
        );
        Ok(invoice)
    }

    /// Issues a draft invoice: consumes stock, posts the revenue journal,
    /// and bumps the customer's outstanding balance.
    ///
    /// The invoice row is read under a row lock so two concurrent issues
    /// cannot both observe `draft` and both post.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvoiceNotFound`] for an unknown ID, an
    /// [`InvalidTransition`](khata_core::documents::DocumentError) when the
    /// invoice is not a draft, an inventory error when stock is short, or a
    /// journal error.
    pub async fn issue(
        &self,
        ctx: &ActorContext,
        invoice_id: Uuid,
    ) -> Result<PostedInvoice, EngineError> {
        let txn = self.db.begin().await?;

        let invoice = self.find_locked(&txn, ctx.business_id, invoice_id).await?;
        let next = InvoiceStatus::from(invoice.status).transition_to(InvoiceStatus::Pending)?;

        let items = invoice_items::Entity::find()
            .filter(invoice_items::Column::InvoiceId.eq(invoice.id))
            .all(&txn)
            .await?;

        let mut cost_of_goods = Decimal::ZERO;
        for item in &items {
            let plan = self
                .inventory
                .consume(
                    &txn,
                    ConsumeInput {
                        business_id: ctx.business_id,
                        product_id: item.product_id,
                        warehouse_id: item.warehouse_id,
                        quantity: item.quantity,
                        lot_refs: item.batch_id.map(|batch| vec![batch]),
                        reference_type: ReferenceType::Invoice,
                        reference_id: invoice.id,
                    },
                )
                .await?;
            cost_of_goods += plan.total_cost;
            self.counters
                .adjust_product_stock(&txn, item.product_id, -item.quantity)
                .await?;
        }

        let journal_id = self
            .journal
            .post(
                &txn,
                PostJournalInput {
                    business_id: ctx.business_id,
                    date: invoice.invoice_date,
                    description: format!("Invoice {} issued", invoice.invoice_number),
                    reference_type: ReferenceType::Invoice,
                    reference_id: invoice.id,
                    lines: issue_lines(invoice.subtotal, invoice.tax_amount, cost_of_goods),
                    created_by: ctx.user_id,
                },
            )
            .await?;
        self.counters
            .adjust_customer_outstanding(&txn, invoice.customer_id, invoice.total)
            .await?;

        let mut active: invoices::ActiveModel = invoice.into();
        active.status = Set(next.into());
        let invoice = active.update(&txn).await?;

        txn.commit().await?;
        tracing::info!(
            business_id = %ctx.business_id,
            invoice_id = %invoice.id,
            journal_id = %journal_id,
            total = %invoice.total,
            cost_of_goods = %cost_of_goods,
            "invoice issued"
        );
        Ok(PostedInvoice {
            invoice,
            journal_id,
            cost_of_goods,
        })
    }

    /// Applies a payment to a pending invoice.
    ///
    /// Posts the cash journal tagged with the payment's own ID and drops
    /// the customer's outstanding balance. Moves the invoice to `paid`
    /// once payments cover the total; partial settlement leaves it
    /// pending.
    ///
    /// # Errors
    ///
    /// Returns an `InvalidTransition` unless the invoice is pending, and
    /// [`EngineError::Overpayment`] when the amount exceeds what the
    /// invoice still owes.
    pub async fn record_payment(
        &self,
        ctx: &ActorContext,
        invoice_id: Uuid,
        input: SettleInput,
    ) -> Result<InvoiceSettlement, EngineError> {
        let txn = self.db.begin().await?;

        let invoice = self.find_locked(&txn, ctx.business_id, invoice_id).await?;
        let paid = InvoiceStatus::from(invoice.status).transition_to(InvoiceStatus::Paid)?;

        let prior: Decimal = payments::Entity::find()
            .filter(payments::Column::InvoiceId.eq(invoice.id))
            .all(&txn)
            .await?
            .iter()
            .map(|payment| payment.amount)
            .sum();
        let remaining = invoice.total - prior;
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
            party_type: Set(PartyType::Customer.into()),
            customer_id: Set(Some(invoice.customer_id)),
            vendor_id: Set(None),
            invoice_id: Set(Some(invoice.id)),
            purchase_id: Set(None),
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
                    description: format!("Payment for invoice {}", invoice.invoice_number),
                    reference_type: ReferenceType::Payment,
                    reference_id: payment_id,
                    lines: settlement_lines(PartyType::Customer, input.method, input.amount),
                    created_by: ctx.user_id,
                },
            )
            .await?;
        self.counters
            .adjust_customer_outstanding(&txn, invoice.customer_id, -input.amount)
            .await?;

        let remaining = remaining - input.amount;
        let invoice = if remaining.is_zero() {
            let mut active: invoices::ActiveModel = invoice.into();
            active.status = Set(paid.into());
            active.update(&txn).await?
        } else {
            invoice
        };

        txn.commit().await?;
        tracing::info!(
            business_id = %ctx.business_id,
            invoice_id = %invoice.id,
            payment_id = %payment_id,
            journal_id = %journal_id,
            amount = %input.amount,
            remaining = %remaining,
            "invoice payment recorded"
        );
        Ok(InvoiceSettlement {
            invoice,
            payment,
            journal_id,
            remaining,
        })
    }

    /// Cancels an invoice, unwinding every ledger effect it had.
    ///
    /// Settlement payments are reversed and removed first, then the
    /// revenue journal; consumed quantities go back to their original
    /// lots and the customer and stock counters move in lockstep.
    /// Cancelling a draft only flips the status.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvoiceNotFound`] for an unknown ID or an
    /// `InvalidTransition` when the invoice is already cancelled.
    pub async fn cancel(
        &self,
        ctx: &ActorContext,
        invoice_id: Uuid,
    ) -> Result<CancelledInvoice, EngineError> {
        let txn = self.db.begin().await?;

        let invoice = self.find_locked(&txn, ctx.business_id, invoice_id).await?;
        let status = InvoiceStatus::from(invoice.status);
        let cancelled = status.transition_to(InvoiceStatus::Cancelled)?;

        let mut restored = Vec::new();
        let mut payments_removed = 0;
        if status.is_posted() {
            let settlements = payments::Entity::find()
                .filter(payments::Column::InvoiceId.eq(invoice.id))
                .all(&txn)
                .await?;
            for payment in settlements {
                self.journal
                    .reverse(&txn, ctx.business_id, ReferenceType::Payment, payment.id)
                    .await?;
                self.counters
                    .adjust_customer_outstanding(&txn, invoice.customer_id, payment.amount)
                    .await?;
                payment.delete(&txn).await?;
                payments_removed += 1;
            }

            self.journal
                .reverse(&txn, ctx.business_id, ReferenceType::Invoice, invoice.id)
                .await?;
            self.counters
                .adjust_customer_outstanding(&txn, invoice.customer_id, -invoice.total)
                .await?;

            restored = self
                .inventory
                .restore(&txn, ctx.business_id, ReferenceType::Invoice, invoice.id)
                .await?;
            for entry in &restored {
                self.counters
                    .adjust_product_stock(&txn, entry.product_id, entry.quantity)
                    .await?;
            }
        }

        let mut active: invoices::ActiveModel = invoice.into();
        active.status = Set(cancelled.into());
        let invoice = active.update(&txn).await?;

        txn.commit().await?;
        tracing::info!(
            business_id = %ctx.business_id,
            invoice_id = %invoice.id,
            payments_removed,
            "invoice cancelled"
        );
        Ok(CancelledInvoice {
            invoice,
            restored,
            payments_removed,
        })
    }

    async fn find_locked(
        &self,
        txn: &DatabaseTransaction,
        business_id: Uuid,
        invoice_id: Uuid,
    ) -> Result<invoices::Model, EngineError> {
        invoices::Entity::find_by_id(invoice_id)
            .filter(invoices::Column::BusinessId.eq(business_id))
            .lock_exclusive()
            .one(txn)
            .await?
            .ok_or(EngineError::InvoiceNotFound(invoice_id))
    }
}

/// Net and tax totals across invoice lines.
fn invoice_totals(items: &[InvoiceItemInput]) -> (Decimal, Decimal) {
    items
        .iter()
        .fold((Decimal::ZERO, Decimal::ZERO), |(net, tax), item| {
            (net + item.quantity * item.unit_price, tax + item.tax_amount)
        })
}

/// GL lines for issuing an invoice.
///
/// Receivable carries the gross total; revenue and tax split it. The cost
/// pair moves the consumed stock value into cost of goods sold. Zero tax
/// and zero cost drop their lines rather than posting zero amounts.
fn issue_lines(subtotal: Decimal, tax: Decimal, cost: Decimal) -> Vec<JournalLineInput> {
    let mut lines = vec![
        JournalLineInput::debit(AccountRole::AccountsReceivable, subtotal + tax),
        JournalLineInput::credit(AccountRole::SalesRevenue, subtotal),
    ];
    if tax > Decimal::ZERO {
        lines.push(JournalLineInput::credit(AccountRole::SalesTaxPayable, tax));
    }
    if cost > Decimal::ZERO {
        lines.push(JournalLineInput::debit(AccountRole::CostOfGoodsSold, cost));
        lines.push(JournalLineInput::credit(AccountRole::InventoryAsset, cost));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use khata_core::ledger::validate_lines;
    use rust_decimal_macros::dec;

    fn item(quantity: Decimal, unit_price: Decimal, tax: Decimal) -> InvoiceItemInput {
        InvoiceItemInput {
            product_id: Uuid::new_v4(),
            warehouse_id: Uuid::new_v4(),
            batch_id: None,
            quantity,
            unit_price,
            tax_amount: tax,
        }
    }

    #[test]
    fn test_issue_lines_split_revenue_tax_and_cost() {
        let lines = issue_lines(dec!(1000), dec!(180), dec!(650));
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0].account_code, "1100");
        assert_eq!(lines[0].as_columns().0, dec!(1180));
        assert_eq!(lines[1].account_code, "4000");
        assert_eq!(lines[2].account_code, "2100");
        assert_eq!(lines[3].account_code, "5000");
        assert_eq!(lines[4].account_code, "1200");

        let totals = validate_lines(&lines).expect("issue lines must balance");
        assert_eq!(totals.debit, dec!(1830));
        assert_eq!(totals.credit, dec!(1830));
    }

    #[test]
    fn test_issue_lines_drop_zero_tax_and_cost() {
        let lines = issue_lines(dec!(500), Decimal::ZERO, Decimal::ZERO);
        assert_eq!(lines.len(), 2);
        assert!(validate_lines(&lines).is_ok());
    }

    #[test]
    fn test_invoice_totals_sum_lines() {
        let items = vec![
            item(dec!(2), dec!(250), dec!(90)),
            item(dec!(1), dec!(500), dec!(90)),
        ];
        let (subtotal, tax) = invoice_totals(&items);
        assert_eq!(subtotal, dec!(1000));
        assert_eq!(tax, dec!(180));
    }
}
