//! Standalone payment recording and deletion.
//!
//! A standalone payment settles a party's open balance without naming a
//! specific document: a customer receipt moves cash in and clears
//! receivables, a vendor disbursement clears payables and moves cash out.
//! Settlements made through `InvoiceAdapter::record_payment` and
//! `PurchaseAdapter::pay` share the same GL shape but belong to their
//! document and are undone through it, never here.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter,
    QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use khata_core::documents::{PartyType, PaymentMethod};
use khata_core::ledger::{JournalLineInput, PostJournalInput, ReferenceType};
use khata_db::entities::payments;
use khata_db::repositories::{CounterRepository, JournalRepository, ReversedAccountTotal};
use khata_shared::ActorContext;

use crate::error::EngineError;

/// Which party a standalone payment settles with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentParty {
    /// Money received from a customer against their receivable.
    Customer(Uuid),
    /// Money paid to a vendor against their payable.
    Vendor(Uuid),
}

impl PaymentParty {
    /// The party type this payment records against.
    #[must_use]
    pub const fn party_type(&self) -> PartyType {
        match self {
            Self::Customer(_) => PartyType::Customer,
            Self::Vendor(_) => PartyType::Vendor,
        }
    }

    /// The party's row ID.
    #[must_use]
    pub const fn party_id(&self) -> Uuid {
        match self {
            Self::Customer(id) | Self::Vendor(id) => *id,
        }
    }
}

/// Input for settling a specific invoice or purchase.
///
/// Used by `InvoiceAdapter::record_payment` and `PurchaseAdapter::pay`;
/// the document supplies the party.
#[derive(Debug, Clone)]
pub struct SettleInput {
    /// The settled amount; may be less than what the document owes.
    pub amount: Decimal,
    /// How the money moved.
    pub method: PaymentMethod,
    /// The settlement date, recorded on the journal.
    pub payment_date: NaiveDate,
    /// Free-form note.
    pub notes: Option<String>,
}

/// Input for recording a standalone payment.
#[derive(Debug, Clone)]
pub struct RecordPaymentInput {
    /// Who the money moved to or from.
    pub party: PaymentParty,
    /// The settled amount.
    pub amount: Decimal,
    /// How the money moved.
    pub method: PaymentMethod,
    /// The settlement date, recorded on the journal.
    pub payment_date: NaiveDate,
    /// Free-form note.
    pub notes: Option<String>,
}

/// A recorded payment and the journal that posted it.
#[derive(Debug, Clone)]
pub struct RecordedPayment {
    /// The stored payment row.
    pub payment: payments::Model,
    /// The journal documenting the settlement.
    pub journal_id: Uuid,
}

/// The reversal detail of a deleted payment.
#[derive(Debug, Clone)]
pub struct DeletedPayment {
    /// The removed payment's ID.
    pub payment_id: Uuid,
    /// The amount the deletion put back on the party's balance.
    pub amount: Decimal,
    /// Per-account totals the reversal removed from the ledger.
    pub removed: Vec<ReversedAccountTotal>,
}

/// Records and deletes standalone party payments.
#[derive(Debug, Clone)]
pub struct PaymentAdapter {
    db: DatabaseConnection,
    journal: JournalRepository,
    counters: CounterRepository,
}

impl PaymentAdapter {
    /// Creates a payment adapter over a connection pool.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            journal: JournalRepository::new(db.clone()),
            counters: CounterRepository::new(db.clone()),
            db,
        }
    }

    /// Records a standalone receipt or disbursement.
    ///
    /// Inserts the payment row, posts the settlement journal tagged with
    /// the payment's own ID, and drops the party's outstanding balance by
    /// the amount, all in one transaction.
    ///
    /// # Errors
    ///
    /// Returns a journal error for a non-positive amount, or a database
    /// error.
    pub async fn record(
        &self,
        ctx: &ActorContext,
        input: RecordPaymentInput,
    ) -> Result<RecordedPayment, EngineError> {
        let txn = self.db.begin().await?;

        let payment_id = Uuid::new_v4();
        let (customer_id, vendor_id) = match input.party {
            PaymentParty::Customer(id) => (Some(id), None),
            PaymentParty::Vendor(id) => (None, Some(id)),
        };
        let payment = payments::ActiveModel {
            id: Set(payment_id),
            business_id: Set(ctx.business_id),
            party_type: Set(input.party.party_type().into()),
            customer_id: Set(customer_id),
            vendor_id: Set(vendor_id),
            invoice_id: Set(None),
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

        let description = match input.party.party_type() {
            PartyType::Customer => format!("Customer payment received ({})", input.method),
            PartyType::Vendor => format!("Vendor payment made ({})", input.method),
        };
        let journal_id = self
            .journal
            .post(
                &txn,
                PostJournalInput {
                    business_id: ctx.business_id,
                    date: input.payment_date,
                    description,
                    reference_type: ReferenceType::Payment,
                    reference_id: payment_id,
                    lines: settlement_lines(input.party.party_type(), input.method, input.amount),
                    created_by: ctx.user_id,
                },
            )
            .await?;

        match input.party {
            PaymentParty::Customer(id) => {
                self.counters
                    .adjust_customer_outstanding(&txn, id, -input.amount)
                    .await?;
            }
            PaymentParty::Vendor(id) => {
                self.counters
                    .adjust_vendor_outstanding(&txn, id, -input.amount)
                    .await?;
            }
        }

        txn.commit().await?;
        tracing::info!(
            business_id = %ctx.business_id,
            payment_id = %payment_id,
            journal_id = %journal_id,
            party = %input.party.party_type(),
            amount = %input.amount,
            "payment recorded"
        );
        Ok(RecordedPayment {
            payment,
            journal_id,
        })
    }

    /// Deletes a standalone payment, reversing its journal and restoring
    /// the party's outstanding balance.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::PaymentNotFound`] for an unknown ID and
    /// [`EngineError::PaymentLinkedToDocument`] if the payment settles an
    /// invoice or purchase.
    pub async fn delete(
        &self,
        ctx: &ActorContext,
        payment_id: Uuid,
    ) -> Result<DeletedPayment, EngineError> {
        let txn = self.db.begin().await?;

        let payment = payments::Entity::find_by_id(payment_id)
            .filter(payments::Column::BusinessId.eq(ctx.business_id))
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(EngineError::PaymentNotFound(payment_id))?;
        if payment.invoice_id.is_some() || payment.purchase_id.is_some() {
            return Err(EngineError::PaymentLinkedToDocument(payment_id));
        }

        let removed = self
            .journal
            .reverse(&txn, ctx.business_id, ReferenceType::Payment, payment.id)
            .await?;

        match PartyType::from(payment.party_type) {
            PartyType::Customer => {
                if let Some(customer_id) = payment.customer_id {
                    self.counters
                        .adjust_customer_outstanding(&txn, customer_id, payment.amount)
                        .await?;
                }
            }
            PartyType::Vendor => {
                if let Some(vendor_id) = payment.vendor_id {
                    self.counters
                        .adjust_vendor_outstanding(&txn, vendor_id, payment.amount)
                        .await?;
                }
            }
        }

        let amount = payment.amount;
        payment.delete(&txn).await?;

        txn.commit().await?;
        tracing::info!(
            business_id = %ctx.business_id,
            payment_id = %payment_id,
            amount = %amount,
            "payment deleted and reversed"
        );
        Ok(DeletedPayment {
            payment_id,
            amount,
            removed,
        })
    }
}

/// GL lines settling `amount` with a party through `method`.
///
/// The method picks the cash-side account, the party type the control
/// account; money received debits cash, money paid credits it.
pub(crate) fn settlement_lines(
    party: PartyType,
    method: PaymentMethod,
    amount: Decimal,
) -> Vec<JournalLineInput> {
    match party {
        PartyType::Customer => vec![
            JournalLineInput::debit(method.account_role(), amount),
            JournalLineInput::credit(party.control_account(), amount),
        ],
        PartyType::Vendor => vec![
            JournalLineInput::debit(party.control_account(), amount),
            JournalLineInput::credit(method.account_role(), amount),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use khata_core::ledger::validate_lines;
    use rust_decimal_macros::dec;

    #[test]
    fn test_customer_receipt_debits_cash_credits_receivable() {
        let lines = settlement_lines(PartyType::Customer, PaymentMethod::Cash, dec!(750));
        assert_eq!(lines[0].account_code, "1000");
        assert_eq!(lines[0].as_columns().0, dec!(750));
        assert_eq!(lines[1].account_code, "1100");
        assert_eq!(lines[1].as_columns().1, dec!(750));
        assert!(validate_lines(&lines).is_ok());
    }

    #[test]
    fn test_vendor_disbursement_debits_payable_credits_bank() {
        let lines = settlement_lines(PartyType::Vendor, PaymentMethod::Bank, dec!(1200));
        assert_eq!(lines[0].account_code, "2000");
        assert_eq!(lines[0].as_columns().0, dec!(1200));
        assert_eq!(lines[1].account_code, "1010");
        assert_eq!(lines[1].as_columns().1, dec!(1200));
        assert!(validate_lines(&lines).is_ok());
    }

    #[test]
    fn test_party_accessors() {
        let id = Uuid::new_v4();
        let party = PaymentParty::Vendor(id);
        assert_eq!(party.party_type(), PartyType::Vendor);
        assert_eq!(party.party_id(), id);
    }
}
