//! The engine-level error type.
//!
//! Adapters surface every failure through [`EngineError`]: domain errors
//! from the core crate, repository errors from the db crate, and the small
//! set of document-level rules the adapters themselves enforce. Adapters
//! never recover; any error rolls back the enclosing transaction.

use rust_decimal::Decimal;
use sea_orm::DbErr;
use thiserror::Error;
use uuid::Uuid;

use khata_core::documents::DocumentError;
use khata_db::repositories::{ChartError, CounterError, InventoryError, JournalError};

/// Errors surfaced by the business-event adapters.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Chart lookup or initialization failure.
    #[error(transparent)]
    Chart(#[from] ChartError),

    /// Journal validation or posting failure.
    #[error(transparent)]
    Journal(#[from] JournalError),

    /// Lot planning or mutation failure.
    #[error(transparent)]
    Inventory(#[from] InventoryError),

    /// Denormalized counter update failure.
    #[error(transparent)]
    Counter(#[from] CounterError),

    /// Illegal document-status transition.
    #[error(transparent)]
    Document(#[from] DocumentError),

    /// No invoice with this ID in the business.
    #[error("Invoice {0} not found")]
    InvoiceNotFound(Uuid),

    /// No purchase with this ID in the business.
    #[error("Purchase {0} not found")]
    PurchaseNotFound(Uuid),

    /// No expense with this ID in the business.
    #[error("Expense {0} not found")]
    ExpenseNotFound(Uuid),

    /// No payment with this ID in the business.
    #[error("Payment {0} not found")]
    PaymentNotFound(Uuid),

    /// No production order with this ID in the business.
    #[error("Production order {0} not found")]
    ProductionOrderNotFound(Uuid),

    /// A document was created or posted with no lines.
    #[error("A {document} needs at least one line")]
    EmptyDocument {
        /// The document kind ("invoice", "purchase", "production_order",
        /// "pos_sale").
        document: &'static str,
    },

    /// A settlement larger than what the document still owes.
    #[error("Payment of {amount} exceeds the remaining balance of {remaining}")]
    Overpayment {
        /// The attempted payment amount.
        amount: Decimal,
        /// What the document still owes.
        remaining: Decimal,
    },

    /// Standalone deletion of a payment that settles an invoice or
    /// purchase; those are undone through the owning document.
    #[error("Payment {0} settles a document; cancel the document instead")]
    PaymentLinkedToDocument(Uuid),

    /// Scrap written off must lie between zero and the consumed cost.
    #[error("Scrap cost {scrap} must be between 0 and the consumed cost {consumed}")]
    ScrapOutOfRange {
        /// The scrap cost requested.
        scrap: Decimal,
        /// The total component cost consumed.
        consumed: Decimal,
    },

    /// An expense posted against a code that is not an expense account.
    #[error("Account {code} is not an expense account")]
    NotAnExpenseAccount {
        /// The offending account code.
        code: String,
    },

    /// An on-credit expense with no vendor to owe.
    #[error("An expense on credit requires a vendor")]
    MissingVendor,

    /// Database error outside any repository call.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl EngineError {
    /// Returns the stable error code for logs and CLI output.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Chart(err) => err.error_code(),
            Self::Journal(err) => err.error_code(),
            Self::Inventory(err) => err.error_code(),
            Self::Counter(err) => err.error_code(),
            Self::Document(err) => err.error_code(),
            Self::InvoiceNotFound(_) => "INVOICE_NOT_FOUND",
            Self::PurchaseNotFound(_) => "PURCHASE_NOT_FOUND",
            Self::ExpenseNotFound(_) => "EXPENSE_NOT_FOUND",
            Self::PaymentNotFound(_) => "PAYMENT_NOT_FOUND",
            Self::ProductionOrderNotFound(_) => "PRODUCTION_ORDER_NOT_FOUND",
            Self::EmptyDocument { .. } => "EMPTY_DOCUMENT",
            Self::Overpayment { .. } => "OVERPAYMENT",
            Self::PaymentLinkedToDocument(_) => "PAYMENT_LINKED_TO_DOCUMENT",
            Self::ScrapOutOfRange { .. } => "SCRAP_OUT_OF_RANGE",
            Self::NotAnExpenseAccount { .. } => "NOT_AN_EXPENSE_ACCOUNT",
            Self::MissingVendor => "MISSING_VENDOR",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use khata_core::costing::CostingError;
    use khata_core::ledger::LedgerError;
    use rust_decimal_macros::dec;

    #[test]
    fn test_error_codes_delegate_to_the_source() {
        let unbalanced: EngineError = JournalError::from(LedgerError::UnbalancedEntry {
            debit: dec!(100),
            credit: dec!(90),
        })
        .into();
        assert_eq!(unbalanced.error_code(), "UNBALANCED_ENTRY");

        let short: EngineError = InventoryError::from(CostingError::InsufficientStock {
            requested: dec!(5),
            available: dec!(2),
        })
        .into();
        assert_eq!(short.error_code(), "INSUFFICIENT_STOCK");
    }

    #[test]
    fn test_own_variants_have_codes_and_messages() {
        let err = EngineError::Overpayment {
            amount: dec!(500),
            remaining: dec!(300),
        };
        assert_eq!(err.error_code(), "OVERPAYMENT");
        assert_eq!(
            err.to_string(),
            "Payment of 500 exceeds the remaining balance of 300"
        );

        let err = EngineError::NotAnExpenseAccount {
            code: "1000".to_string(),
        };
        assert_eq!(err.error_code(), "NOT_AN_EXPENSE_ACCOUNT");
    }
}
