//! Business-document status machines.
//!
//! Invoices, purchases, and production orders move through small state
//! machines before and after their ledger postings exist. The transitions
//! here are the single source of truth for what each adapter may do to a
//! document; the adapters enforce them inside a row-locked transaction.

pub mod error;
pub mod invoice;
pub mod payment;
pub mod production;
pub mod purchase;

pub use error::DocumentError;
pub use invoice::InvoiceStatus;
pub use payment::{PartyType, PaymentMethod};
pub use production::ProductionStatus;
pub use purchase::PurchaseStatus;
