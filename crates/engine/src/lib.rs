//! Business-event adapters for Khata.
//!
//! Each adapter drives one document's lifecycle as a mechanical
//! composition of the shared primitives: the journal poster, the FIFO
//! costing engine, and the denormalized counters. None of them contain
//! independent accounting logic. Every operation wraps its full sequence
//! in one database transaction; any failure rolls the sequence back
//! whole, and document rows are read under row locks so concurrent
//! requests cannot post the same transition twice.

pub mod error;
pub mod expense;
pub mod invoice;
pub mod payment;
pub mod pos;
pub mod production;
pub mod purchase;

pub use error::EngineError;
pub use expense::{DeletedExpense, ExpenseAdapter, RecordExpenseInput, RecordedExpense};
pub use invoice::{
    CancelledInvoice, CreateInvoiceInput, InvoiceAdapter, InvoiceItemInput, InvoiceSettlement,
    PostedInvoice,
};
pub use payment::{
    DeletedPayment, PaymentAdapter, PaymentParty, RecordPaymentInput, RecordedPayment, SettleInput,
};
pub use pos::{CheckoutInput, CompletedSale, PosAdapter, PosItemInput};
pub use production::{
    CompleteProductionInput, CompletedProduction, ComponentInput, CreateProductionInput,
    ProductionAdapter,
};
pub use purchase::{
    CreatePurchaseInput, PurchaseAdapter, PurchaseItemInput, PurchaseSettlement, ReceivedPurchase,
};
