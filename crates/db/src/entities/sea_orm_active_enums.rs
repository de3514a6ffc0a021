//! `SeaORM` active enums mapping the PostgreSQL enum types.
//!
//! Each enum mirrors a `CREATE TYPE ... AS ENUM` in the initial migration.
//! Conversions to and from the `khata-core` domain enums live at the bottom
//! so repositories never match on string values.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Account classification, `account_type` in PostgreSQL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "account_type")]
pub enum AccountType {
    /// Debit-normal resource account.
    #[sea_orm(string_value = "asset")]
    Asset,
    /// Credit-normal obligation account.
    #[sea_orm(string_value = "liability")]
    Liability,
    /// Credit-normal ownership account.
    #[sea_orm(string_value = "equity")]
    Equity,
    /// Credit-normal revenue account.
    #[sea_orm(string_value = "income")]
    Income,
    /// Debit-normal cost account.
    #[sea_orm(string_value = "expense")]
    Expense,
}

/// Originating document kind for a journal, `reference_type` in PostgreSQL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "reference_type")]
pub enum ReferenceType {
    /// Manual journal entry.
    #[sea_orm(string_value = "journal")]
    Journal,
    /// Sales invoice.
    #[sea_orm(string_value = "invoice")]
    Invoice,
    /// Purchase order.
    #[sea_orm(string_value = "purchase")]
    Purchase,
    /// Operating expense.
    #[sea_orm(string_value = "expense")]
    Expense,
    /// Receipt or disbursement.
    #[sea_orm(string_value = "payment")]
    Payment,
    /// Production order.
    #[sea_orm(string_value = "production_order")]
    ProductionOrder,
    /// Point-of-sale checkout.
    #[sea_orm(string_value = "pos_sale")]
    PosSale,
}

/// Invoice lifecycle status, `invoice_status` in PostgreSQL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "invoice_status")]
pub enum InvoiceStatus {
    /// Being drafted, nothing posted.
    #[sea_orm(string_value = "draft")]
    Draft,
    /// Issued, awaiting payment.
    #[sea_orm(string_value = "pending")]
    Pending,
    /// Paid in full.
    #[sea_orm(string_value = "paid")]
    Paid,
    /// Cancelled, postings reversed.
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

/// Purchase lifecycle status, `purchase_status` in PostgreSQL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "purchase_status")]
pub enum PurchaseStatus {
    /// Being drafted, nothing posted.
    #[sea_orm(string_value = "draft")]
    Draft,
    /// Goods received and posted.
    #[sea_orm(string_value = "received")]
    Received,
    /// Vendor settled.
    #[sea_orm(string_value = "paid")]
    Paid,
    /// Cancelled before receiving.
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

/// Production-order lifecycle status, `production_status` in PostgreSQL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "production_status")]
pub enum ProductionStatus {
    /// Planned, no stock moved.
    #[sea_orm(string_value = "pending")]
    Pending,
    /// Completed, output lot exists.
    #[sea_orm(string_value = "completed")]
    Completed,
    /// Cancelled before completion.
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

/// Counterparty side of a payment, `party_type` in PostgreSQL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "party_type")]
pub enum PartyType {
    /// Customer paying an invoice.
    #[sea_orm(string_value = "customer")]
    Customer,
    /// Vendor being paid.
    #[sea_orm(string_value = "vendor")]
    Vendor,
}

/// Settlement channel, `payment_method` in PostgreSQL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "payment_method")]
pub enum PaymentMethod {
    /// Physical cash.
    #[sea_orm(string_value = "cash")]
    Cash,
    /// Bank transfer or card settlement.
    #[sea_orm(string_value = "bank")]
    Bank,
}

// ============================================================================
// Conversions to/from khata-core domain enums
// ============================================================================

impl From<khata_core::chart::AccountType> for AccountType {
    fn from(value: khata_core::chart::AccountType) -> Self {
        match value {
            khata_core::chart::AccountType::Asset => Self::Asset,
            khata_core::chart::AccountType::Liability => Self::Liability,
            khata_core::chart::AccountType::Equity => Self::Equity,
            khata_core::chart::AccountType::Income => Self::Income,
            khata_core::chart::AccountType::Expense => Self::Expense,
        }
    }
}

impl From<AccountType> for khata_core::chart::AccountType {
    fn from(value: AccountType) -> Self {
        match value {
            AccountType::Asset => Self::Asset,
            AccountType::Liability => Self::Liability,
            AccountType::Equity => Self::Equity,
            AccountType::Income => Self::Income,
            AccountType::Expense => Self::Expense,
        }
    }
}

impl From<khata_core::ledger::ReferenceType> for ReferenceType {
    fn from(value: khata_core::ledger::ReferenceType) -> Self {
        match value {
            khata_core::ledger::ReferenceType::Journal => Self::Journal,
            khata_core::ledger::ReferenceType::Invoice => Self::Invoice,
            khata_core::ledger::ReferenceType::Purchase => Self::Purchase,
            khata_core::ledger::ReferenceType::Expense => Self::Expense,
            khata_core::ledger::ReferenceType::Payment => Self::Payment,
            khata_core::ledger::ReferenceType::ProductionOrder => Self::ProductionOrder,
            khata_core::ledger::ReferenceType::PosSale => Self::PosSale,
        }
    }
}

impl From<ReferenceType> for khata_core::ledger::ReferenceType {
    fn from(value: ReferenceType) -> Self {
        match value {
            ReferenceType::Journal => Self::Journal,
            ReferenceType::Invoice => Self::Invoice,
            ReferenceType::Purchase => Self::Purchase,
            ReferenceType::Expense => Self::Expense,
            ReferenceType::Payment => Self::Payment,
            ReferenceType::ProductionOrder => Self::ProductionOrder,
            ReferenceType::PosSale => Self::PosSale,
        }
    }
}

impl From<khata_core::documents::InvoiceStatus> for InvoiceStatus {
    fn from(value: khata_core::documents::InvoiceStatus) -> Self {
        match value {
            khata_core::documents::InvoiceStatus::Draft => Self::Draft,
            khata_core::documents::InvoiceStatus::Pending => Self::Pending,
            khata_core::documents::InvoiceStatus::Paid => Self::Paid,
            khata_core::documents::InvoiceStatus::Cancelled => Self::Cancelled,
        }
    }
}

impl From<InvoiceStatus> for khata_core::documents::InvoiceStatus {
    fn from(value: InvoiceStatus) -> Self {
        match value {
            InvoiceStatus::Draft => Self::Draft,
            InvoiceStatus::Pending => Self::Pending,
            InvoiceStatus::Paid => Self::Paid,
            InvoiceStatus::Cancelled => Self::Cancelled,
        }
    }
}

impl From<khata_core::documents::PurchaseStatus> for PurchaseStatus {
    fn from(value: khata_core::documents::PurchaseStatus) -> Self {
        match value {
            khata_core::documents::PurchaseStatus::Draft => Self::Draft,
            khata_core::documents::PurchaseStatus::Received => Self::Received,
            khata_core::documents::PurchaseStatus::Paid => Self::Paid,
            khata_core::documents::PurchaseStatus::Cancelled => Self::Cancelled,
        }
    }
}

impl From<PurchaseStatus> for khata_core::documents::PurchaseStatus {
    fn from(value: PurchaseStatus) -> Self {
        match value {
            PurchaseStatus::Draft => Self::Draft,
            PurchaseStatus::Received => Self::Received,
            PurchaseStatus::Paid => Self::Paid,
            PurchaseStatus::Cancelled => Self::Cancelled,
        }
    }
}

impl From<khata_core::documents::ProductionStatus> for ProductionStatus {
    fn from(value: khata_core::documents::ProductionStatus) -> Self {
        match value {
            khata_core::documents::ProductionStatus::Pending => Self::Pending,
            khata_core::documents::ProductionStatus::Completed => Self::Completed,
            khata_core::documents::ProductionStatus::Cancelled => Self::Cancelled,
        }
    }
}

impl From<ProductionStatus> for khata_core::documents::ProductionStatus {
    fn from(value: ProductionStatus) -> Self {
        match value {
            ProductionStatus::Pending => Self::Pending,
            ProductionStatus::Completed => Self::Completed,
            ProductionStatus::Cancelled => Self::Cancelled,
        }
    }
}

impl From<khata_core::documents::PartyType> for PartyType {
    fn from(value: khata_core::documents::PartyType) -> Self {
        match value {
            khata_core::documents::PartyType::Customer => Self::Customer,
            khata_core::documents::PartyType::Vendor => Self::Vendor,
        }
    }
}

impl From<PartyType> for khata_core::documents::PartyType {
    fn from(value: PartyType) -> Self {
        match value {
            PartyType::Customer => Self::Customer,
            PartyType::Vendor => Self::Vendor,
        }
    }
}

impl From<khata_core::documents::PaymentMethod> for PaymentMethod {
    fn from(value: khata_core::documents::PaymentMethod) -> Self {
        match value {
            khata_core::documents::PaymentMethod::Cash => Self::Cash,
            khata_core::documents::PaymentMethod::Bank => Self::Bank,
        }
    }
}

impl From<PaymentMethod> for khata_core::documents::PaymentMethod {
    fn from(value: PaymentMethod) -> Self {
        match value {
            PaymentMethod::Cash => Self::Cash,
            PaymentMethod::Bank => Self::Bank,
        }
    }
}
