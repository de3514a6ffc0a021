//! Denormalized counter-balance maintenance.
//!
//! Customer/vendor outstanding balances and product stock quantities are
//! derived caches updated in lockstep with journal posting. This repository
//! is the single boundary for those updates, and owns the reconciliation
//! that recomputes them from ledger and lot history when drift is suspected.

use std::collections::HashMap;

use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait, QueryFilter,
    TransactionTrait,
};
use uuid::Uuid;

use crate::entities::sea_orm_active_enums::{InvoiceStatus, PurchaseStatus};
use crate::entities::{batches, customers, expenses, invoices, payments, products, purchases, vendors};

/// Error types for counter operations.
#[derive(Debug, thiserror::Error)]
pub enum CounterError {
    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl CounterError {
    /// Returns the stable error code for logs and CLI output.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Database(_) => "DATABASE_ERROR",
        }
    }
}

/// Which denormalized counter drifted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterKind {
    /// `customers.outstanding_balance`.
    CustomerOutstanding,
    /// `vendors.outstanding_balance`.
    VendorOutstanding,
    /// `products.stock_quantity`.
    ProductStock,
}

impl CounterKind {
    /// Returns the snake_case name for logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CustomerOutstanding => "customer_outstanding",
            Self::VendorOutstanding => "vendor_outstanding",
            Self::ProductStock => "product_stock",
        }
    }
}

impl std::fmt::Display for CounterKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One counter whose stored value disagreed with the replayed history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CounterDrift {
    /// Which counter drifted.
    pub kind: CounterKind,
    /// The customer, vendor, or product row.
    pub entity_id: Uuid,
    /// Value stored before reconciliation.
    pub stored: Decimal,
    /// Value recomputed from history; the row now holds this.
    pub expected: Decimal,
}

/// Repository for the denormalized counter balances.
#[derive(Debug, Clone)]
pub struct CounterRepository {
    db: DatabaseConnection,
}

impl CounterRepository {
    /// Creates a new counter repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Adds `delta` to a customer's outstanding balance.
    ///
    /// The increment happens in SQL, so concurrent postings cannot lose an
    /// update to a read-modify-write race.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub async fn adjust_customer_outstanding(
        &self,
        txn: &DatabaseTransaction,
        customer_id: Uuid,
        delta: Decimal,
    ) -> Result<(), CounterError> {
        customers::Entity::update_many()
            .col_expr(
                customers::Column::OutstandingBalance,
                Expr::col(customers::Column::OutstandingBalance).add(delta),
            )
            .filter(customers::Column::Id.eq(customer_id))
            .exec(txn)
            .await?;
        Ok(())
    }

    /// Adds `delta` to a vendor's outstanding balance.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub async fn adjust_vendor_outstanding(
        &self,
        txn: &DatabaseTransaction,
        vendor_id: Uuid,
        delta: Decimal,
    ) -> Result<(), CounterError> {
        vendors::Entity::update_many()
            .col_expr(
                vendors::Column::OutstandingBalance,
                Expr::col(vendors::Column::OutstandingBalance).add(delta),
            )
            .filter(vendors::Column::Id.eq(vendor_id))
            .exec(txn)
            .await?;
        Ok(())
    }

    /// Adds `delta` to a product's stock quantity.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub async fn adjust_product_stock(
        &self,
        txn: &DatabaseTransaction,
        product_id: Uuid,
        delta: Decimal,
    ) -> Result<(), CounterError> {
        products::Entity::update_many()
            .col_expr(
                products::Column::StockQuantity,
                Expr::col(products::Column::StockQuantity).add(delta),
            )
            .filter(products::Column::Id.eq(product_id))
            .exec(txn)
            .await?;
        Ok(())
    }

    /// Recomputes every counter for a business from document and lot history,
    /// repairing rows that drifted.
    ///
    /// Expected values:
    /// - customer outstanding: posted invoice totals minus customer payments
    /// - vendor outstanding: received purchase totals plus on-credit expense
    ///   gross amounts minus vendor payments
    /// - product stock: sum of `quantity_remaining` across the product's lots
    ///
    /// Returns one [`CounterDrift`] per repaired row; an empty vec means the
    /// caches were consistent.
    ///
    /// # Errors
    ///
    /// Returns an error if a database operation fails.
    pub async fn recompute_from_ledger(
        &self,
        business_id: Uuid,
    ) -> Result<Vec<CounterDrift>, CounterError> {
        let txn = self.db.begin().await?;
        let mut drifts = Vec::new();

        // Customers: posted invoices charge, payments settle.
        let mut invoice_totals: HashMap<Uuid, Decimal> = HashMap::new();
        let posted_invoices = invoices::Entity::find()
            .filter(invoices::Column::BusinessId.eq(business_id))
            .filter(
                invoices::Column::Status
                    .is_in([InvoiceStatus::Pending, InvoiceStatus::Paid]),
            )
            .all(&txn)
            .await?;
        for invoice in &posted_invoices {
            *invoice_totals.entry(invoice.customer_id).or_default() += invoice.total;
        }

        let mut customer_payments: HashMap<Uuid, Decimal> = HashMap::new();
        let mut vendor_payments: HashMap<Uuid, Decimal> = HashMap::new();
        let payment_rows = payments::Entity::find()
            .filter(payments::Column::BusinessId.eq(business_id))
            .all(&txn)
            .await?;
        for payment in &payment_rows {
            if let Some(customer_id) = payment.customer_id {
                *customer_payments.entry(customer_id).or_default() += payment.amount;
            }
            if let Some(vendor_id) = payment.vendor_id {
                *vendor_payments.entry(vendor_id).or_default() += payment.amount;
            }
        }

        let customer_rows = customers::Entity::find()
            .filter(customers::Column::BusinessId.eq(business_id))
            .all(&txn)
            .await?;
        for customer in &customer_rows {
            let expected = invoice_totals.get(&customer.id).copied().unwrap_or_default()
                - customer_payments.get(&customer.id).copied().unwrap_or_default();
            if let Some(drift) = detect_drift(
                CounterKind::CustomerOutstanding,
                customer.id,
                customer.outstanding_balance,
                expected,
            ) {
                customers::Entity::update_many()
                    .col_expr(customers::Column::OutstandingBalance, Expr::value(expected))
                    .filter(customers::Column::Id.eq(customer.id))
                    .exec(&txn)
                    .await?;
                drifts.push(drift);
            }
        }

        // Vendors: received purchases and on-credit expenses charge,
        // payments settle.
        let mut purchase_totals: HashMap<Uuid, Decimal> = HashMap::new();
        let received_purchases = purchases::Entity::find()
            .filter(purchases::Column::BusinessId.eq(business_id))
            .filter(
                purchases::Column::Status
                    .is_in([PurchaseStatus::Received, PurchaseStatus::Paid]),
            )
            .all(&txn)
            .await?;
        for purchase in &received_purchases {
            *purchase_totals.entry(purchase.vendor_id).or_default() += purchase.total;
        }

        let credit_expenses = expenses::Entity::find()
            .filter(expenses::Column::BusinessId.eq(business_id))
            .filter(expenses::Column::OnCredit.eq(true))
            .all(&txn)
            .await?;
        for expense in &credit_expenses {
            if let Some(vendor_id) = expense.vendor_id {
                *purchase_totals.entry(vendor_id).or_default() +=
                    expense.amount + expense.tax_amount;
            }
        }

        let vendor_rows = vendors::Entity::find()
            .filter(vendors::Column::BusinessId.eq(business_id))
            .all(&txn)
            .await?;
        for vendor in &vendor_rows {
            let expected = purchase_totals.get(&vendor.id).copied().unwrap_or_default()
                - vendor_payments.get(&vendor.id).copied().unwrap_or_default();
            if let Some(drift) = detect_drift(
                CounterKind::VendorOutstanding,
                vendor.id,
                vendor.outstanding_balance,
                expected,
            ) {
                vendors::Entity::update_many()
                    .col_expr(vendors::Column::OutstandingBalance, Expr::value(expected))
                    .filter(vendors::Column::Id.eq(vendor.id))
                    .exec(&txn)
                    .await?;
                drifts.push(drift);
            }
        }

        // Products: open lots are the source of truth for stock.
        let mut lot_totals: HashMap<Uuid, Decimal> = HashMap::new();
        let lot_rows = batches::Entity::find()
            .filter(batches::Column::BusinessId.eq(business_id))
            .all(&txn)
            .await?;
        for lot in &lot_rows {
            *lot_totals.entry(lot.product_id).or_default() += lot.quantity_remaining;
        }

        let product_rows = products::Entity::find()
            .filter(products::Column::BusinessId.eq(business_id))
            .all(&txn)
            .await?;
        for product in &product_rows {
            let expected = lot_totals.get(&product.id).copied().unwrap_or_default();
            if let Some(drift) = detect_drift(
                CounterKind::ProductStock,
                product.id,
                product.stock_quantity,
                expected,
            ) {
                products::Entity::update_many()
                    .col_expr(products::Column::StockQuantity, Expr::value(expected))
                    .filter(products::Column::Id.eq(product.id))
                    .exec(&txn)
                    .await?;
                drifts.push(drift);
            }
        }

        txn.commit().await?;

        for drift in &drifts {
            tracing::warn!(
                %business_id,
                kind = %drift.kind,
                entity_id = %drift.entity_id,
                stored = %drift.stored,
                expected = %drift.expected,
                "counter drift repaired"
            );
        }
        tracing::info!(%business_id, drifts = drifts.len(), "counters recomputed");
        Ok(drifts)
    }
}

/// Compares a stored counter against its recomputed value.
///
/// Decimal equality treats 5 and 5.00 as equal, so trailing-zero scale
/// differences never count as drift.
fn detect_drift(
    kind: CounterKind,
    entity_id: Uuid,
    stored: Decimal,
    expected: Decimal,
) -> Option<CounterDrift> {
    if stored == expected {
        None
    } else {
        Some(CounterDrift {
            kind,
            entity_id,
            stored,
            expected,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_detect_drift_reports_mismatch() {
        let id = Uuid::from_u128(1);
        let drift = detect_drift(CounterKind::ProductStock, id, dec!(95), dec!(100)).unwrap();
        assert_eq!(drift.stored, dec!(95));
        assert_eq!(drift.expected, dec!(100));
        assert_eq!(drift.kind.as_str(), "product_stock");
    }

    #[test]
    fn test_detect_drift_ignores_equal_values() {
        let id = Uuid::from_u128(2);
        assert!(detect_drift(CounterKind::CustomerOutstanding, id, dec!(0), dec!(0)).is_none());
        // Trailing zeros are a formatting artifact, not a drift.
        assert!(
            detect_drift(CounterKind::VendorOutstanding, id, dec!(5000), dec!(5000.00)).is_none()
        );
    }
}
