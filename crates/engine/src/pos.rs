//! Point-of-sale checkout.
//!
//! A POS sale settles at the counter: stock is consumed FIFO, revenue and
//! cash post in the same journal, and no receivable is created. There is
//! no draft state and no per-line lot pinning; walk-in sales always draw
//! the oldest stock.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set, TransactionTrait};
use uuid::Uuid;

use khata_core::chart::AccountRole;
use khata_core::documents::PaymentMethod;
use khata_core::ledger::{JournalLineInput, PostJournalInput, ReferenceType};
use khata_db::entities::{pos_sale_items, pos_sales};
use khata_db::repositories::{
    ConsumeInput, CounterRepository, InventoryRepository, JournalRepository,
};
use khata_shared::ActorContext;

use crate::error::EngineError;

/// One line of a POS sale.
#[derive(Debug, Clone)]
pub struct PosItemInput {
    /// The product sold.
    pub product_id: Uuid,
    /// Units sold.
    pub quantity: Decimal,
    /// Price per unit before tax.
    pub unit_price: Decimal,
    /// Tax charged on the line.
    pub tax_amount: Decimal,
}

/// Input for a POS checkout.
#[derive(Debug, Clone)]
pub struct CheckoutInput {
    /// The warehouse stock is drawn from.
    pub warehouse_id: Uuid,
    /// The caller-assigned receipt number.
    pub sale_number: String,
    /// The sale date, recorded on the journal.
    pub sale_date: NaiveDate,
    /// How the customer paid.
    pub method: PaymentMethod,
    /// The sale lines.
    pub items: Vec<PosItemInput>,
}

/// A completed POS sale with its posting detail.
#[derive(Debug, Clone)]
pub struct CompletedSale {
    /// The stored sale row.
    pub sale: pos_sales::Model,
    /// The sale journal.
    pub journal_id: Uuid,
    /// FIFO cost of the stock the sale consumed.
    pub cost_of_goods: Decimal,
}

/// Posts immediate-settlement sales.
#[derive(Debug, Clone)]
pub struct PosAdapter {
    db: DatabaseConnection,
    journal: JournalRepository,
    inventory: InventoryRepository,
    counters: CounterRepository,
}

impl PosAdapter {
    /// Creates a POS adapter over a connection pool.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            journal: JournalRepository::new(db.clone()),
            inventory: InventoryRepository::new(db.clone()),
            counters: CounterRepository::new(db.clone()),
            db,
        }
    }

    /// Checks out a sale: stores it, consumes stock FIFO, and posts the
    /// combined cash and cost journal.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::EmptyDocument`] when `items` is empty, an
    /// inventory error when stock is short, or a journal error.
    pub async fn checkout(
        &self,
        ctx: &ActorContext,
        input: CheckoutInput,
    ) -> Result<CompletedSale, EngineError> {
        if input.items.is_empty() {
            return Err(EngineError::EmptyDocument {
                document: "pos_sale",
            });
        }
        let (subtotal, tax_amount) = pos_totals(&input.items);

        let txn = self.db.begin().await?;
        let sale_id = Uuid::new_v4();
        let sale = pos_sales::ActiveModel {
            id: Set(sale_id),
            business_id: Set(ctx.business_id),
            warehouse_id: Set(input.warehouse_id),
            sale_number: Set(input.sale_number.clone()),
            sale_date: Set(input.sale_date),
            subtotal: Set(subtotal),
            tax_amount: Set(tax_amount),
            total: Set(subtotal + tax_amount),
            method: Set(input.method.into()),
            created_by: Set(ctx.user_id),
            created_at: Set(chrono::Utc::now().into()),
        }
        .insert(&txn)
        .await?;

        let items: Vec<pos_sale_items::ActiveModel> = input
            .items
            .iter()
            .map(|item| pos_sale_items::ActiveModel {
                id: Set(Uuid::new_v4()),
                pos_sale_id: Set(sale_id),
                product_id: Set(item.product_id),
                quantity: Set(item.quantity),
                unit_price: Set(item.unit_price),
                tax_amount: Set(item.tax_amount),
                line_total: Set(item.quantity * item.unit_price + item.tax_amount),
            })
            .collect();
        pos_sale_items::Entity::insert_many(items)
            .exec(&txn)
            .await?;

        let mut cost_of_goods = Decimal::ZERO;
        for item in &input.items {
            let plan = self
                .inventory
                .consume(
                    &txn,
                    ConsumeInput {
                        business_id: ctx.business_id,
                        product_id: item.product_id,
                        warehouse_id: input.warehouse_id,
                        quantity: item.quantity,
                        lot_refs: None,
                        reference_type: ReferenceType::PosSale,
                        reference_id: sale_id,
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
                    date: input.sale_date,
                    description: format!("POS sale {}", sale.sale_number),
                    reference_type: ReferenceType::PosSale,
                    reference_id: sale_id,
                    lines: checkout_lines(input.method, subtotal, tax_amount, cost_of_goods),
                    created_by: ctx.user_id,
                },
            )
            .await?;

        txn.commit().await?;
        tracing::info!(
            business_id = %ctx.business_id,
            sale_id = %sale_id,
            journal_id = %journal_id,
            total = %sale.total,
            cost_of_goods = %cost_of_goods,
            "pos sale checked out"
        );
        Ok(CompletedSale {
            sale,
            journal_id,
            cost_of_goods,
        })
    }
}

/// Net and tax totals across sale lines.
fn pos_totals(items: &[PosItemInput]) -> (Decimal, Decimal) {
    items
        .iter()
        .fold((Decimal::ZERO, Decimal::ZERO), |(net, tax), item| {
            (net + item.quantity * item.unit_price, tax + item.tax_amount)
        })
}

/// GL lines for a POS checkout.
///
/// Cash or bank carries the gross take; revenue and tax split it, and the
/// cost pair moves the consumed stock value into cost of goods sold. Zero
/// tax and zero cost drop their lines.
fn checkout_lines(
    method: PaymentMethod,
    subtotal: Decimal,
    tax: Decimal,
    cost: Decimal,
) -> Vec<JournalLineInput> {
    let mut lines = vec![
        JournalLineInput::debit(method.account_role(), subtotal + tax),
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

    #[test]
    fn test_checkout_lines_take_cash_for_the_gross() {
        let lines = checkout_lines(PaymentMethod::Cash, dec!(400), dec!(72), dec!(260));
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0].account_code, "1000");
        assert_eq!(lines[0].as_columns().0, dec!(472));
        assert_eq!(lines[1].account_code, "4000");
        assert_eq!(lines[2].account_code, "2100");
        assert_eq!(lines[3].account_code, "5000");
        assert_eq!(lines[4].account_code, "1200");
        assert!(validate_lines(&lines).is_ok());
    }

    #[test]
    fn test_checkout_lines_use_bank_for_card_settlement() {
        let lines = checkout_lines(PaymentMethod::Bank, dec!(150), Decimal::ZERO, dec!(90));
        assert_eq!(lines[0].account_code, "1010");
        assert!(validate_lines(&lines).is_ok());
    }

    #[test]
    fn test_pos_totals_sum_lines() {
        let items = vec![
            PosItemInput {
                product_id: Uuid::new_v4(),
                quantity: dec!(3),
                unit_price: dec!(100),
                tax_amount: dec!(54),
            },
            PosItemInput {
                product_id: Uuid::new_v4(),
                quantity: dec!(1),
                unit_price: dec!(100),
                tax_amount: dec!(18),
            },
        ];
        let (subtotal, tax) = pos_totals(&items);
        assert_eq!(subtotal, dec!(400));
        assert_eq!(tax, dec!(72));
    }
}
