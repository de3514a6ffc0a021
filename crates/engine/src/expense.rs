//! Expense recording and deletion.
//!
//! Expenses post immediately on creation; there is no draft state. The
//! net amount debits the chosen expense account, recoverable tax debits
//! input tax credit, and the gross total credits cash, bank, or the
//! vendor payable when bought on credit. Deletion reverses the journal.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter,
    QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use khata_core::chart::{AccountRole, AccountType};
use khata_core::documents::PaymentMethod;
use khata_core::ledger::{JournalLineInput, PostJournalInput, ReferenceType};
use khata_db::entities::expenses;
use khata_db::repositories::{CounterRepository, JournalRepository, ReversedAccountTotal};
use khata_shared::ActorContext;

use crate::error::EngineError;

/// Input for recording an expense.
#[derive(Debug, Clone)]
pub struct RecordExpenseInput {
    /// The expense account the net amount debits; must be expense-typed.
    pub account_code: String,
    /// The expense date, recorded on the journal.
    pub expense_date: NaiveDate,
    /// What the money bought.
    pub description: String,
    /// The net amount.
    pub amount: Decimal,
    /// Recoverable tax on top of the net amount.
    pub tax_amount: Decimal,
    /// How the expense was (or will be) paid.
    pub payment_method: PaymentMethod,
    /// True when the vendor is owed instead of paid now.
    pub on_credit: bool,
    /// The owed vendor; required when `on_credit`.
    pub vendor_id: Option<Uuid>,
}

/// A recorded expense and the journal that posted it.
#[derive(Debug, Clone)]
pub struct RecordedExpense {
    /// The stored expense row.
    pub expense: expenses::Model,
    /// The posting journal.
    pub journal_id: Uuid,
}

/// The reversal detail of a deleted expense.
#[derive(Debug, Clone)]
pub struct DeletedExpense {
    /// The removed expense's ID.
    pub expense_id: Uuid,
    /// Per-account totals the reversal removed from the ledger.
    pub removed: Vec<ReversedAccountTotal>,
}

/// Records and deletes expenses.
#[derive(Debug, Clone)]
pub struct ExpenseAdapter {
    db: DatabaseConnection,
    journal: JournalRepository,
    counters: CounterRepository,
}

impl ExpenseAdapter {
    /// Creates an expense adapter over a connection pool.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            journal: JournalRepository::new(db.clone()),
            counters: CounterRepository::new(db.clone()),
            db,
        }
    }

    /// Records an expense and posts its journal immediately.
    ///
    /// An on-credit expense also bumps the vendor's outstanding balance
    /// by the gross amount.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NotAnExpenseAccount`] when the code does not
    /// name an expense account, [`EngineError::MissingVendor`] for an
    /// on-credit expense without a vendor, or a journal error.
    pub async fn record(
        &self,
        ctx: &ActorContext,
        input: RecordExpenseInput,
    ) -> Result<RecordedExpense, EngineError> {
        let role = AccountRole::from_code(&input.account_code)
            .filter(|role| role.account_type() == AccountType::Expense)
            .ok_or_else(|| EngineError::NotAnExpenseAccount {
                code: input.account_code.clone(),
            })?;
        if input.on_credit && input.vendor_id.is_none() {
            return Err(EngineError::MissingVendor);
        }

        let txn = self.db.begin().await?;
        let expense_id = Uuid::new_v4();
        let expense = expenses::ActiveModel {
            id: Set(expense_id),
            business_id: Set(ctx.business_id),
            account_code: Set(input.account_code.clone()),
            expense_date: Set(input.expense_date),
            description: Set(input.description.clone()),
            amount: Set(input.amount),
            tax_amount: Set(input.tax_amount),
            payment_method: Set(input.payment_method.into()),
            on_credit: Set(input.on_credit),
            vendor_id: Set(input.vendor_id),
            created_by: Set(ctx.user_id),
            created_at: Set(chrono::Utc::now().into()),
        }
        .insert(&txn)
        .await?;

        let credit = if input.on_credit {
            AccountRole::AccountsPayable
        } else {
            input.payment_method.account_role()
        };
        let journal_id = self
            .journal
            .post(
                &txn,
                PostJournalInput {
                    business_id: ctx.business_id,
                    date: input.expense_date,
                    description: input.description.clone(),
                    reference_type: ReferenceType::Expense,
                    reference_id: expense_id,
                    lines: expense_lines(role, input.amount, input.tax_amount, credit),
                    created_by: ctx.user_id,
                },
            )
            .await?;

        if input.on_credit {
            if let Some(vendor_id) = input.vendor_id {
                self.counters
                    .adjust_vendor_outstanding(&txn, vendor_id, input.amount + input.tax_amount)
                    .await?;
            }
        }

        txn.commit().await?;
        tracing::info!(
            business_id = %ctx.business_id,
            expense_id = %expense_id,
            journal_id = %journal_id,
            account_code = %expense.account_code,
            amount = %input.amount,
            on_credit = input.on_credit,
            "expense recorded"
        );
        Ok(RecordedExpense {
            expense,
            journal_id,
        })
    }

    /// Deletes an expense, reversing its journal and undoing any vendor
    /// balance it created.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::ExpenseNotFound`] for an unknown ID, or a
    /// database error.
    pub async fn delete(
        &self,
        ctx: &ActorContext,
        expense_id: Uuid,
    ) -> Result<DeletedExpense, EngineError> {
        let txn = self.db.begin().await?;

        let expense = expenses::Entity::find_by_id(expense_id)
            .filter(expenses::Column::BusinessId.eq(ctx.business_id))
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(EngineError::ExpenseNotFound(expense_id))?;

        let removed = self
            .journal
            .reverse(&txn, ctx.business_id, ReferenceType::Expense, expense.id)
            .await?;

        if expense.on_credit {
            if let Some(vendor_id) = expense.vendor_id {
                self.counters
                    .adjust_vendor_outstanding(
                        &txn,
                        vendor_id,
                        -(expense.amount + expense.tax_amount),
                    )
                    .await?;
            }
        }

        expense.delete(&txn).await?;

        txn.commit().await?;
        tracing::info!(
            business_id = %ctx.business_id,
            expense_id = %expense_id,
            "expense deleted and reversed"
        );
        Ok(DeletedExpense {
            expense_id,
            removed,
        })
    }
}

/// GL lines for recording an expense.
///
/// The net amount debits the expense account and recoverable tax debits
/// input tax credit; the gross total credits `credit`, which is cash,
/// bank, or the payable for on-credit expenses. Zero tax drops its line.
fn expense_lines(
    account: AccountRole,
    amount: Decimal,
    tax: Decimal,
    credit: AccountRole,
) -> Vec<JournalLineInput> {
    let mut lines = vec![JournalLineInput::debit(account, amount)];
    if tax > Decimal::ZERO {
        lines.push(JournalLineInput::debit(AccountRole::InputTaxCredit, tax));
    }
    lines.push(JournalLineInput::credit(credit, amount + tax));
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use khata_core::ledger::validate_lines;
    use rust_decimal_macros::dec;

    #[test]
    fn test_cash_expense_credits_cash_for_the_gross() {
        let lines = expense_lines(
            AccountRole::RentExpense,
            dec!(100),
            dec!(18),
            AccountRole::Cash,
        );
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].account_code, "6200");
        assert_eq!(lines[0].as_columns().0, dec!(100));
        assert_eq!(lines[1].account_code, "1300");
        assert_eq!(lines[1].as_columns().0, dec!(18));
        assert_eq!(lines[2].account_code, "1000");
        assert_eq!(lines[2].as_columns().1, dec!(118));
        assert!(validate_lines(&lines).is_ok());
    }

    #[test]
    fn test_credit_expense_credits_the_payable() {
        let lines = expense_lines(
            AccountRole::UtilitiesExpense,
            dec!(250),
            Decimal::ZERO,
            AccountRole::AccountsPayable,
        );
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1].account_code, "2000");
        assert_eq!(lines[1].as_columns().1, dec!(250));
        assert!(validate_lines(&lines).is_ok());
    }
}
