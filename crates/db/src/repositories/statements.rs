//! Statement repository: read-only ledger aggregation.
//!
//! Loads per-account debit/credit totals for a window and hands them to the
//! pure statement builders in the core crate. Reads run outside any write
//! transaction; a statement sees a journal fully or not at all.

use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, FromQueryResult, JoinType, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait,
};
use uuid::Uuid;

use khata_core::statements::{
    build_account_ledger, build_balance_sheet, build_profit_and_loss, build_trial_balance,
    AccountActivity, AccountLedger, BalanceSheet, JournalLineRecord, LedgerAccountMeta,
    ProfitAndLoss, TrialBalance,
};

use crate::entities::{accounts, gl_entries, journal_entries, sea_orm_active_enums};

/// Error types for statement generation.
#[derive(Debug, thiserror::Error)]
pub enum StatementError {
    /// No account with this code exists for the business.
    #[error("Account not found: {code}")]
    AccountNotFound {
        /// The unresolvable account code.
        code: String,
    },

    /// Period start is after period end.
    #[error("Invalid date range: {start} is after {end}")]
    InvalidDateRange {
        /// Requested period start.
        start: NaiveDate,
        /// Requested period end.
        end: NaiveDate,
    },

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl StatementError {
    /// Returns the stable error code for logs and CLI output.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::AccountNotFound { .. } => "ACCOUNT_NOT_FOUND",
            Self::InvalidDateRange { .. } => "INVALID_DATE_RANGE",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }
}

/// Row shape for per-account `SUM(debit), SUM(credit)` aggregates.
#[derive(Debug, FromQueryResult)]
struct ActivityRow {
    account_id: Uuid,
    total_debit: Decimal,
    total_credit: Decimal,
}

/// Row shape for ledger lines joined with their journal header.
#[derive(Debug, FromQueryResult)]
struct LedgerLineRow {
    journal_id: Uuid,
    transaction_date: NaiveDate,
    debit: Decimal,
    credit: Decimal,
    jrn_description: String,
    jrn_reference_type: sea_orm_active_enums::ReferenceType,
}

/// Statement repository over the accumulated ledger.
#[derive(Debug, Clone)]
pub struct StatementRepository {
    db: DatabaseConnection,
}

impl StatementRepository {
    /// Creates a new statement repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Builds the trial balance through `as_of`.
    ///
    /// An out-of-balance ledger is returned, not raised: the report carries
    /// `balanced` and the exact discrepancy.
    ///
    /// # Errors
    ///
    /// Returns an error if a database query fails.
    pub async fn trial_balance(
        &self,
        business_id: Uuid,
        as_of: NaiveDate,
    ) -> Result<TrialBalance, StatementError> {
        let activity = self.activity(business_id, None, as_of).await?;
        let report = build_trial_balance(as_of, activity);
        if !report.balanced {
            tracing::warn!(
                %business_id,
                %as_of,
                discrepancy = %report.discrepancy,
                "trial balance out of balance"
            );
        }
        Ok(report)
    }

    /// Builds the profit & loss statement for `[start, end]`.
    ///
    /// # Errors
    ///
    /// Returns [`StatementError::InvalidDateRange`] if `start > end`, or a
    /// database error.
    pub async fn profit_and_loss(
        &self,
        business_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<ProfitAndLoss, StatementError> {
        if start > end {
            return Err(StatementError::InvalidDateRange { start, end });
        }
        let activity = self.activity(business_id, Some(start), end).await?;
        Ok(build_profit_and_loss(start, end, activity))
    }

    /// Builds the balance sheet as of a date.
    ///
    /// Loads lifetime activity through `as_of` in one pass: retained
    /// earnings folds from the same rows, so equity always reflects full
    /// history.
    ///
    /// # Errors
    ///
    /// Returns an error if a database query fails.
    pub async fn balance_sheet(
        &self,
        business_id: Uuid,
        as_of: NaiveDate,
    ) -> Result<BalanceSheet, StatementError> {
        let activity = self.activity(business_id, None, as_of).await?;
        let report = build_balance_sheet(as_of, activity);
        if !report.balanced {
            tracing::warn!(
                %business_id,
                %as_of,
                discrepancy = %report.discrepancy,
                "balance sheet out of balance"
            );
        }
        Ok(report)
    }

    /// Builds the per-account drill-down with a running balance.
    ///
    /// The opening balance carries all activity before `start`, so the view
    /// reconciles against the trial balance for any window.
    ///
    /// # Errors
    ///
    /// Returns [`StatementError::AccountNotFound`] for an unknown code,
    /// [`StatementError::InvalidDateRange`] if `start > end`, or a database
    /// error.
    pub async fn account_ledger(
        &self,
        business_id: Uuid,
        account_code: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<AccountLedger, StatementError> {
        if start > end {
            return Err(StatementError::InvalidDateRange { start, end });
        }

        let account = accounts::Entity::find()
            .filter(accounts::Column::BusinessId.eq(business_id))
            .filter(accounts::Column::Code.eq(account_code))
            .one(&self.db)
            .await?
            .ok_or_else(|| StatementError::AccountNotFound {
                code: account_code.to_string(),
            })?;
        let account_type: khata_core::chart::AccountType = account.account_type.into();

        // Everything before the window folds into the opening balance.
        let prior = gl_entries::Entity::find()
            .select_only()
            .column(gl_entries::Column::AccountId)
            .column_as(gl_entries::Column::Debit.sum(), "total_debit")
            .column_as(gl_entries::Column::Credit.sum(), "total_credit")
            .filter(gl_entries::Column::AccountId.eq(account.id))
            .filter(gl_entries::Column::TransactionDate.lt(start))
            .group_by(gl_entries::Column::AccountId)
            .into_model::<ActivityRow>()
            .one(&self.db)
            .await?;
        let (opening_debit, opening_credit) = prior.map_or(
            (Decimal::ZERO, Decimal::ZERO),
            |row| (row.total_debit, row.total_credit),
        );
        let opening_balance = account_type.net_balance(opening_debit, opening_credit);

        let rows: Vec<LedgerLineRow> = gl_entries::Entity::find()
            .filter(gl_entries::Column::AccountId.eq(account.id))
            .filter(gl_entries::Column::TransactionDate.gte(start))
            .filter(gl_entries::Column::TransactionDate.lte(end))
            .join(JoinType::InnerJoin, gl_entries::Relation::JournalEntries.def())
            .column_as(journal_entries::Column::Description, "jrn_description")
            .column_as(journal_entries::Column::ReferenceType, "jrn_reference_type")
            .order_by_asc(gl_entries::Column::TransactionDate)
            .order_by_asc(gl_entries::Column::CreatedAt)
            .into_model::<LedgerLineRow>()
            .all(&self.db)
            .await?;

        let lines: Vec<JournalLineRecord> = rows
            .into_iter()
            .map(|row| JournalLineRecord {
                journal_id: row.journal_id,
                date: row.transaction_date,
                description: row.jrn_description,
                reference_type: row.jrn_reference_type.into(),
                debit: row.debit,
                credit: row.credit,
            })
            .collect();

        let meta = LedgerAccountMeta {
            account_id: account.id,
            code: account.code,
            name: account.name,
            account_type,
        };
        Ok(build_account_ledger(
            meta,
            start,
            end,
            opening_balance,
            lines,
        ))
    }

    /// Loads per-account `SUM(debit), SUM(credit)` for lines dated within
    /// the window. The aggregation runs in the database, grouped by account.
    ///
    /// Accounts with no activity in the window are omitted. Rows keep
    /// account-code order for stable statement output.
    async fn activity(
        &self,
        business_id: Uuid,
        from: Option<NaiveDate>,
        to: NaiveDate,
    ) -> Result<Vec<AccountActivity>, StatementError> {
        let account_rows = accounts::Entity::find()
            .filter(accounts::Column::BusinessId.eq(business_id))
            .order_by_asc(accounts::Column::Code)
            .all(&self.db)
            .await?;

        let mut query = gl_entries::Entity::find()
            .select_only()
            .column(gl_entries::Column::AccountId)
            .column_as(gl_entries::Column::Debit.sum(), "total_debit")
            .column_as(gl_entries::Column::Credit.sum(), "total_credit")
            .filter(gl_entries::Column::BusinessId.eq(business_id))
            .filter(gl_entries::Column::TransactionDate.lte(to));
        if let Some(from) = from {
            query = query.filter(gl_entries::Column::TransactionDate.gte(from));
        }
        let rows = query
            .group_by(gl_entries::Column::AccountId)
            .into_model::<ActivityRow>()
            .all(&self.db)
            .await?;
        let totals: HashMap<Uuid, (Decimal, Decimal)> = rows
            .into_iter()
            .map(|row| (row.account_id, (row.total_debit, row.total_credit)))
            .collect();

        let activity = account_rows
            .into_iter()
            .filter_map(|account| {
                totals
                    .get(&account.id)
                    .map(|&(total_debit, total_credit)| AccountActivity {
                        account_id: account.id,
                        code: account.code,
                        name: account.name,
                        account_type: account.account_type.into(),
                        total_debit,
                        total_credit,
                    })
            })
            .collect();
        Ok(activity)
    }
}
