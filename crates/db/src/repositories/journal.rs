//! Journal repository: the transactional posting and reversal core.
//!
//! `post` validates and persists one balanced journal (header plus lines);
//! `reverse` deletes every journal tagged with a document reference and
//! reports the removed per-account totals so the caller can undo any
//! denormalized counters. Both are transaction participants: the caller
//! owns begin/commit, so a failing posting rolls the whole business event
//! back.

use std::collections::HashMap;

use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    QueryFilter, Set,
};
use uuid::Uuid;

use khata_core::ledger::{validate_lines, LedgerError, PostJournalInput, ReferenceType};

use crate::entities::{accounts, gl_entries, journal_entries};

/// Error types for journal operations.
#[derive(Debug, thiserror::Error)]
pub enum JournalError {
    /// Validation or account-resolution failure; the caller must roll back.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl JournalError {
    /// Returns the stable error code for logs and CLI output.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Ledger(err) => err.error_code(),
            Self::Database(_) => "DATABASE_ERROR",
        }
    }
}

/// Net amounts removed from one account by a reversal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReversedAccountTotal {
    /// The account the lines posted to.
    pub account_id: Uuid,
    /// The account's stable code.
    pub account_code: String,
    /// Total debit removed.
    pub total_debit: Decimal,
    /// Total credit removed.
    pub total_credit: Decimal,
}

/// Journal repository for posting and reversing balanced entries.
#[derive(Debug, Clone)]
pub struct JournalRepository {
    db: DatabaseConnection,
}

impl JournalRepository {
    /// Creates a new journal repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Posts a balanced journal inside the caller's transaction.
    ///
    /// Validates shape and balance, resolves every line's account code for
    /// the business, then inserts one header row and all line rows. Nothing
    /// persists if any step fails and the caller rolls back.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::UnbalancedEntry`] (and the other shape errors)
    /// from validation, [`LedgerError::AccountNotFound`] for an unresolvable
    /// code, or a database error.
    pub async fn post(
        &self,
        txn: &DatabaseTransaction,
        input: PostJournalInput,
    ) -> Result<Uuid, JournalError> {
        let totals = validate_lines(&input.lines)?;

        // One query resolves every distinct code on the journal.
        let mut codes: Vec<String> = input
            .lines
            .iter()
            .map(|line| line.account_code.clone())
            .collect();
        codes.sort_unstable();
        codes.dedup();

        let account_rows = accounts::Entity::find()
            .filter(accounts::Column::BusinessId.eq(input.business_id))
            .filter(accounts::Column::Code.is_in(codes.clone()))
            .all(txn)
            .await?;
        let by_code: HashMap<String, Uuid> = account_rows
            .into_iter()
            .map(|row| (row.code, row.id))
            .collect();
        for code in &codes {
            if !by_code.contains_key(code) {
                return Err(LedgerError::AccountNotFound { code: code.clone() }.into());
            }
        }

        let journal_id = Uuid::new_v4();
        let now = chrono::Utc::now().into();
        journal_entries::ActiveModel {
            id: Set(journal_id),
            business_id: Set(input.business_id),
            entry_date: Set(input.date),
            description: Set(input.description.clone()),
            reference_type: Set(input.reference_type.into()),
            reference_id: Set(input.reference_id),
            created_by: Set(input.created_by),
            created_at: Set(now),
        }
        .insert(txn)
        .await?;

        let lines: Vec<gl_entries::ActiveModel> = input
            .lines
            .iter()
            .map(|line| {
                let (debit, credit) = line.as_columns();
                gl_entries::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    journal_id: Set(journal_id),
                    business_id: Set(input.business_id),
                    account_id: Set(by_code[&line.account_code]),
                    transaction_date: Set(input.date),
                    debit: Set(debit),
                    credit: Set(credit),
                    created_at: Set(now),
                }
            })
            .collect();
        gl_entries::Entity::insert_many(lines).exec(txn).await?;

        tracing::info!(
            business_id = %input.business_id,
            journal_id = %journal_id,
            reference_type = %input.reference_type,
            reference_id = %input.reference_id,
            debit = %totals.debit,
            credit = %totals.credit,
            "journal posted"
        );
        Ok(journal_id)
    }

    /// Deletes every journal tagged with a document reference.
    ///
    /// Returns the per-account net amounts that were removed, so the caller
    /// can apply the inverse adjustment to denormalized counters. Zero
    /// matching journals is a success returning an empty vec: deleting a
    /// draft that never posted must not fail.
    ///
    /// # Errors
    ///
    /// Returns an error if a database operation fails.
    pub async fn reverse(
        &self,
        txn: &DatabaseTransaction,
        business_id: Uuid,
        reference_type: ReferenceType,
        reference_id: Uuid,
    ) -> Result<Vec<ReversedAccountTotal>, JournalError> {
        let headers = journal_entries::Entity::find()
            .filter(journal_entries::Column::BusinessId.eq(business_id))
            .filter(journal_entries::Column::ReferenceType.eq(
                crate::entities::sea_orm_active_enums::ReferenceType::from(reference_type),
            ))
            .filter(journal_entries::Column::ReferenceId.eq(reference_id))
            .all(txn)
            .await?;
        if headers.is_empty() {
            return Ok(Vec::new());
        }

        let journal_ids: Vec<Uuid> = headers.iter().map(|h| h.id).collect();
        let lines = gl_entries::Entity::find()
            .filter(gl_entries::Column::JournalId.is_in(journal_ids.clone()))
            .all(txn)
            .await?;

        let account_ids: Vec<Uuid> = lines.iter().map(|line| line.account_id).collect();
        let account_rows = accounts::Entity::find()
            .filter(accounts::Column::Id.is_in(account_ids))
            .all(txn)
            .await?;
        let code_of: HashMap<Uuid, String> = account_rows
            .into_iter()
            .map(|row| (row.id, row.code))
            .collect();

        let removed = aggregate_removed(
            lines
                .iter()
                .map(|line| (line.account_id, line.debit, line.credit)),
            &code_of,
        );

        let journal_count = journal_ids.len();
        gl_entries::Entity::delete_many()
            .filter(gl_entries::Column::JournalId.is_in(journal_ids.clone()))
            .exec(txn)
            .await?;
        journal_entries::Entity::delete_many()
            .filter(journal_entries::Column::Id.is_in(journal_ids))
            .exec(txn)
            .await?;

        tracing::info!(
            %business_id,
            reference_type = %reference_type,
            %reference_id,
            journals = journal_count,
            "journals reversed"
        );
        Ok(removed)
    }
}

/// Folds raw line rows into per-account removed totals, ordered by code.
///
/// Accounts missing from `code_of` are skipped; the schema's foreign key
/// makes that unreachable for rows read back from the database.
fn aggregate_removed(
    lines: impl Iterator<Item = (Uuid, Decimal, Decimal)>,
    code_of: &HashMap<Uuid, String>,
) -> Vec<ReversedAccountTotal> {
    let mut by_account: HashMap<Uuid, (Decimal, Decimal)> = HashMap::new();
    for (account_id, debit, credit) in lines {
        let entry = by_account
            .entry(account_id)
            .or_insert((Decimal::ZERO, Decimal::ZERO));
        entry.0 += debit;
        entry.1 += credit;
    }

    let mut removed: Vec<ReversedAccountTotal> = by_account
        .into_iter()
        .filter_map(|(account_id, (total_debit, total_credit))| {
            code_of.get(&account_id).map(|code| ReversedAccountTotal {
                account_id,
                account_code: code.clone(),
                total_debit,
                total_credit,
            })
        })
        .collect();
    removed.sort_by(|a, b| a.account_code.cmp(&b.account_code));
    removed
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn codes(pairs: &[(Uuid, &str)]) -> HashMap<Uuid, String> {
        pairs
            .iter()
            .map(|(id, code)| (*id, (*code).to_string()))
            .collect()
    }

    #[test]
    fn test_aggregate_sums_lines_per_account() {
        let cash = Uuid::from_u128(1);
        let sales = Uuid::from_u128(2);
        let code_of = codes(&[(cash, "1000"), (sales, "4000")]);

        // Two journals both touched cash.
        let lines = vec![
            (cash, dec!(118.00), Decimal::ZERO),
            (sales, Decimal::ZERO, dec!(118.00)),
            (cash, dec!(50.00), Decimal::ZERO),
            (sales, Decimal::ZERO, dec!(50.00)),
        ];

        let removed = aggregate_removed(lines.into_iter(), &code_of);
        assert_eq!(removed.len(), 2);
        assert_eq!(removed[0].account_code, "1000");
        assert_eq!(removed[0].total_debit, dec!(168.00));
        assert_eq!(removed[0].total_credit, Decimal::ZERO);
        assert_eq!(removed[1].account_code, "4000");
        assert_eq!(removed[1].total_credit, dec!(168.00));
    }

    #[test]
    fn test_aggregate_orders_by_code() {
        let a = Uuid::from_u128(10);
        let b = Uuid::from_u128(11);
        let c = Uuid::from_u128(12);
        let code_of = codes(&[(a, "6000"), (b, "1300"), (c, "2000")]);

        let lines = vec![
            (a, dec!(100.00), Decimal::ZERO),
            (b, dec!(18.00), Decimal::ZERO),
            (c, Decimal::ZERO, dec!(118.00)),
        ];

        let removed = aggregate_removed(lines.into_iter(), &code_of);
        let order: Vec<&str> = removed.iter().map(|r| r.account_code.as_str()).collect();
        assert_eq!(order, vec!["1300", "2000", "6000"]);
    }

    #[test]
    fn test_aggregate_empty_is_empty() {
        let removed = aggregate_removed(std::iter::empty(), &HashMap::new());
        assert!(removed.is_empty());
    }

    #[test]
    fn test_aggregate_keeps_both_sides_separate() {
        // An account debited by one journal and credited by another keeps
        // raw totals on both sides rather than a netted figure.
        let ar = Uuid::from_u128(7);
        let code_of = codes(&[(ar, "1100")]);

        let lines = vec![
            (ar, dec!(1180.00), Decimal::ZERO),
            (ar, Decimal::ZERO, dec!(1180.00)),
        ];

        let removed = aggregate_removed(lines.into_iter(), &code_of);
        assert_eq!(removed.len(), 1);
        assert_eq!(removed[0].total_debit, dec!(1180.00));
        assert_eq!(removed[0].total_credit, dec!(1180.00));
    }
}
