//! Shape and balance validation for journal lines.

use rust_decimal::Decimal;

use super::error::LedgerError;
use super::types::{EntryType, JournalLineInput, JournalTotals};

/// Validates a set of journal lines before posting.
///
/// Checks, in order:
/// 1. At least 2 lines
/// 2. Every amount is positive and non-zero
/// 3. Total debits equal total credits within [`super::BALANCE_TOLERANCE`]
///
/// A violation means the enclosing transaction must roll back; the poster
/// never persists a partial journal.
///
/// # Errors
///
/// Returns [`LedgerError::InsufficientLines`], [`LedgerError::ZeroAmount`],
/// [`LedgerError::NegativeAmount`], or [`LedgerError::UnbalancedEntry`].
///
/// # Returns
///
/// The computed totals on success, so the caller can log or display them
/// without re-summing.
pub fn validate_lines(lines: &[JournalLineInput]) -> Result<JournalTotals, LedgerError> {
    if lines.len() < 2 {
        return Err(LedgerError::InsufficientLines { count: lines.len() });
    }

    let mut total_debit = Decimal::ZERO;
    let mut total_credit = Decimal::ZERO;

    for line in lines {
        if line.amount == Decimal::ZERO {
            return Err(LedgerError::ZeroAmount);
        }
        if line.amount < Decimal::ZERO {
            return Err(LedgerError::NegativeAmount);
        }

        match line.entry_type {
            EntryType::Debit => total_debit += line.amount,
            EntryType::Credit => total_credit += line.amount,
        }
    }

    let totals = JournalTotals::new(total_debit, total_credit);
    if !totals.is_balanced {
        return Err(LedgerError::UnbalancedEntry {
            debit: totals.debit,
            credit: totals.credit,
        });
    }

    Ok(totals)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::AccountRole;
    use rust_decimal_macros::dec;

    #[test]
    fn test_balanced_pair_accepted() {
        let lines = vec![
            JournalLineInput::debit(AccountRole::InventoryAsset, dec!(5000.00)),
            JournalLineInput::credit(AccountRole::AccountsPayable, dec!(5000.00)),
        ];
        let totals = validate_lines(&lines).unwrap();
        assert!(totals.is_balanced);
        assert_eq!(totals.debit, dec!(5000.00));
        assert_eq!(totals.credit, dec!(5000.00));
    }

    #[test]
    fn test_three_line_split_accepted() {
        // Expense with input-tax split paid in cash.
        let lines = vec![
            JournalLineInput::debit(AccountRole::OperatingExpense, dec!(100.00)),
            JournalLineInput::debit(AccountRole::InputTaxCredit, dec!(18.00)),
            JournalLineInput::credit(AccountRole::Cash, dec!(118.00)),
        ];
        let totals = validate_lines(&lines).unwrap();
        assert_eq!(totals.debit, dec!(118.00));
        assert_eq!(totals.credit, dec!(118.00));
    }

    #[test]
    fn test_unbalanced_rejected_with_totals() {
        let lines = vec![
            JournalLineInput::debit(AccountRole::Cash, dec!(100.00)),
            JournalLineInput::credit(AccountRole::SalesRevenue, dec!(50.00)),
        ];
        match validate_lines(&lines) {
            Err(LedgerError::UnbalancedEntry { debit, credit }) => {
                assert_eq!(debit, dec!(100.00));
                assert_eq!(credit, dec!(50.00));
            }
            other => panic!("expected UnbalancedEntry, got {other:?}"),
        }
    }

    #[test]
    fn test_sub_cent_mismatch_accepted() {
        let lines = vec![
            JournalLineInput::debit(AccountRole::Cash, dec!(100.004)),
            JournalLineInput::credit(AccountRole::SalesRevenue, dec!(100.00)),
        ];
        assert!(validate_lines(&lines).is_ok());
    }

    #[test]
    fn test_single_line_rejected() {
        let lines = vec![JournalLineInput::debit(AccountRole::Cash, dec!(100.00))];
        assert!(matches!(
            validate_lines(&lines),
            Err(LedgerError::InsufficientLines { count: 1 })
        ));
    }

    #[test]
    fn test_empty_rejected() {
        assert!(matches!(
            validate_lines(&[]),
            Err(LedgerError::InsufficientLines { count: 0 })
        ));
    }

    #[test]
    fn test_zero_amount_rejected() {
        let lines = vec![
            JournalLineInput::debit(AccountRole::Cash, Decimal::ZERO),
            JournalLineInput::credit(AccountRole::SalesRevenue, dec!(100.00)),
        ];
        assert!(matches!(
            validate_lines(&lines),
            Err(LedgerError::ZeroAmount)
        ));
    }

    #[test]
    fn test_negative_amount_rejected() {
        let lines = vec![
            JournalLineInput::debit(AccountRole::Cash, dec!(-100.00)),
            JournalLineInput::credit(AccountRole::SalesRevenue, dec!(100.00)),
        ];
        assert!(matches!(
            validate_lines(&lines),
            Err(LedgerError::NegativeAmount)
        ));
    }
}
