//! Property-based tests for journal validation rules.

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::types::{EntryType, JournalLineInput};
use super::validation::validate_lines;
use super::LedgerError;

/// Strategy to generate a valid positive amount (0.01 to 1,000,000.00).
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate an entry type.
fn entry_type_strategy() -> impl Strategy<Value = EntryType> {
    prop_oneof![Just(EntryType::Debit), Just(EntryType::Credit)]
}

fn make_line(entry_type: EntryType, amount: Decimal) -> JournalLineInput {
    let code = match entry_type {
        EntryType::Debit => "1000",
        EntryType::Credit => "4000",
    };
    JournalLineInput {
        account_code: code.to_string(),
        entry_type,
        amount,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Property 1.1: A debit/credit pair of equal amounts is always accepted.
    #[test]
    fn prop_balanced_pair_accepted(amount in positive_amount()) {
        let lines = vec![
            make_line(EntryType::Debit, amount),
            make_line(EntryType::Credit, amount),
        ];

        let result = validate_lines(&lines);
        prop_assert!(result.is_ok(), "balanced pair rejected: {:?}", result);

        let totals = result.unwrap();
        prop_assert_eq!(totals.debit, amount);
        prop_assert_eq!(totals.credit, amount);
    }

    /// Property 1.2: Splitting one side across several lines never changes
    /// acceptance - debits summing to the credit total are accepted.
    #[test]
    fn prop_split_debits_accepted(
        amount1 in positive_amount(),
        amount2 in positive_amount(),
    ) {
        let lines = vec![
            make_line(EntryType::Debit, amount1),
            make_line(EntryType::Debit, amount2),
            make_line(EntryType::Credit, amount1 + amount2),
        ];

        prop_assert!(validate_lines(&lines).is_ok());
    }

    /// Property 1.3: Any mismatch of at least one cent is rejected, and the
    /// error reports the exact totals.
    #[test]
    fn prop_cent_or_more_mismatch_rejected(
        amount in positive_amount(),
        shortfall_cents in 1i64..10_000i64,
    ) {
        let shortfall = Decimal::new(shortfall_cents, 2);
        let lines = vec![
            make_line(EntryType::Debit, amount + shortfall),
            make_line(EntryType::Credit, amount),
        ];

        match validate_lines(&lines) {
            Err(LedgerError::UnbalancedEntry { debit, credit }) => {
                prop_assert_eq!(debit, amount + shortfall);
                prop_assert_eq!(credit, amount);
            }
            other => prop_assert!(false, "expected UnbalancedEntry, got {:?}", other),
        }
    }

    /// Property 1.4: A mismatch strictly below the tolerance is absorbed.
    #[test]
    fn prop_sub_tolerance_mismatch_accepted(
        amount in positive_amount(),
        drift_tenths_of_cent in 1i64..10i64,
    ) {
        // 0.001 ..= 0.009, always strictly below the 0.01 tolerance.
        let drift = Decimal::new(drift_tenths_of_cent, 3);

        let lines = vec![
            make_line(EntryType::Debit, amount + drift),
            make_line(EntryType::Credit, amount),
        ];

        prop_assert!(validate_lines(&lines).is_ok());
    }

    /// Property 1.5: Zero-amount lines are rejected regardless of position.
    #[test]
    fn prop_zero_amount_rejected(
        entry_type in entry_type_strategy(),
        other_amount in positive_amount(),
    ) {
        let lines = vec![
            make_line(entry_type, Decimal::ZERO),
            make_line(
                if entry_type == EntryType::Debit { EntryType::Credit } else { EntryType::Debit },
                other_amount,
            ),
        ];

        prop_assert!(matches!(validate_lines(&lines), Err(LedgerError::ZeroAmount)));
    }

    /// Property 1.6: Negative-amount lines are rejected.
    #[test]
    fn prop_negative_amount_rejected(
        entry_type in entry_type_strategy(),
        cents in 1i64..100_000_000i64,
        other_amount in positive_amount(),
    ) {
        let lines = vec![
            make_line(entry_type, Decimal::new(-cents, 2)),
            make_line(
                if entry_type == EntryType::Debit { EntryType::Credit } else { EntryType::Debit },
                other_amount,
            ),
        ];

        prop_assert!(matches!(validate_lines(&lines), Err(LedgerError::NegativeAmount)));
    }

    /// Property 1.7: A single line is never enough, whatever its side or amount.
    #[test]
    fn prop_single_line_rejected(
        entry_type in entry_type_strategy(),
        amount in positive_amount(),
    ) {
        let lines = vec![make_line(entry_type, amount)];

        let result = validate_lines(&lines);
        prop_assert!(
            matches!(result, Err(LedgerError::InsufficientLines { count: 1 })),
            "expected InsufficientLines, got {:?}",
            result
        );
    }
}
