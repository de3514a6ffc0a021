//! Ledger domain types for journal creation and validation.
//!
//! This module defines the types used for building and validating journals
//! in the double-entry bookkeeping system.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::chart::AccountRole;

/// Largest debit/credit mismatch still treated as balanced.
///
/// Amounts are fixed-point decimals, so the engine itself never drifts; the
/// tolerance absorbs sub-cent rounding in caller-computed line amounts
/// (e.g. a tax split of an odd total).
pub const BALANCE_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Entry type: either Debit or Credit.
///
/// In double-entry bookkeeping:
/// - Debits increase asset/expense accounts, decrease liability/equity/income accounts
/// - Credits decrease asset/expense accounts, increase liability/equity/income accounts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    /// Debit entry.
    Debit,
    /// Credit entry.
    Credit,
}

/// The kind of business document a journal was posted for.
///
/// Together with the document ID this forms the back-pointer the Reversal
/// Handler looks journals up by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceType {
    /// Manual/general journal entry.
    Journal,
    /// Sales invoice.
    Invoice,
    /// Purchase order / vendor bill.
    Purchase,
    /// Expense record.
    Expense,
    /// Standalone customer receipt or vendor payment.
    Payment,
    /// Manufacturing production order.
    ProductionOrder,
    /// Point-of-sale checkout.
    PosSale,
}

impl ReferenceType {
    /// Returns the snake_case storage name of this reference type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Journal => "journal",
            Self::Invoice => "invoice",
            Self::Purchase => "purchase",
            Self::Expense => "expense",
            Self::Payment => "payment",
            Self::ProductionOrder => "production_order",
            Self::PosSale => "pos_sale",
        }
    }

    /// Parses the snake_case storage name.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "journal" => Some(Self::Journal),
            "invoice" => Some(Self::Invoice),
            "purchase" => Some(Self::Purchase),
            "expense" => Some(Self::Expense),
            "payment" => Some(Self::Payment),
            "production_order" => Some(Self::ProductionOrder),
            "pos_sale" => Some(Self::PosSale),
            _ => None,
        }
    }
}

impl std::fmt::Display for ReferenceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Input for a single journal line.
///
/// A line is one-sided by construction: it carries an entry type and a
/// positive amount, and the storage layer writes the amount into the debit
/// or credit column accordingly. Raw debit/credit totals stay auditable
/// because amounts are never netted into a signed field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JournalLineInput {
    /// Stable code of the account to post to.
    pub account_code: String,
    /// Whether this is a debit or credit line.
    pub entry_type: EntryType,
    /// The amount (must be positive).
    pub amount: Decimal,
}

impl JournalLineInput {
    /// Builds a debit line against an account role.
    #[must_use]
    pub fn debit(role: AccountRole, amount: Decimal) -> Self {
        Self::debit_code(role.code(), amount)
    }

    /// Builds a credit line against an account role.
    #[must_use]
    pub fn credit(role: AccountRole, amount: Decimal) -> Self {
        Self::credit_code(role.code(), amount)
    }

    /// Builds a debit line against a literal account code.
    #[must_use]
    pub fn debit_code(code: impl Into<String>, amount: Decimal) -> Self {
        Self {
            account_code: code.into(),
            entry_type: EntryType::Debit,
            amount,
        }
    }

    /// Builds a credit line against a literal account code.
    #[must_use]
    pub fn credit_code(code: impl Into<String>, amount: Decimal) -> Self {
        Self {
            account_code: code.into(),
            entry_type: EntryType::Credit,
            amount,
        }
    }

    /// Returns the (debit, credit) column values for this line.
    #[must_use]
    pub fn as_columns(&self) -> (Decimal, Decimal) {
        match self.entry_type {
            EntryType::Debit => (self.amount, Decimal::ZERO),
            EntryType::Credit => (Decimal::ZERO, self.amount),
        }
    }
}

/// Input for posting a new journal.
///
/// Carries everything the Journal Poster needs: the tenant, the document
/// back-pointer, and the lines.
#[derive(Debug, Clone)]
pub struct PostJournalInput {
    /// The business this journal belongs to.
    pub business_id: Uuid,
    /// The transaction date recorded on every line.
    pub date: NaiveDate,
    /// A description of the business event.
    pub description: String,
    /// The kind of originating document.
    pub reference_type: ReferenceType,
    /// The originating document's ID.
    pub reference_id: Uuid,
    /// The journal lines (must have at least 2).
    pub lines: Vec<JournalLineInput>,
    /// The user posting the journal.
    pub created_by: Uuid,
}

/// Journal totals for validation and display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JournalTotals {
    /// Total debit amount.
    pub debit: Decimal,
    /// Total credit amount.
    pub credit: Decimal,
    /// Whether debits equal credits within [`BALANCE_TOLERANCE`].
    pub is_balanced: bool,
}

impl JournalTotals {
    /// Creates journal totals from debit and credit sums.
    #[must_use]
    pub fn new(debit: Decimal, credit: Decimal) -> Self {
        Self {
            debit,
            credit,
            is_balanced: (debit - credit).abs() < BALANCE_TOLERANCE,
        }
    }

    /// Returns the difference between debits and credits.
    #[must_use]
    pub fn difference(&self) -> Decimal {
        self.debit - self.credit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_tolerance_constant_is_one_cent() {
        assert_eq!(BALANCE_TOLERANCE, dec!(0.01));
    }

    #[test]
    fn test_totals_balanced() {
        let totals = JournalTotals::new(dec!(100.00), dec!(100.00));
        assert!(totals.is_balanced);
        assert_eq!(totals.difference(), Decimal::ZERO);
    }

    #[test]
    fn test_totals_balanced_within_tolerance() {
        // Sub-cent mismatch is absorbed, a full cent is not.
        assert!(JournalTotals::new(dec!(100.005), dec!(100.00)).is_balanced);
        assert!(!JournalTotals::new(dec!(100.01), dec!(100.00)).is_balanced);
    }

    #[test]
    fn test_totals_unbalanced() {
        let totals = JournalTotals::new(dec!(100.00), dec!(50.00));
        assert!(!totals.is_balanced);
        assert_eq!(totals.difference(), dec!(50.00));
    }

    #[test]
    fn test_line_columns_are_one_sided() {
        let debit = JournalLineInput::debit(AccountRole::Cash, dec!(118.00));
        assert_eq!(debit.as_columns(), (dec!(118.00), Decimal::ZERO));
        assert_eq!(debit.account_code, "1000");

        let credit = JournalLineInput::credit(AccountRole::SalesRevenue, dec!(100.00));
        assert_eq!(credit.as_columns(), (Decimal::ZERO, dec!(100.00)));
        assert_eq!(credit.account_code, "4000");
    }

    #[test]
    fn test_reference_type_round_trip() {
        for rt in [
            ReferenceType::Journal,
            ReferenceType::Invoice,
            ReferenceType::Purchase,
            ReferenceType::Expense,
            ReferenceType::Payment,
            ReferenceType::ProductionOrder,
            ReferenceType::PosSale,
        ] {
            assert_eq!(ReferenceType::parse(rt.as_str()), Some(rt));
        }
        assert_eq!(ReferenceType::parse("credit_note"), None);
    }
}
