//! Statement data types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::chart::AccountType;
use crate::ledger::ReferenceType;

/// Per-account debit/credit totals, as aggregated by the storage layer.
///
/// The date window the totals cover is the caller's contract: period
/// activity for a profit & loss, lifetime-through-as-of for a balance sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountActivity {
    /// Account ID.
    pub account_id: Uuid,
    /// Account code.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Account classification.
    pub account_type: AccountType,
    /// Total debit amount.
    pub total_debit: Decimal,
    /// Total credit amount.
    pub total_credit: Decimal,
}

impl AccountActivity {
    /// Net balance per the account type's sign convention.
    #[must_use]
    pub fn net_balance(&self) -> Decimal {
        self.account_type
            .net_balance(self.total_debit, self.total_credit)
    }
}

/// One row of a trial balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialBalanceRow {
    /// Account ID.
    pub account_id: Uuid,
    /// Account code.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Account classification.
    pub account_type: AccountType,
    /// Total debit amount.
    pub total_debit: Decimal,
    /// Total credit amount.
    pub total_credit: Decimal,
    /// Net balance per sign convention.
    pub net_balance: Decimal,
}

/// Trial balance report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialBalance {
    /// As-of date the totals run through.
    pub as_of: NaiveDate,
    /// Per-account rows.
    pub rows: Vec<TrialBalanceRow>,
    /// Grand total of debits.
    pub total_debit: Decimal,
    /// Grand total of credits.
    pub total_credit: Decimal,
    /// Whether debits equal credits within tolerance.
    pub balanced: bool,
    /// `|total_debit - total_credit|`, surfaced even when balanced.
    pub discrepancy: Decimal,
}

/// One account line inside a statement section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementLine {
    /// Account ID.
    pub account_id: Uuid,
    /// Account code.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Net amount for this statement.
    pub amount: Decimal,
}

/// A titled group of statement lines with its total.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementSection {
    /// Section total.
    pub total: Decimal,
    /// Account lines in this section.
    pub lines: Vec<StatementLine>,
}

impl StatementSection {
    /// Adds a line and folds its amount into the section total.
    pub fn push(&mut self, line: StatementLine) {
        self.total += line.amount;
        self.lines.push(line);
    }
}

/// Profit & loss report for a period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfitAndLoss {
    /// Period start (inclusive).
    pub period_start: NaiveDate,
    /// Period end (inclusive).
    pub period_end: NaiveDate,
    /// Income accounts.
    pub income: StatementSection,
    /// The cost-of-goods-sold account, separated from other expenses.
    pub cost_of_goods_sold: StatementSection,
    /// Gross profit (income - COGS).
    pub gross_profit: Decimal,
    /// All other expense accounts.
    pub expenses: StatementSection,
    /// Net income (gross profit - other expenses).
    pub net_income: Decimal,
}

/// Balance sheet report as of a date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceSheet {
    /// As-of date the balances run through.
    pub as_of: NaiveDate,
    /// Asset accounts.
    pub assets: StatementSection,
    /// Liability accounts.
    pub liabilities: StatementSection,
    /// Equity accounts (excluding retained earnings, which is computed).
    pub equity: StatementSection,
    /// Lifetime income minus expense through the as-of date.
    pub retained_earnings: Decimal,
    /// Total assets.
    pub total_assets: Decimal,
    /// Total liabilities.
    pub total_liabilities: Decimal,
    /// Equity accounts plus retained earnings.
    pub total_equity: Decimal,
    /// Liabilities plus equity.
    pub liabilities_and_equity: Decimal,
    /// Whether assets equal liabilities plus equity within tolerance.
    ///
    /// `false` here is a data-integrity fact about the ledger, not a
    /// rendering problem - some posting bypassed the invariants.
    pub balanced: bool,
    /// `|total_assets - liabilities_and_equity|`.
    pub discrepancy: Decimal,
}

/// Identity of the account a ledger drill-down is built for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerAccountMeta {
    /// Account ID.
    pub account_id: Uuid,
    /// Account code.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Account classification.
    pub account_type: AccountType,
}

/// One journal line touching an account, as loaded by the storage layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalLineRecord {
    /// Owning journal ID.
    pub journal_id: Uuid,
    /// Transaction date.
    pub date: NaiveDate,
    /// Journal description.
    pub description: String,
    /// Kind of originating document.
    pub reference_type: ReferenceType,
    /// Debit amount (0 if credit).
    pub debit: Decimal,
    /// Credit amount (0 if debit).
    pub credit: Decimal,
}

/// One row of an account ledger with the running balance after it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountLedgerLine {
    /// Owning journal ID.
    pub journal_id: Uuid,
    /// Transaction date.
    pub date: NaiveDate,
    /// Journal description.
    pub description: String,
    /// Kind of originating document.
    pub reference_type: ReferenceType,
    /// Debit amount.
    pub debit: Decimal,
    /// Credit amount.
    pub credit: Decimal,
    /// Balance after applying this line, per sign convention.
    pub running_balance: Decimal,
}

/// Per-account ledger drill-down over a period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountLedger {
    /// The account.
    pub account: LedgerAccountMeta,
    /// Period start (inclusive).
    pub period_start: NaiveDate,
    /// Period end (inclusive).
    pub period_end: NaiveDate,
    /// Net balance carried into the period.
    pub opening_balance: Decimal,
    /// Lines in the period, oldest first.
    pub lines: Vec<AccountLedgerLine>,
    /// Balance after the last line.
    pub closing_balance: Decimal,
}
