//! Financial statement assembly.
//!
//! Pure builders that turn per-account debit/credit totals into the three
//! statements (trial balance, profit & loss, balance sheet) plus the
//! per-account ledger drill-down. The database layer aggregates the raw
//! sums; everything sign-convention-shaped happens here.
//!
//! An out-of-balance statement is data, not an error: the reports carry a
//! `balanced` flag and the exact discrepancy so an auditor can see and chase
//! it.

pub mod build;
pub mod types;

#[cfg(test)]
mod tests;

pub use build::{
    build_account_ledger, build_balance_sheet, build_profit_and_loss, build_trial_balance,
};
pub use types::{
    AccountActivity, AccountLedger, AccountLedgerLine, BalanceSheet, JournalLineRecord,
    LedgerAccountMeta, ProfitAndLoss, StatementLine, StatementSection, TrialBalance,
    TrialBalanceRow,
};
