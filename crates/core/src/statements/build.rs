//! Statement builders.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::types::{
    AccountActivity, AccountLedger, AccountLedgerLine, BalanceSheet, JournalLineRecord,
    LedgerAccountMeta, ProfitAndLoss, StatementLine, StatementSection, TrialBalance,
    TrialBalanceRow,
};
use crate::chart::{AccountRole, AccountType};
use crate::ledger::BALANCE_TOLERANCE;

/// Builds a trial balance from per-account totals through `as_of`.
///
/// Rows keep the input order (the storage layer orders by account code).
#[must_use]
pub fn build_trial_balance(as_of: NaiveDate, activity: Vec<AccountActivity>) -> TrialBalance {
    let total_debit: Decimal = activity.iter().map(|a| a.total_debit).sum();
    let total_credit: Decimal = activity.iter().map(|a| a.total_credit).sum();
    let discrepancy = (total_debit - total_credit).abs();

    let rows = activity
        .into_iter()
        .map(|a| {
            let net_balance = a.net_balance();
            TrialBalanceRow {
                account_id: a.account_id,
                code: a.code,
                name: a.name,
                account_type: a.account_type,
                total_debit: a.total_debit,
                total_credit: a.total_credit,
                net_balance,
            }
        })
        .collect();

    TrialBalance {
        as_of,
        rows,
        total_debit,
        total_credit,
        balanced: discrepancy < BALANCE_TOLERANCE,
        discrepancy,
    }
}

/// Builds a profit & loss statement from period activity.
///
/// Income and expense accounts are netted per sign convention; the account
/// carrying the cost-of-goods-sold code is split out so gross profit is
/// visible. Accounts of other types in the input are ignored.
#[must_use]
pub fn build_profit_and_loss(
    period_start: NaiveDate,
    period_end: NaiveDate,
    activity: Vec<AccountActivity>,
) -> ProfitAndLoss {
    let mut income = StatementSection::default();
    let mut cost_of_goods_sold = StatementSection::default();
    let mut expenses = StatementSection::default();

    for account in activity {
        let line = to_line(&account);
        match account.account_type {
            AccountType::Income => income.push(line),
            AccountType::Expense => {
                if account.code == AccountRole::CostOfGoodsSold.code() {
                    cost_of_goods_sold.push(line);
                } else {
                    expenses.push(line);
                }
            }
            _ => {}
        }
    }

    let gross_profit = income.total - cost_of_goods_sold.total;
    let net_income = gross_profit - expenses.total;

    ProfitAndLoss {
        period_start,
        period_end,
        income,
        cost_of_goods_sold,
        gross_profit,
        expenses,
        net_income,
    }
}

/// Builds a balance sheet from lifetime activity through `as_of`.
///
/// The input must cover all history up to the as-of date: retained earnings
/// is folded from the income and expense totals in the same pass, so a
/// partial window would misstate equity.
#[must_use]
pub fn build_balance_sheet(as_of: NaiveDate, activity: Vec<AccountActivity>) -> BalanceSheet {
    let mut assets = StatementSection::default();
    let mut liabilities = StatementSection::default();
    let mut equity = StatementSection::default();
    let mut retained_earnings = Decimal::ZERO;

    for account in activity {
        let line = to_line(&account);
        match account.account_type {
            AccountType::Asset => assets.push(line),
            AccountType::Liability => liabilities.push(line),
            AccountType::Equity => equity.push(line),
            // Income and expense nets roll into retained earnings instead
            // of appearing as sections.
            AccountType::Income => retained_earnings += line.amount,
            AccountType::Expense => retained_earnings -= line.amount,
        }
    }

    let total_assets = assets.total;
    let total_liabilities = liabilities.total;
    let total_equity = equity.total + retained_earnings;
    let liabilities_and_equity = total_liabilities + total_equity;
    let discrepancy = (total_assets - liabilities_and_equity).abs();

    BalanceSheet {
        as_of,
        assets,
        liabilities,
        equity,
        retained_earnings,
        total_assets,
        total_liabilities,
        total_equity,
        liabilities_and_equity,
        balanced: discrepancy < BALANCE_TOLERANCE,
        discrepancy,
    }
}

/// Builds an account ledger drill-down with a running balance.
///
/// `lines` must be sorted oldest-first; the running balance folds each line
/// onto `opening_balance` per the account's sign convention.
#[must_use]
pub fn build_account_ledger(
    account: LedgerAccountMeta,
    period_start: NaiveDate,
    period_end: NaiveDate,
    opening_balance: Decimal,
    lines: Vec<JournalLineRecord>,
) -> AccountLedger {
    let mut running = opening_balance;
    let ledger_lines = lines
        .into_iter()
        .map(|line| {
            running += account.account_type.net_balance(line.debit, line.credit);
            AccountLedgerLine {
                journal_id: line.journal_id,
                date: line.date,
                description: line.description,
                reference_type: line.reference_type,
                debit: line.debit,
                credit: line.credit,
                running_balance: running,
            }
        })
        .collect();

    AccountLedger {
        account,
        period_start,
        period_end,
        opening_balance,
        lines: ledger_lines,
        closing_balance: running,
    }
}

fn to_line(account: &AccountActivity) -> StatementLine {
    StatementLine {
        account_id: account.account_id,
        code: account.code.clone(),
        name: account.name.clone(),
        amount: account.net_balance(),
    }
}
