//! Statement builder tests over a small, fully-posted ledger world.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use uuid::Uuid;

use super::build::{
    build_account_ledger, build_balance_sheet, build_profit_and_loss, build_trial_balance,
};
use super::types::{AccountActivity, JournalLineRecord, LedgerAccountMeta};
use crate::chart::{AccountRole, AccountType};
use crate::ledger::ReferenceType;

fn activity(role: AccountRole, total_debit: Decimal, total_credit: Decimal) -> AccountActivity {
    AccountActivity {
        account_id: Uuid::new_v4(),
        code: role.code().to_string(),
        name: role.default_name().to_string(),
        account_type: role.account_type(),
        total_debit,
        total_credit,
    }
}

/// Activity after: 10,000 capital in cash; a 5,000 purchase on credit; a
/// credit sale of 1,000 + 180 tax with 650 COGS; a 118 cash expense split
/// 100 net + 18 input tax.
fn posted_world() -> Vec<AccountActivity> {
    vec![
        activity(AccountRole::Cash, dec!(10000.00), dec!(118.00)),
        activity(AccountRole::InventoryAsset, dec!(5000.00), dec!(650.00)),
        activity(AccountRole::AccountsReceivable, dec!(1180.00), dec!(0)),
        activity(AccountRole::InputTaxCredit, dec!(18.00), dec!(0)),
        activity(AccountRole::AccountsPayable, dec!(0), dec!(5000.00)),
        activity(AccountRole::SalesTaxPayable, dec!(0), dec!(180.00)),
        activity(AccountRole::OwnerEquity, dec!(0), dec!(10000.00)),
        activity(AccountRole::SalesRevenue, dec!(0), dec!(1000.00)),
        activity(AccountRole::CostOfGoodsSold, dec!(650.00), dec!(0)),
        activity(AccountRole::OperatingExpense, dec!(100.00), dec!(0)),
    ]
}

fn as_of() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 31).unwrap()
}

#[test]
fn test_trial_balance_totals_and_flag() {
    let tb = build_trial_balance(as_of(), posted_world());

    assert_eq!(tb.total_debit, dec!(16948.00));
    assert_eq!(tb.total_credit, dec!(16948.00));
    assert!(tb.balanced);
    assert_eq!(tb.discrepancy, Decimal::ZERO);
    assert_eq!(tb.rows.len(), 10);
}

#[test]
fn test_trial_balance_net_follows_sign_convention() {
    let tb = build_trial_balance(as_of(), posted_world());

    let row = |code: &str| tb.rows.iter().find(|r| r.code == code).unwrap();

    // Debit-normal: cash 10000 - 118.
    assert_eq!(row("1000").net_balance, dec!(9882.00));
    // Credit-normal: payable 5000 - 0.
    assert_eq!(row("2000").net_balance, dec!(5000.00));
    // Credit-normal income.
    assert_eq!(row("4000").net_balance, dec!(1000.00));
}

#[test]
fn test_trial_balance_surfaces_discrepancy() {
    // Drop the payable credit, as if an adapter wrote one-sided rows.
    let world: Vec<_> = posted_world()
        .into_iter()
        .filter(|a| a.code != AccountRole::AccountsPayable.code())
        .collect();

    let tb = build_trial_balance(as_of(), world);

    assert!(!tb.balanced);
    assert_eq!(tb.discrepancy, dec!(5000.00));
}

#[test]
fn test_profit_and_loss_splits_cogs() {
    let start = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
    let pnl = build_profit_and_loss(start, as_of(), posted_world());

    assert_eq!(pnl.income.total, dec!(1000.00));
    assert_eq!(pnl.cost_of_goods_sold.total, dec!(650.00));
    assert_eq!(pnl.gross_profit, dec!(350.00));
    assert_eq!(pnl.expenses.total, dec!(100.00));
    assert_eq!(pnl.net_income, dec!(250.00));

    // COGS never appears among the other expenses.
    assert!(pnl
        .expenses
        .lines
        .iter()
        .all(|l| l.code != AccountRole::CostOfGoodsSold.code()));
    assert_eq!(pnl.cost_of_goods_sold.lines.len(), 1);
}

#[test]
fn test_profit_and_loss_ignores_balance_accounts() {
    let start = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
    let pnl = build_profit_and_loss(start, as_of(), posted_world());

    let listed = pnl
        .income
        .lines
        .iter()
        .chain(&pnl.cost_of_goods_sold.lines)
        .chain(&pnl.expenses.lines)
        .count();
    // Only the one income and two expense accounts.
    assert_eq!(listed, 3);
}

#[test]
fn test_balance_sheet_equation_holds() {
    let bs = build_balance_sheet(as_of(), posted_world());

    assert_eq!(bs.total_assets, dec!(15430.00));
    assert_eq!(bs.total_liabilities, dec!(5180.00));
    // Lifetime income 1000 minus expenses 750.
    assert_eq!(bs.retained_earnings, dec!(250.00));
    assert_eq!(bs.total_equity, dec!(10250.00));
    assert_eq!(bs.liabilities_and_equity, dec!(15430.00));
    assert!(bs.balanced);
    assert_eq!(bs.discrepancy, Decimal::ZERO);
}

#[test]
fn test_balance_sheet_surfaces_discrepancy() {
    // Inflate an asset without a matching credit anywhere.
    let mut world = posted_world();
    for a in &mut world {
        if a.code == AccountRole::Cash.code() {
            a.total_debit += dec!(77.00);
        }
    }

    let bs = build_balance_sheet(as_of(), world);

    assert!(!bs.balanced);
    assert_eq!(bs.discrepancy, dec!(77.00));
}

#[test]
fn test_balance_sheet_lists_equity_accounts_without_retained_earnings() {
    let bs = build_balance_sheet(as_of(), posted_world());

    // The equity section holds the real accounts; retained earnings is a
    // computed figure, not a row.
    assert_eq!(bs.equity.total, dec!(10000.00));
    assert_eq!(bs.equity.lines.len(), 1);
    assert_eq!(bs.equity.lines[0].code, AccountRole::OwnerEquity.code());
}

#[test]
fn test_account_ledger_running_balance_debit_normal() {
    let meta = LedgerAccountMeta {
        account_id: Uuid::new_v4(),
        code: AccountRole::Cash.code().to_string(),
        name: AccountRole::Cash.default_name().to_string(),
        account_type: AccountType::Asset,
    };
    let day = |d: u32| NaiveDate::from_ymd_opt(2026, 2, d).unwrap();
    let lines = vec![
        JournalLineRecord {
            journal_id: Uuid::new_v4(),
            date: day(1),
            description: "Capital injection".to_string(),
            reference_type: ReferenceType::Journal,
            debit: dec!(10000.00),
            credit: dec!(0),
        },
        JournalLineRecord {
            journal_id: Uuid::new_v4(),
            date: day(3),
            description: "Office supplies".to_string(),
            reference_type: ReferenceType::Expense,
            debit: dec!(0),
            credit: dec!(118.00),
        },
    ];

    let ledger = build_account_ledger(meta, day(1), day(28), dec!(500.00), lines);

    assert_eq!(ledger.opening_balance, dec!(500.00));
    assert_eq!(ledger.lines[0].running_balance, dec!(10500.00));
    assert_eq!(ledger.lines[1].running_balance, dec!(10382.00));
    assert_eq!(ledger.closing_balance, dec!(10382.00));
}

#[test]
fn test_account_ledger_running_balance_credit_normal() {
    let meta = LedgerAccountMeta {
        account_id: Uuid::new_v4(),
        code: AccountRole::AccountsPayable.code().to_string(),
        name: AccountRole::AccountsPayable.default_name().to_string(),
        account_type: AccountType::Liability,
    };
    let day = |d: u32| NaiveDate::from_ymd_opt(2026, 2, d).unwrap();
    let lines = vec![
        JournalLineRecord {
            journal_id: Uuid::new_v4(),
            date: day(2),
            description: "Vendor bill".to_string(),
            reference_type: ReferenceType::Purchase,
            debit: dec!(0),
            credit: dec!(5000.00),
        },
        JournalLineRecord {
            journal_id: Uuid::new_v4(),
            date: day(20),
            description: "Bill settled".to_string(),
            reference_type: ReferenceType::Payment,
            debit: dec!(5000.00),
            credit: dec!(0),
        },
    ];

    let ledger = build_account_ledger(meta, day(1), day(28), Decimal::ZERO, lines);

    assert_eq!(ledger.lines[0].running_balance, dec!(5000.00));
    assert_eq!(ledger.lines[1].running_balance, Decimal::ZERO);
    assert_eq!(ledger.closing_balance, Decimal::ZERO);
}

#[test]
fn test_empty_world_statements_are_balanced() {
    let tb = build_trial_balance(as_of(), vec![]);
    assert!(tb.balanced);
    assert_eq!(tb.total_debit, Decimal::ZERO);

    let bs = build_balance_sheet(as_of(), vec![]);
    assert!(bs.balanced);
    assert_eq!(bs.retained_earnings, Decimal::ZERO);
}
