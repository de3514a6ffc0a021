//! Account types and the closed role vocabulary.
//!
//! Postings never name accounts by free-form strings or raw IDs. Every GL
//! line is built against an [`AccountRole`], and the registry maps each role
//! to the concrete per-business account row. Tenants may rename accounts;
//! the role codes stay stable, so renames never break postings.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Account classification determining the normal-balance side.
///
/// Asset and expense accounts are debit-normal: their balance is
/// `debit - credit`. Liability, equity, and income accounts are
/// credit-normal: `credit - debit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    /// Resources owned (cash, bank, receivables, inventory).
    Asset,
    /// Obligations owed (payables, tax collected).
    Liability,
    /// Owner's residual interest.
    Equity,
    /// Revenue earned.
    Income,
    /// Costs incurred.
    Expense,
}

impl AccountType {
    /// Returns the lowercase storage name of this type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asset => "asset",
            Self::Liability => "liability",
            Self::Equity => "equity",
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }

    /// Returns true if this type increases on the debit side.
    #[must_use]
    pub const fn is_debit_normal(self) -> bool {
        matches!(self, Self::Asset | Self::Expense)
    }

    /// Computes the net balance of an account of this type from its raw
    /// debit and credit totals, applying the normal-balance sign convention.
    #[must_use]
    pub fn net_balance(self, total_debit: Decimal, total_credit: Decimal) -> Decimal {
        if self.is_debit_normal() {
            total_debit - total_credit
        } else {
            total_credit - total_debit
        }
    }

    /// Parses the lowercase storage name.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "asset" => Some(Self::Asset),
            "liability" => Some(Self::Liability),
            "equity" => Some(Self::Equity),
            "income" => Some(Self::Income),
            "expense" => Some(Self::Expense),
            _ => None,
        }
    }
}

impl std::fmt::Display for AccountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The closed set of account roles the engine posts against.
///
/// Each role carries a stable code (`1xxx` assets, `2xxx` liabilities,
/// `3xxx` equity, `4xxx` income, `5xxx` COGS, `6xxx` expenses), a default
/// display name, and its account type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountRole {
    /// Cash in hand.
    Cash,
    /// Bank balance.
    Bank,
    /// Amounts owed by customers.
    AccountsReceivable,
    /// Inventory carried at cost.
    InventoryAsset,
    /// Input tax paid on purchases, claimable against tax collected.
    InputTaxCredit,
    /// Amounts owed to vendors.
    AccountsPayable,
    /// Tax collected on sales, owed to the authority.
    SalesTaxPayable,
    /// Owner's capital.
    OwnerEquity,
    /// Revenue from sales.
    SalesRevenue,
    /// Cost of goods sold.
    CostOfGoodsSold,
    /// General operating expenses.
    OperatingExpense,
    /// Salaries and wages.
    SalariesExpense,
    /// Rent.
    RentExpense,
    /// Utilities.
    UtilitiesExpense,
}

impl AccountRole {
    /// Every role, in code order. The seed creates exactly this set.
    pub const ALL: [Self; 14] = [
        Self::Cash,
        Self::Bank,
        Self::AccountsReceivable,
        Self::InventoryAsset,
        Self::InputTaxCredit,
        Self::AccountsPayable,
        Self::SalesTaxPayable,
        Self::OwnerEquity,
        Self::SalesRevenue,
        Self::CostOfGoodsSold,
        Self::OperatingExpense,
        Self::SalariesExpense,
        Self::RentExpense,
        Self::UtilitiesExpense,
    ];

    /// Returns the stable account code for this role.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Cash => "1000",
            Self::Bank => "1010",
            Self::AccountsReceivable => "1100",
            Self::InventoryAsset => "1200",
            Self::InputTaxCredit => "1300",
            Self::AccountsPayable => "2000",
            Self::SalesTaxPayable => "2100",
            Self::OwnerEquity => "3000",
            Self::SalesRevenue => "4000",
            Self::CostOfGoodsSold => "5000",
            Self::OperatingExpense => "6000",
            Self::SalariesExpense => "6100",
            Self::RentExpense => "6200",
            Self::UtilitiesExpense => "6300",
        }
    }

    /// Returns the default display name seeded for this role.
    #[must_use]
    pub const fn default_name(self) -> &'static str {
        match self {
            Self::Cash => "Cash in Hand",
            Self::Bank => "Bank",
            Self::AccountsReceivable => "Accounts Receivable",
            Self::InventoryAsset => "Inventory Asset",
            Self::InputTaxCredit => "Input Tax Credit",
            Self::AccountsPayable => "Accounts Payable",
            Self::SalesTaxPayable => "Sales Tax Payable",
            Self::OwnerEquity => "Owner's Equity",
            Self::SalesRevenue => "Sales Revenue",
            Self::CostOfGoodsSold => "Cost of Goods Sold",
            Self::OperatingExpense => "Operating Expense",
            Self::SalariesExpense => "Salaries Expense",
            Self::RentExpense => "Rent Expense",
            Self::UtilitiesExpense => "Utilities Expense",
        }
    }

    /// Returns the account type of this role.
    #[must_use]
    pub const fn account_type(self) -> AccountType {
        match self {
            Self::Cash
            | Self::Bank
            | Self::AccountsReceivable
            | Self::InventoryAsset
            | Self::InputTaxCredit => AccountType::Asset,
            Self::AccountsPayable | Self::SalesTaxPayable => AccountType::Liability,
            Self::OwnerEquity => AccountType::Equity,
            Self::SalesRevenue => AccountType::Income,
            Self::CostOfGoodsSold
            | Self::OperatingExpense
            | Self::SalariesExpense
            | Self::RentExpense
            | Self::UtilitiesExpense => AccountType::Expense,
        }
    }

    /// Resolves a role from its stable code.
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|role| role.code() == code)
    }
}

impl std::fmt::Display for AccountRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_debit_normal_sign_convention() {
        assert_eq!(
            AccountType::Asset.net_balance(dec!(500), dec!(200)),
            dec!(300)
        );
        assert_eq!(
            AccountType::Expense.net_balance(dec!(118), dec!(0)),
            dec!(118)
        );
    }

    #[test]
    fn test_credit_normal_sign_convention() {
        assert_eq!(
            AccountType::Liability.net_balance(dec!(200), dec!(500)),
            dec!(300)
        );
        assert_eq!(
            AccountType::Income.net_balance(dec!(0), dec!(1000)),
            dec!(1000)
        );
        assert_eq!(
            AccountType::Equity.net_balance(dec!(100), dec!(400)),
            dec!(300)
        );
    }

    #[test]
    fn test_type_round_trip() {
        for t in [
            AccountType::Asset,
            AccountType::Liability,
            AccountType::Equity,
            AccountType::Income,
            AccountType::Expense,
        ] {
            assert_eq!(AccountType::parse(t.as_str()), Some(t));
        }
        assert_eq!(AccountType::parse("revenue"), None);
    }

    #[test]
    fn test_role_codes_are_unique() {
        let mut codes: Vec<&str> = AccountRole::ALL.iter().map(|r| r.code()).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), AccountRole::ALL.len());
    }

    #[test]
    fn test_role_code_round_trip() {
        for role in AccountRole::ALL {
            assert_eq!(AccountRole::from_code(role.code()), Some(role));
        }
        assert_eq!(AccountRole::from_code("9999"), None);
    }

    #[test]
    fn test_code_prefix_matches_account_type() {
        for role in AccountRole::ALL {
            let expected = match role.code().as_bytes()[0] {
                b'1' => AccountType::Asset,
                b'2' => AccountType::Liability,
                b'3' => AccountType::Equity,
                b'4' => AccountType::Income,
                _ => AccountType::Expense,
            };
            assert_eq!(role.account_type(), expected, "role {role:?}");
        }
    }
}
