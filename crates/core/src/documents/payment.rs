//! Payment settlement types.
//!
//! A payment either collects a receivable from a customer or settles a
//! payable to a vendor. The method decides which asset account the cash
//! side of the posting hits.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::chart::AccountRole;

/// How a payment was made or received.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Physical cash.
    Cash,
    /// Bank transfer or card settlement.
    Bank,
}

impl PaymentMethod {
    /// Returns the string representation of the method.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::Bank => "bank",
        }
    }

    /// Parses a method from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "cash" => Some(Self::Cash),
            "bank" => Some(Self::Bank),
            _ => None,
        }
    }

    /// The asset account this method settles through.
    #[must_use]
    pub fn account_role(&self) -> AccountRole {
        match self {
            Self::Cash => AccountRole::Cash,
            Self::Bank => AccountRole::Bank,
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Which side of the business the payment involves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartyType {
    /// A customer paying an invoice.
    Customer,
    /// A vendor being paid for a purchase.
    Vendor,
}

impl PartyType {
    /// Returns the string representation of the party type.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Customer => "customer",
            Self::Vendor => "vendor",
        }
    }

    /// Parses a party type from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "customer" => Some(Self::Customer),
            "vendor" => Some(Self::Vendor),
            _ => None,
        }
    }

    /// The control account tracking open balances for this party.
    #[must_use]
    pub fn control_account(&self) -> AccountRole {
        match self {
            Self::Customer => AccountRole::AccountsReceivable,
            Self::Vendor => AccountRole::AccountsPayable,
        }
    }
}

impl fmt::Display for PartyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_round_trip_and_accounts() {
        assert_eq!(PaymentMethod::parse("cash"), Some(PaymentMethod::Cash));
        assert_eq!(PaymentMethod::parse("Bank"), Some(PaymentMethod::Bank));
        assert_eq!(PaymentMethod::parse("cheque"), None);
        assert_eq!(PaymentMethod::Cash.account_role(), AccountRole::Cash);
        assert_eq!(PaymentMethod::Bank.account_role(), AccountRole::Bank);
    }

    #[test]
    fn test_party_control_accounts() {
        assert_eq!(
            PartyType::Customer.control_account(),
            AccountRole::AccountsReceivable
        );
        assert_eq!(
            PartyType::Vendor.control_account(),
            AccountRole::AccountsPayable
        );
        assert_eq!(PartyType::parse("vendor"), Some(PartyType::Vendor));
        assert_eq!(PartyType::parse("supplier"), None);
    }
}
