//! Default chart of accounts seeded at business onboarding.

use super::role::{AccountRole, AccountType};

/// One account to create when initializing a business's chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountSeed {
    /// The role this account fulfils.
    pub role: AccountRole,
    /// Stable account code.
    pub code: &'static str,
    /// Default display name (tenants may rename later).
    pub name: &'static str,
    /// Account classification.
    pub account_type: AccountType,
}

/// Returns the standard account set created for a new business.
///
/// Covers every [`AccountRole`], so any posting the engine can build has a
/// resolvable account immediately after initialization.
#[must_use]
pub fn default_chart() -> Vec<AccountSeed> {
    AccountRole::ALL
        .into_iter()
        .map(|role| AccountSeed {
            role,
            code: role.code(),
            name: role.default_name(),
            account_type: role.account_type(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_covers_every_role() {
        let chart = default_chart();
        assert_eq!(chart.len(), AccountRole::ALL.len());
        for role in AccountRole::ALL {
            assert!(chart.iter().any(|a| a.role == role));
        }
    }

    #[test]
    fn test_seed_codes_match_roles() {
        for account in default_chart() {
            assert_eq!(account.code, account.role.code());
            assert_eq!(account.account_type, account.role.account_type());
        }
    }
}
