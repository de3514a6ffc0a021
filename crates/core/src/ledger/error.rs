//! Ledger error types for validation and account-resolution failures.

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that can occur while validating or posting a journal.
///
/// All of these are fatal to the enclosing transaction: the caller rolls
/// back, nothing persists. The engine never silently corrects a journal.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// A journal must have at least 2 lines.
    #[error("Journal must have at least 2 lines, got {count}")]
    InsufficientLines {
        /// Number of lines supplied.
        count: usize,
    },

    /// Debits and credits do not match within tolerance.
    #[error("Journal is not balanced. Debit: {debit}, Credit: {credit}")]
    UnbalancedEntry {
        /// Total debit amount.
        debit: Decimal,
        /// Total credit amount.
        credit: Decimal,
    },

    /// Line amount cannot be zero.
    #[error("Line amount cannot be zero")]
    ZeroAmount,

    /// Line amount cannot be negative.
    #[error("Line amount cannot be negative")]
    NegativeAmount,

    /// No account with this code exists for the business.
    #[error("Account not found: {code}")]
    AccountNotFound {
        /// The unresolvable account code.
        code: String,
    },
}

impl LedgerError {
    /// Returns the stable error code for logs and CLI output.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InsufficientLines { .. } => "INSUFFICIENT_LINES",
            Self::UnbalancedEntry { .. } => "UNBALANCED_ENTRY",
            Self::ZeroAmount => "ZERO_AMOUNT",
            Self::NegativeAmount => "NEGATIVE_AMOUNT",
            Self::AccountNotFound { .. } => "ACCOUNT_NOT_FOUND",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            LedgerError::InsufficientLines { count: 1 }.error_code(),
            "INSUFFICIENT_LINES"
        );
        assert_eq!(
            LedgerError::UnbalancedEntry {
                debit: dec!(100.00),
                credit: dec!(50.00),
            }
            .error_code(),
            "UNBALANCED_ENTRY"
        );
        assert_eq!(
            LedgerError::AccountNotFound {
                code: "9999".to_string()
            }
            .error_code(),
            "ACCOUNT_NOT_FOUND"
        );
    }

    #[test]
    fn test_error_display() {
        let err = LedgerError::UnbalancedEntry {
            debit: dec!(100.00),
            credit: dec!(50.00),
        };
        assert_eq!(
            err.to_string(),
            "Journal is not balanced. Debit: 100.00, Credit: 50.00"
        );

        let err = LedgerError::AccountNotFound {
            code: "4000".to_string(),
        };
        assert_eq!(err.to_string(), "Account not found: 4000");
    }
}
