//! Invoice lifecycle.
//!
//! The valid transitions are:
//! - Draft → Pending (issue: revenue and COGS are posted, stock is drawn)
//! - Draft → Cancelled
//! - Pending → Paid (full payment received)
//! - Pending → Cancelled (postings reversed, stock restored)
//! - Paid → Cancelled (payment and issue postings reversed)

use serde::{Deserialize, Serialize};
use std::fmt;

use super::error::DocumentError;

/// Invoice status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    /// Invoice is being drafted; nothing has been posted.
    Draft,
    /// Invoice has been issued; revenue and COGS are on the ledger.
    Pending,
    /// Invoice has been paid in full.
    Paid,
    /// Invoice has been cancelled; any postings were reversed.
    Cancelled,
}

impl InvoiceStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Pending => "pending",
            Self::Paid => "paid",
            Self::Cancelled => "cancelled",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "draft" => Some(Self::Draft),
            "pending" => Some(Self::Pending),
            "paid" => Some(Self::Paid),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }

    /// Returns true if the invoice items can still be modified.
    #[must_use]
    pub fn is_editable(&self) -> bool {
        *self == Self::Draft
    }

    /// Returns true if the invoice has ledger postings behind it.
    #[must_use]
    pub fn is_posted(&self) -> bool {
        matches!(self, Self::Pending | Self::Paid)
    }

    /// Returns true if moving from this status to `to` is allowed.
    #[must_use]
    pub fn can_transition_to(&self, to: Self) -> bool {
        matches!(
            (self, to),
            (Self::Draft, Self::Pending | Self::Cancelled)
                | (Self::Pending, Self::Paid | Self::Cancelled)
                | (Self::Paid, Self::Cancelled)
        )
    }

    /// Checks the transition to `to`, returning the new status on success.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::InvalidTransition`] if the move is not allowed.
    pub fn transition_to(self, to: Self) -> Result<Self, DocumentError> {
        if self.can_transition_to(to) {
            Ok(to)
        } else {
            Err(DocumentError::InvalidTransition {
                document: "invoice",
                from: self.as_str(),
                to: to.as_str(),
            })
        }
    }
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        for status in [
            InvoiceStatus::Draft,
            InvoiceStatus::Pending,
            InvoiceStatus::Paid,
            InvoiceStatus::Cancelled,
        ] {
            assert_eq!(InvoiceStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(InvoiceStatus::parse("PAID"), Some(InvoiceStatus::Paid));
        assert_eq!(InvoiceStatus::parse("unknown"), None);
    }

    #[test]
    fn test_allowed_transitions() {
        assert!(InvoiceStatus::Draft.can_transition_to(InvoiceStatus::Pending));
        assert!(InvoiceStatus::Draft.can_transition_to(InvoiceStatus::Cancelled));
        assert!(InvoiceStatus::Pending.can_transition_to(InvoiceStatus::Paid));
        assert!(InvoiceStatus::Pending.can_transition_to(InvoiceStatus::Cancelled));
        assert!(InvoiceStatus::Paid.can_transition_to(InvoiceStatus::Cancelled));
    }

    #[test]
    fn test_rejected_transitions() {
        assert!(!InvoiceStatus::Draft.can_transition_to(InvoiceStatus::Paid));
        assert!(!InvoiceStatus::Pending.can_transition_to(InvoiceStatus::Draft));
        assert!(!InvoiceStatus::Paid.can_transition_to(InvoiceStatus::Pending));
        assert!(!InvoiceStatus::Cancelled.can_transition_to(InvoiceStatus::Draft));
        assert!(!InvoiceStatus::Cancelled.can_transition_to(InvoiceStatus::Pending));
    }

    #[test]
    fn test_transition_error_carries_both_ends() {
        let err = InvoiceStatus::Cancelled
            .transition_to(InvoiceStatus::Paid)
            .unwrap_err();
        assert_eq!(
            err,
            DocumentError::InvalidTransition {
                document: "invoice",
                from: "cancelled",
                to: "paid",
            }
        );
    }

    #[test]
    fn test_editable_and_posted_flags() {
        assert!(InvoiceStatus::Draft.is_editable());
        assert!(!InvoiceStatus::Pending.is_editable());
        assert!(!InvoiceStatus::Draft.is_posted());
        assert!(InvoiceStatus::Pending.is_posted());
        assert!(InvoiceStatus::Paid.is_posted());
        assert!(!InvoiceStatus::Cancelled.is_posted());
    }
}
