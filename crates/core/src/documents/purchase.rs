//! Purchase lifecycle.
//!
//! The valid transitions are:
//! - Draft → Received (goods in: inventory and payable posted, lots created)
//! - Draft → Cancelled
//! - Received → Paid (vendor settled)
//!
//! A received purchase cannot be cancelled: its lots may already have been
//! drawn by sales or production, so the stock cannot be taken back.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::error::DocumentError;

/// Purchase status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PurchaseStatus {
    /// Purchase is being drafted; nothing has been posted.
    Draft,
    /// Goods have been received; inventory and payable are on the ledger.
    Received,
    /// The vendor has been paid in full.
    Paid,
    /// Purchase was cancelled before receiving.
    Cancelled,
}

impl PurchaseStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Received => "received",
            Self::Paid => "paid",
            Self::Cancelled => "cancelled",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "draft" => Some(Self::Draft),
            "received" => Some(Self::Received),
            "paid" => Some(Self::Paid),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }

    /// Returns true if the purchase items can still be modified.
    #[must_use]
    pub fn is_editable(&self) -> bool {
        *self == Self::Draft
    }

    /// Returns true if the purchase has ledger postings behind it.
    #[must_use]
    pub fn is_posted(&self) -> bool {
        matches!(self, Self::Received | Self::Paid)
    }

    /// Returns true if moving from this status to `to` is allowed.
    #[must_use]
    pub fn can_transition_to(&self, to: Self) -> bool {
        matches!(
            (self, to),
            (Self::Draft, Self::Received | Self::Cancelled) | (Self::Received, Self::Paid)
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
                document: "purchase",
                from: self.as_str(),
                to: to.as_str(),
            })
        }
    }
}

impl fmt::Display for PurchaseStatus {
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
            PurchaseStatus::Draft,
            PurchaseStatus::Received,
            PurchaseStatus::Paid,
            PurchaseStatus::Cancelled,
        ] {
            assert_eq!(PurchaseStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(PurchaseStatus::parse("nope"), None);
    }

    #[test]
    fn test_allowed_transitions() {
        assert!(PurchaseStatus::Draft.can_transition_to(PurchaseStatus::Received));
        assert!(PurchaseStatus::Draft.can_transition_to(PurchaseStatus::Cancelled));
        assert!(PurchaseStatus::Received.can_transition_to(PurchaseStatus::Paid));
    }

    #[test]
    fn test_received_purchase_cannot_be_cancelled() {
        let err = PurchaseStatus::Received
            .transition_to(PurchaseStatus::Cancelled)
            .unwrap_err();
        assert_eq!(
            err,
            DocumentError::InvalidTransition {
                document: "purchase",
                from: "received",
                to: "cancelled",
            }
        );
    }

    #[test]
    fn test_rejected_transitions() {
        assert!(!PurchaseStatus::Draft.can_transition_to(PurchaseStatus::Paid));
        assert!(!PurchaseStatus::Paid.can_transition_to(PurchaseStatus::Cancelled));
        assert!(!PurchaseStatus::Cancelled.can_transition_to(PurchaseStatus::Received));
    }
}
