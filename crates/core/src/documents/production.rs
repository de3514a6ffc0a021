//! Production-order lifecycle.
//!
//! The valid transitions are:
//! - Pending → Completed (components consumed, output lot produced)
//! - Pending → Cancelled

use serde::{Deserialize, Serialize};
use std::fmt;

use super::error::DocumentError;

/// Production-order status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductionStatus {
    /// Order is planned; no stock has moved.
    Pending,
    /// Order was completed; component draws and the output lot exist.
    Completed,
    /// Order was cancelled before completion.
    Cancelled,
}

impl ProductionStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "completed" => Some(Self::Completed),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }

    /// Returns true if moving from this status to `to` is allowed.
    #[must_use]
    pub fn can_transition_to(&self, to: Self) -> bool {
        matches!((self, to), (Self::Pending, Self::Completed | Self::Cancelled))
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
                document: "production_order",
                from: self.as_str(),
                to: to.as_str(),
            })
        }
    }
}

impl fmt::Display for ProductionStatus {
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
            ProductionStatus::Pending,
            ProductionStatus::Completed,
            ProductionStatus::Cancelled,
        ] {
            assert_eq!(ProductionStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(ProductionStatus::parse("done"), None);
    }

    #[test]
    fn test_transitions() {
        assert!(ProductionStatus::Pending.can_transition_to(ProductionStatus::Completed));
        assert!(ProductionStatus::Pending.can_transition_to(ProductionStatus::Cancelled));
        assert!(!ProductionStatus::Completed.can_transition_to(ProductionStatus::Cancelled));
        assert!(!ProductionStatus::Completed.can_transition_to(ProductionStatus::Pending));
        assert!(!ProductionStatus::Cancelled.can_transition_to(ProductionStatus::Completed));
    }

    #[test]
    fn test_completed_order_is_terminal() {
        let err = ProductionStatus::Completed
            .transition_to(ProductionStatus::Pending)
            .unwrap_err();
        assert_eq!(err.error_code(), "INVALID_TRANSITION");
        assert!(err.to_string().contains("production_order"));
    }
}
