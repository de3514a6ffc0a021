//! Errors for business-document lifecycle checks.

use thiserror::Error;

/// Errors that can occur when moving a document through its lifecycle.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DocumentError {
    /// Attempted a status transition the document does not allow.
    #[error("Cannot move {document} from {from} to {to}")]
    InvalidTransition {
        /// The document kind ("invoice", "purchase", "production_order").
        document: &'static str,
        /// The current status.
        from: &'static str,
        /// The attempted target status.
        to: &'static str,
    },
}

impl DocumentError {
    /// Returns the stable error code for this error.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidTransition { .. } => "INVALID_TRANSITION",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_transition_display() {
        let err = DocumentError::InvalidTransition {
            document: "invoice",
            from: "paid",
            to: "draft",
        };
        assert_eq!(err.error_code(), "INVALID_TRANSITION");
        assert_eq!(err.to_string(), "Cannot move invoice from paid to draft");
    }
}
