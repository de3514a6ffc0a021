//! Costing error types.

use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur while planning or applying a consumption.
#[derive(Debug, Error)]
pub enum CostingError {
    /// Requested more units than all usable lots hold together.
    ///
    /// Surfaced to the user as-is ("insufficient stock"); the enclosing
    /// transaction aborts so no partial consumption persists.
    #[error("Insufficient stock: requested {requested}, available {available}")]
    InsufficientStock {
        /// Units requested.
        requested: Decimal,
        /// Units available across the usable lots.
        available: Decimal,
    },

    /// Consumption quantity must be positive.
    #[error("Consumption quantity must be positive, got {quantity}")]
    NonPositiveQuantity {
        /// The offending quantity.
        quantity: Decimal,
    },

    /// An explicitly referenced lot does not exist for this product and
    /// warehouse, or has nothing left.
    #[error("Lot not available: {lot_id}")]
    LotNotAvailable {
        /// The unusable lot reference.
        lot_id: Uuid,
    },
}

impl CostingError {
    /// Returns the stable error code for logs and CLI output.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InsufficientStock { .. } => "INSUFFICIENT_STOCK",
            Self::NonPositiveQuantity { .. } => "NON_POSITIVE_QUANTITY",
            Self::LotNotAvailable { .. } => "LOT_NOT_AVAILABLE",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_error_display() {
        let err = CostingError::InsufficientStock {
            requested: dec!(15),
            available: dec!(10),
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock: requested 15, available 10"
        );
        assert_eq!(err.error_code(), "INSUFFICIENT_STOCK");
    }
}
