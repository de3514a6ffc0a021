//! Double-entry journal logic.
//!
//! This module implements the pure half of the Journal Poster:
//! - Domain types for journal creation
//! - Shape and balance validation (at least 2 lines, one-sided lines,
//!   debits equal credits within tolerance)
//! - Error types for ledger operations
//!
//! Persisting validated journals is the database layer's job; everything
//! here is testable without a connection.

pub mod error;
pub mod types;
pub mod validation;

#[cfg(test)]
mod validation_props;

pub use error::LedgerError;
pub use types::{
    EntryType, JournalLineInput, JournalTotals, PostJournalInput, ReferenceType,
    BALANCE_TOLERANCE,
};
pub use validation::validate_lines;
