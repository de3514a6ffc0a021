//! Chart of accounts vocabulary.
//!
//! This module defines the fixed vocabulary the rest of the engine speaks:
//! - Account types and their normal-balance sign conventions
//! - The closed set of account roles every posting resolves through
//! - The default chart seeded for a new business

pub mod role;
pub mod seed;

pub use role::{AccountRole, AccountType};
pub use seed::{default_chart, AccountSeed};
