//! Core accounting logic for Khata.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `chart` - Account roles, sign conventions, and the default chart of accounts
//! - `ledger` - Double-entry journal validation
//! - `costing` - FIFO lot-consumption planning
//! - `statements` - Trial balance, profit & loss, and balance sheet assembly
//! - `documents` - Business-document status machines

pub mod chart;
pub mod costing;
pub mod documents;
pub mod ledger;
pub mod statements;
