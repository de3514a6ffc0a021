//! Shared types and configuration for Khata.
//!
//! This crate provides the small set of types used across all other crates:
//! - Configuration management
//! - The authenticated actor context handed in by the surrounding system

pub mod config;
pub mod context;

pub use config::AppConfig;
pub use context::ActorContext;
