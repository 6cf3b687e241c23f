//! # vault-core
//!
//! Core crate for ContractVault. Contains the abstract object-store and
//! notifier traits, configuration schemas, shared types, and the unified
//! error system.
//!
//! This crate has **no** internal dependencies on other vault crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
