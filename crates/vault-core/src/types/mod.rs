//! Shared types used across the vault crates.

pub mod object;
pub mod response;
