//! # vault-api
//!
//! HTTP API layer for ContractVault built on Axum.
//!
//! Provides the REST endpoints over the file registry, DTOs, error
//! mapping, and request-logging middleware.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use router::build_router;
pub use state::AppState;
