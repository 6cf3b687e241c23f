//! # vault-registry
//!
//! The Versioned File Registry: maps `(contract_number, filename)` pairs
//! onto object-store keys, resolves "the latest version" across a live
//! listing, moves versions between active and archived storage tiers, and
//! composes those pieces into the lifecycle operations (create, get, list,
//! list-versions, delete, dismiss).
//!
//! The registry holds no state of its own — every operation re-derives
//! truth from the object store.

pub mod envelope;
pub mod key;
pub mod resolver;
pub mod service;
pub mod staging;
pub mod tiering;
pub mod verifier;

pub use service::FileRegistry;
