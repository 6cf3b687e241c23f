//! # vault-storage
//!
//! [`ObjectStore`](vault_core::traits::store::ObjectStore) and
//! [`Notifier`](vault_core::traits::notify::Notifier) implementations for
//! ContractVault: a real S3 backend (behind the `s3` feature), an SNS
//! notifier (behind the `sns` feature), and always-available in-memory
//! doubles used throughout the test suites.

pub mod notify;
pub mod providers;
