//! Abstract interfaces implemented by the storage crate.

pub mod notify;
pub mod store;
