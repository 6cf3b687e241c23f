//! HTTP request handlers.

pub mod archive;
pub mod file;
pub mod health;
pub mod staging;
