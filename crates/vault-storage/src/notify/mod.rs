//! Notification channel implementations.

pub mod log;
pub mod memory;
#[cfg(feature = "sns")]
pub mod sns;

pub use log::LogNotifier;
pub use memory::MemoryNotifier;
#[cfg(feature = "sns")]
pub use sns::SnsNotifier;
