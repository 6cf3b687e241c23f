//! Notification channel trait.

use async_trait::async_trait;

use crate::result::AppResult;

/// Fire-and-forget notification channel.
///
/// Used only by the staging verifier to report malformed or incomplete
/// uploads. Delivery failures are logged by callers, never retried.
#[async_trait]
pub trait Notifier: Send + Sync + std::fmt::Debug + 'static {
    /// Publish a message under a subject line.
    async fn publish(&self, subject: &str, message: &str) -> AppResult<()>;
}
