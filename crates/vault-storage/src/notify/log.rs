//! Log-only notification channel, used when SNS is disabled.

use async_trait::async_trait;
use tracing::warn;

use vault_core::result::AppResult;
use vault_core::traits::notify::Notifier;

/// Writes notices to the log instead of delivering them anywhere.
#[derive(Debug, Clone, Default)]
pub struct LogNotifier;

impl LogNotifier {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Notifier for LogNotifier {
    async fn publish(&self, subject: &str, message: &str) -> AppResult<()> {
        warn!(subject = %subject, message = %message, "Notification (log-only channel)");
        Ok(())
    }
}
