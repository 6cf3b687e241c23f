//! In-memory notifier used by tests.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use vault_core::result::AppResult;
use vault_core::traits::notify::Notifier;

/// Records published messages instead of delivering them.
#[derive(Debug, Clone, Default)]
pub struct MemoryNotifier {
    published: Arc<Mutex<Vec<(String, String)>>>,
}

impl MemoryNotifier {
    /// Create an empty notifier.
    pub fn new() -> Self {
        Self::default()
    }

    /// All `(subject, message)` pairs published so far.
    pub async fn published(&self) -> Vec<(String, String)> {
        self.published.lock().await.clone()
    }
}

#[async_trait]
impl Notifier for MemoryNotifier {
    async fn publish(&self, subject: &str, message: &str) -> AppResult<()> {
        self.published
            .lock()
            .await
            .push((subject.to_string(), message.to_string()));
        Ok(())
    }
}
