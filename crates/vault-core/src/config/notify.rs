//! Notification channel configuration.

use serde::{Deserialize, Serialize};

/// Notification channel configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct NotifyConfig {
    /// Whether upload-rejection notifications are published at all.
    #[serde(default)]
    pub enabled: bool,
    /// SNS topic ARN to publish rejection notices to.
    #[serde(default)]
    pub topic_arn: String,
}
