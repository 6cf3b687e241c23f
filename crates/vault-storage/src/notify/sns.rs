//! SNS notification channel (requires the `sns` feature).

use async_trait::async_trait;
use aws_sdk_sns::config::{BehaviorVersion, Credentials, Region};
use aws_sdk_sns::Client;

use vault_core::config::notify::NotifyConfig;
use vault_core::config::storage::StorageConfig;
use vault_core::error::AppError;
use vault_core::result::AppResult;
use vault_core::traits::notify::Notifier;

/// Publishes upload-rejection notices to an SNS topic.
#[derive(Debug, Clone)]
pub struct SnsNotifier {
    client: Client,
    topic_arn: String,
}

impl SnsNotifier {
    /// Create a new SNS notifier. Credential handling mirrors the S3
    /// provider: empty `access_key` falls back to the SDK default chain.
    pub async fn new(notify: &NotifyConfig, storage: &StorageConfig) -> AppResult<Self> {
        if notify.topic_arn.is_empty() {
            return Err(AppError::configuration(
                "notify.topic_arn is required when notifications are enabled",
            ));
        }
        let region = Region::new(storage.region.clone());
        tracing::info!(topic_arn = %notify.topic_arn, "Initializing SNS notifier");

        let client = if storage.access_key.is_empty() {
            let shared = aws_config::defaults(BehaviorVersion::latest())
                .region(region)
                .load()
                .await;
            Client::new(&shared)
        } else {
            let credentials = Credentials::new(
                storage.access_key.clone(),
                storage.secret_key.clone(),
                None,
                None,
                "vault-config",
            );
            let config = aws_sdk_sns::Config::builder()
                .behavior_version(BehaviorVersion::latest())
                .credentials_provider(credentials)
                .region(region)
                .build();
            Client::from_conf(config)
        };

        Ok(Self {
            client,
            topic_arn: notify.topic_arn.clone(),
        })
    }
}

#[async_trait]
impl Notifier for SnsNotifier {
    async fn publish(&self, subject: &str, message: &str) -> AppResult<()> {
        self.client
            .publish()
            .topic_arn(&self.topic_arn)
            .subject(subject)
            .message(message)
            .send()
            .await
            .map_err(|e| AppError::storage(format!("sns publish failed: {e}")))?;
        Ok(())
    }
}
