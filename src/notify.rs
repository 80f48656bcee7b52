use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use tracing::warn;

use crate::types::{Result, WatchError};

/// Notification channel for run summaries.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn publish(&self, topic: &str, message: &str, subject: &str) -> Result<()>;
}

/// Webhook-backed notification channel: one JSON payload per publish.
pub struct WebhookNotifier {
    webhook_url: String,
    client: Client,
}

impl WebhookNotifier {
    pub fn new(webhook_url: String) -> Self {
        Self {
            webhook_url,
            client: Client::new(),
        }
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn publish(&self, topic: &str, message: &str, subject: &str) -> Result<()> {
        let payload = json!({
            "topic": topic,
            "subject": subject,
            "message": message,
        });

        let response = self
            .client
            .post(&self.webhook_url)
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, body = %body, "Notification webhook returned non-success");
            return Err(WatchError::Notify(format!("webhook returned {}", status)));
        }

        Ok(())
    }
}
