//! Chat-ops webhook notifier (`{"content": ...}` JSON body).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use domain_reconciler_core::error::{CoreError, CoreResult};
use domain_reconciler_core::traits::WebhookNotifier;
use domain_reconciler_core::types::WebhookMessage;
use domain_reconciler_provider::truncate_body;

/// 错误信息中保留的响应体长度
const ERROR_BODY_LIMIT: usize = 200;

/// Posts operator announcements to a Discord-style webhook URL.
pub struct HttpWebhookNotifier {
    client: Client,
    url: String,
}

impl HttpWebhookNotifier {
    /// # Errors
    /// Returns `CoreError::ValidationError` for a blank URL and
    /// `CoreError::WebhookError` if the HTTP client cannot be built.
    pub fn new(url: impl Into<String>, timeout: Duration) -> CoreResult<Self> {
        let url = url.into();
        if url.trim().is_empty() {
            return Err(CoreError::ValidationError(
                "webhook url must not be empty".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CoreError::WebhookError(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self { client, url })
    }
}

#[async_trait]
impl WebhookNotifier for HttpWebhookNotifier {
    async fn post(&self, message: &WebhookMessage) -> CoreResult<()> {
        let response = self
            .client
            .post(&self.url)
            .json(message)
            .send()
            .await
            .map_err(|e| CoreError::WebhookError(format!("Request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CoreError::WebhookError(format!(
                "HTTP {status}: {}",
                truncate_body(&body, ERROR_BODY_LIMIT)
            )));
        }

        log::debug!("Webhook delivered: {}", message.content);
        Ok(())
    }
}
