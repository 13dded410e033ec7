//! Operator webhook abstraction

use async_trait::async_trait;

use crate::error::CoreResult;
use crate::types::WebhookMessage;

/// Outbound operator announcements. Callers treat every failure as ignorable.
#[async_trait]
pub trait WebhookNotifier: Send + Sync {
    async fn post(&self, message: &WebhookMessage) -> CoreResult<()>;
}

/// Used when no webhook URL is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopWebhookNotifier;

#[async_trait]
impl WebhookNotifier for NoopWebhookNotifier {
    async fn post(&self, message: &WebhookMessage) -> CoreResult<()> {
        log::debug!("Webhook disabled, dropping: {}", message.content);
        Ok(())
    }
}
