//! 通知、审计日志与 webhook 消息类型

use serde::{Deserialize, Serialize};

/// Audit log category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogType {
    DomainCheck,
    System,
}

impl LogType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::DomainCheck => "DOMAIN_CHECK",
            Self::System => "SYSTEM",
        }
    }
}

/// In-app notification for a single user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewNotification {
    pub receiver_id: String,
    pub content: String,
}

impl NewNotification {
    /// 域名被移除时发给受影响用户的通知
    #[must_use]
    pub fn domain_removed(receiver_id: &str, url: &str) -> Self {
        Self {
            receiver_id: receiver_id.to_string(),
            content: format!("Domain {url} was removed"),
        }
    }
}

/// Audit log entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewLogEntry {
    pub message: String,
    pub log_type: LogType,
}

impl NewLogEntry {
    #[must_use]
    pub fn domain_check(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            log_type: LogType::DomainCheck,
        }
    }
}

/// Operator-facing announcement (chat-ops webhook).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookMessage {
    pub content: String,
}

impl WebhookMessage {
    /// Announces a freshly linked domain and its donor.
    #[must_use]
    pub fn domain_linked(url: &str, donator_id: &str) -> Self {
        Self {
            content: format!("Domain {url} donated by {donator_id} is now linked"),
        }
    }
}
