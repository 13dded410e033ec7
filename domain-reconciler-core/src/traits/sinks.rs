//! 通知与审计日志写入端

use async_trait::async_trait;

use crate::error::CoreResult;
use crate::types::{NewLogEntry, NewNotification};

/// User notification store.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn create(&self, notification: NewNotification) -> CoreResult<()>;
}

/// Audit log store.
#[async_trait]
pub trait LogSink: Send + Sync {
    async fn create(&self, entry: NewLogEntry) -> CoreResult<()>;
}
