//! `NotificationSink` / `LogSink` implementations for `SqliteStore`.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{ActiveValue::Set, EntityTrait, QueryOrder};

use domain_reconciler_core::error::{CoreError, CoreResult};
use domain_reconciler_core::traits::{LogSink, NotificationSink};
use domain_reconciler_core::types::{NewLogEntry, NewNotification};
use domain_reconciler_core::utils::datetime::to_storage;

use super::entity::{log_entry, notification};
use super::SqliteStore;

#[async_trait]
impl NotificationSink for SqliteStore {
    async fn create(&self, notification: NewNotification) -> CoreResult<()> {
        let active = notification::ActiveModel {
            id: Set(uuid::Uuid::new_v4().to_string()),
            receiver_id: Set(notification.receiver_id),
            content: Set(notification.content),
            created_at: Set(to_storage(&Utc::now())),
        };

        notification::Entity::insert(active)
            .exec(&self.db)
            .await
            .map_err(|e| CoreError::StorageError(format!("Failed to insert notification: {e}")))?;
        Ok(())
    }
}

#[async_trait]
impl LogSink for SqliteStore {
    async fn create(&self, entry: NewLogEntry) -> CoreResult<()> {
        let active = log_entry::ActiveModel {
            id: Set(uuid::Uuid::new_v4().to_string()),
            message: Set(entry.message),
            log_type: Set(entry.log_type.as_str().to_string()),
            created_at: Set(to_storage(&Utc::now())),
        };

        log_entry::Entity::insert(active)
            .exec(&self.db)
            .await
            .map_err(|e| CoreError::StorageError(format!("Failed to insert log entry: {e}")))?;
        Ok(())
    }
}

impl SqliteStore {
    /// Notifications in insertion order, oldest first.
    pub async fn list_notifications(&self) -> CoreResult<Vec<NewNotification>> {
        let rows = notification::Entity::find()
            .order_by_asc(notification::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| CoreError::StorageError(format!("Failed to query notifications: {e}")))?;

        Ok(rows
            .into_iter()
            .map(|row| NewNotification {
                receiver_id: row.receiver_id,
                content: row.content,
            })
            .collect())
    }

    /// Audit log messages in insertion order, oldest first.
    pub async fn list_log_messages(&self) -> CoreResult<Vec<String>> {
        let rows = log_entry::Entity::find()
            .order_by_asc(log_entry::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| CoreError::StorageError(format!("Failed to query logs: {e}")))?;

        Ok(rows.into_iter().map(|row| row.message).collect())
    }
}
