//! 域名退役（补偿流程）
//!
//! 顺序：清理偏好 -> 删除记录 -> 删除 zone -> 通知用户 -> 审计日志。
//! 前两步失败会中止退役，记录保留到下一轮；后三步失败只记录日志。

use std::sync::Arc;

use crate::error::CoreResult;
use crate::types::{DomainRecord, NewLogEntry, NewNotification};

use super::{BestEffort, ReconcilerContext};

/// Reason recorded when a `WAITING` zone outlives the grace window.
pub const REASON_NOT_ACTIVATED: &str = "zone was not activated within the grace period";
/// Reason recorded when the provider no longer knows the zone.
pub const REASON_ZONE_GONE: &str = "zone no longer exists at the provider";
/// Reason recorded when the zone was moved, deleted, deactivated or lost activation.
pub const REASON_ZONE_INACTIVE: &str = "zone is no longer active";

/// 域名退役服务
pub struct RetirementService {
    ctx: Arc<ReconcilerContext>,
}

impl RetirementService {
    #[must_use]
    pub fn new(ctx: Arc<ReconcilerContext>) -> Self {
        Self { ctx }
    }

    /// Retires `record`, removing every trace of its url.
    ///
    /// Returns an error only when preference cleanup or record deletion fails;
    /// the record then survives and the next sweep retries the whole saga.
    pub async fn retire(&self, record: &DomainRecord, reason: &str) -> CoreResult<()> {
        // 1. 从所有偏好列表中移除该域名
        let affected = self
            .ctx
            .preference_repository
            .find_containing(&record.url)
            .await?;
        let mut receivers: Vec<String> = Vec::with_capacity(affected.len());
        for mut prefs in affected {
            prefs.remove_domain(&record.url);
            self.ctx
                .preference_repository
                .update_domains(&prefs.id, &prefs.domains)
                .await?;
            if !receivers.contains(&prefs.user_id) {
                receivers.push(prefs.user_id);
            }
        }

        // 2. 删除记录
        self.ctx.domain_repository.delete(&record.id).await?;

        // 3. 删除 zone
        self.ctx
            .call_provider("delete_zone", self.ctx.provider.delete_zone(&record.zone_id))
            .await
            .best_effort(&format!("delete zone {} of {}", record.zone_id, record.label()));

        // 4. 通知受影响用户
        for receiver in &receivers {
            self.ctx
                .notification_sink
                .create(NewNotification::domain_removed(receiver, &record.url))
                .await
                .best_effort(&format!("notify {receiver} about {}", record.url));
        }

        // 5. 审计日志
        let message = format!("removed {}: {reason}", record.label());
        log::info!("{message}");
        self.ctx
            .log_sink
            .create(NewLogEntry::domain_check(message))
            .await
            .best_effort("write retirement log entry");

        Ok(())
    }
}
