//! 捐赠域名记录持久化抽象 Trait

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::CoreResult;
use crate::types::{DomainFilter, DomainRecord, NewDomainRecord, Progress};

/// 域名记录仓库 Trait
///
/// Text-backed stores keep every timestamp in the
/// [`to_storage`](crate::utils::datetime::to_storage) form and filter on it
/// directly. Other writers to the same table (the donation flow that creates
/// `INPUT` records) must use that form too, or `created_before` and claim
/// expiry compare incorrectly.
///
/// 平台实现:
/// - `SqliteStore` (`SeaORM`)
/// - 测试: `MockDomainRecordRepository`
#[async_trait]
pub trait DomainRecordRepository: Send + Sync {
    /// 按条件查询候选记录（按 `created_at` 升序）
    async fn find_many(&self, filter: &DomainFilter) -> CoreResult<Vec<DomainRecord>>;

    /// 根据 ID 获取记录
    async fn find_by_id(&self, id: &str) -> CoreResult<Option<DomainRecord>>;

    /// 创建记录（ID 由存储生成）
    ///
    /// Fails with `DuplicateDomain` when the url is already registered.
    async fn create(&self, record: NewDomainRecord) -> CoreResult<DomainRecord>;

    /// 记录最后检查时间
    async fn touch_checked(&self, id: &str, at: DateTime<Utc>) -> CoreResult<()>;

    /// 推进生命周期阶段
    ///
    /// Implementations reject backward moves with `InvalidTransition` and
    /// missing records with `DomainNotFound`.
    async fn set_progress(&self, id: &str, progress: Progress) -> CoreResult<()>;

    /// 删除记录（不存在时视为成功）
    async fn delete(&self, id: &str) -> CoreResult<()>;

    /// Atomically take the claim lease on a record.
    ///
    /// Succeeds only when `locked_until` is unset or earlier than `now`; the
    /// lease is then set to `until`. Returns `false` when another worker holds it
    /// or the record is gone.
    async fn try_claim(
        &self,
        id: &str,
        now: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> CoreResult<bool>;

    /// 释放租约（记录不存在时视为成功）
    ///
    /// Clears the lease only while it still equals `lease`, the `until` that
    /// [`try_claim`](Self::try_claim) stored. A lease that expired and was taken
    /// over by another worker is left alone. Stores compare leases at the
    /// precision they persist (microseconds for text columns).
    async fn release_claim(&self, id: &str, lease: DateTime<Utc>) -> CoreResult<()>;
}
