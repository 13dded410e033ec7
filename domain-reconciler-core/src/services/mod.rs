//! 业务逻辑服务层

mod activation_reconciler;
mod best_effort;
mod intake_sweeper;
mod liveness_sweep;
mod retirement_service;

pub use activation_reconciler::ActivationReconciler;
pub use best_effort::BestEffort;
pub use intake_sweeper::IntakeSweeper;
pub use liveness_sweep::LivenessSweep;
pub use retirement_service::{
    RetirementService, REASON_NOT_ACTIVATED, REASON_ZONE_GONE, REASON_ZONE_INACTIVE,
};

use std::future::Future;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use domain_reconciler_provider::{DnsProvider, ProviderError};

use crate::config::ReconcilerConfig;
use crate::error::{CoreError, CoreResult};
use crate::traits::{
    DomainRecordRepository, LogSink, NoopWebhookNotifier, NotificationSink, PreferenceRepository,
    WebhookNotifier,
};
use crate::types::{DomainFilter, DomainRecord, SweepReport};

/// Injectable time source.
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// 服务上下文 - 持有所有依赖
///
/// 平台层需要创建此上下文，并注入平台特定的存储实现。
pub struct ReconcilerContext {
    /// 域名记录仓库
    pub domain_repository: Arc<dyn DomainRecordRepository>,
    /// 上传者偏好仓库
    pub preference_repository: Arc<dyn PreferenceRepository>,
    /// 用户通知
    pub notification_sink: Arc<dyn NotificationSink>,
    /// 审计日志
    pub log_sink: Arc<dyn LogSink>,
    /// DNS Provider
    pub provider: Arc<dyn DnsProvider>,
    /// 运维 webhook
    pub webhook: Arc<dyn WebhookNotifier>,
    pub config: ReconcilerConfig,
    clock: Clock,
}

impl ReconcilerContext {
    /// 创建服务上下文（webhook 默认关闭，时钟默认 `Utc::now`）
    #[must_use]
    pub fn new(
        domain_repository: Arc<dyn DomainRecordRepository>,
        preference_repository: Arc<dyn PreferenceRepository>,
        notification_sink: Arc<dyn NotificationSink>,
        log_sink: Arc<dyn LogSink>,
        provider: Arc<dyn DnsProvider>,
        config: ReconcilerConfig,
    ) -> Self {
        Self {
            domain_repository,
            preference_repository,
            notification_sink,
            log_sink,
            provider,
            webhook: Arc::new(NoopWebhookNotifier),
            config,
            clock: Arc::new(Utc::now),
        }
    }

    #[must_use]
    pub fn with_webhook(mut self, webhook: Arc<dyn WebhookNotifier>) -> Self {
        self.webhook = webhook;
        self
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Current time according to the injected clock.
    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        (self.clock)()
    }

    /// Records created before this instant are past the grace window.
    #[must_use]
    pub fn grace_cutoff(&self) -> DateTime<Utc> {
        self.now() - self.config.grace_period()
    }

    /// Runs one provider call under the configured timeout.
    ///
    /// Expiry becomes [`ProviderError::Timeout`], which sweeps treat as transient.
    pub async fn call_provider<T, F>(&self, operation: &str, call: F) -> Result<T, ProviderError>
    where
        F: Future<Output = Result<T, ProviderError>>,
    {
        let limit = self.config.provider_timeout();
        tokio::time::timeout(limit, call)
            .await
            .unwrap_or_else(|_| {
                Err(ProviderError::Timeout {
                    provider: self.provider.id().to_string(),
                    detail: format!("{operation} exceeded {}s", limit.as_secs()),
                })
            })
    }

    /// Takes the claim lease on `record` and re-reads it.
    ///
    /// The returned record carries the lease in `locked_until`; hand that same
    /// record to [`release`](Self::release). Returns `None` when another sweep
    /// holds the lease, or when the record left `filter` between listing and
    /// claiming.
    pub async fn claim(
        &self,
        record: &DomainRecord,
        filter: &DomainFilter,
    ) -> CoreResult<Option<DomainRecord>> {
        let now = self.now();
        let lease = now + self.config.lease();
        let claimed = self
            .domain_repository
            .try_claim(&record.id, now, lease)
            .await?;
        if !claimed {
            log::debug!("{} is claimed by another sweep, skipping", record.label());
            return Ok(None);
        }

        match self.domain_repository.find_by_id(&record.id).await? {
            Some(mut fresh) if filter.matches(&fresh) => {
                fresh.locked_until = Some(lease);
                Ok(Some(fresh))
            }
            _ => {
                log::debug!("{} changed since listing, skipping", record.label());
                self.release_lease(record, lease).await;
                Ok(None)
            }
        }
    }

    /// Releases the lease held by a record returned from [`claim`](Self::claim).
    ///
    /// A lease that already expired and passed to another sweep is kept. An
    /// unreleased lease simply expires.
    pub async fn release(&self, record: &DomainRecord) {
        if let Some(lease) = record.locked_until {
            self.release_lease(record, lease).await;
        }
    }

    async fn release_lease(&self, record: &DomainRecord, lease: DateTime<Utc>) {
        self.domain_repository
            .release_claim(&record.id, lease)
            .await
            .best_effort(&format!("release claim on {}", record.label()));
    }

    /// Stamps `last_checked_at`; a failed stamp does not stop the sweep.
    pub async fn touch(&self, record: &DomainRecord) {
        self.domain_repository
            .touch_checked(&record.id, self.now())
            .await
            .best_effort(&format!("stamp last check of {}", record.label()));
    }
}

/// Logs a per-domain failure and adds it to the report.
pub(crate) fn report_failure(report: &mut SweepReport, record: &DomainRecord, err: &CoreError) {
    if err.is_transient() {
        log::warn!("{}: transient failure, retrying next sweep: {err}", record.label());
    } else if err.is_expected() {
        log::warn!("{}: {err}", record.label());
    } else {
        log::error!("{}: {err}", record.label());
    }
    report.record_failure(&record.id, &record.url, err);
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::test_utils::{harness, ts};
    use crate::types::Progress;

    #[test]
    fn grace_cutoff_uses_injected_clock() {
        let h = harness();
        assert_eq!(h.ctx.now(), ts("2024-03-10T12:00:00Z"));
        assert_eq!(h.ctx.grace_cutoff(), ts("2024-03-08T12:00:00Z"));
    }

    #[tokio::test(start_paused = true)]
    async fn slow_provider_call_times_out_as_transient() {
        let h = harness();
        let result: Result<(), ProviderError> = h
            .ctx
            .call_provider("get_zone_status", async {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok(())
            })
            .await;
        let err = result.unwrap_err();
        assert!(err.is_transient());
        assert!(matches!(err, ProviderError::Timeout { .. }));
    }

    #[tokio::test]
    async fn second_claim_is_refused_until_release() {
        let h = harness();
        let record = h
            .seed("a.example", "z-1", Progress::Waiting, ts("2024-03-09T00:00:00Z"))
            .await;
        let filter = DomainFilter::progress(Progress::Waiting);

        let claimed = h.ctx.claim(&record, &filter).await.unwrap().unwrap();
        assert!(h.ctx.claim(&record, &filter).await.unwrap().is_none());

        h.ctx.release(&claimed).await;
        assert!(h.ctx.claim(&record, &filter).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn stale_release_keeps_the_new_holders_lease() {
        let h = harness();
        let record = h
            .seed("a.example", "z-1", Progress::Waiting, ts("2024-03-09T00:00:00Z"))
            .await;
        let filter = DomainFilter::progress(Progress::Waiting);

        // a sweep from an hour ago whose lease has since expired
        let mut stale = record.clone();
        stale.locked_until = Some(ts("2024-03-10T11:05:00Z"));
        h.domains.lock(&record.id, ts("2024-03-10T11:05:00Z")).await;

        let current = h.ctx.claim(&record, &filter).await.unwrap().unwrap();
        let lease = current.locked_until.unwrap();
        assert!(lease > h.ctx.now());

        h.ctx.release(&stale).await;
        assert_eq!(
            h.domains.get(&record.id).await.unwrap().locked_until,
            Some(lease)
        );
        assert!(h.ctx.claim(&record, &filter).await.unwrap().is_none());

        h.ctx.release(&current).await;
        assert!(h.domains.get(&record.id).await.unwrap().locked_until.is_none());
    }

    #[tokio::test]
    async fn expired_lease_can_be_taken_over() {
        let h = harness();
        let record = h
            .seed("a.example", "z-1", Progress::Waiting, ts("2024-03-09T00:00:00Z"))
            .await;
        h.domains.lock(&record.id, ts("2024-03-10T11:59:00Z")).await;

        let claimed = h
            .ctx
            .claim(&record, &DomainFilter::progress(Progress::Waiting))
            .await
            .unwrap();
        assert!(claimed.is_some());
    }

    #[tokio::test]
    async fn record_that_moved_on_is_not_claimed() {
        let h = harness();
        let record = h
            .seed("a.example", "z-1", Progress::Waiting, ts("2024-03-09T00:00:00Z"))
            .await;
        h.domains.set_progress(&record.id, Progress::Done).await.unwrap();

        let claimed = h
            .ctx
            .claim(&record, &DomainFilter::progress(Progress::Waiting))
            .await
            .unwrap();
        assert!(claimed.is_none());
        // the lease taken for the re-read is handed back
        assert!(h.domains.get(&record.id).await.unwrap().locked_until.is_none());
    }
}
