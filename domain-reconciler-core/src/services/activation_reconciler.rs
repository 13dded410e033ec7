//! 激活协调：轮询 `WAITING` 域名的 zone 状态，激活后安装记录并推进到 `DONE`

use std::net::Ipv4Addr;
use std::sync::Arc;

use domain_reconciler_provider::{CreateDnsRecordRequest, DnsRecordType, RecordOutcome};

use crate::error::CoreResult;
use crate::types::{
    DomainFilter, DomainOutcome, DomainRecord, NewLogEntry, Progress, SweepKind, SweepReport,
    WebhookMessage,
};

use super::{report_failure, BestEffort, ReconcilerContext, RetirementService};
use super::{REASON_NOT_ACTIVATED, REASON_ZONE_GONE};

/// Names of the records every linked domain gets: apex and wildcard.
const RECORD_NAMES: [&str; 2] = ["@", "*"];

/// Promotes activated `WAITING` domains and retires the ones that never activate.
pub struct ActivationReconciler {
    ctx: Arc<ReconcilerContext>,
    retirement: RetirementService,
}

impl ActivationReconciler {
    #[must_use]
    pub fn new(ctx: Arc<ReconcilerContext>) -> Self {
        Self {
            retirement: RetirementService::new(ctx.clone()),
            ctx,
        }
    }

    /// Runs one sweep. Only listing the candidates can fail the whole run.
    pub async fn run(&self) -> CoreResult<SweepReport> {
        let mut report = SweepReport::new(SweepKind::Activation, self.ctx.now());
        let filter = DomainFilter::progress(Progress::Waiting);
        let candidates = self.ctx.domain_repository.find_many(&filter).await?;
        report.examined = candidates.len();

        for candidate in candidates {
            let record = match self.ctx.claim(&candidate, &filter).await {
                Ok(Some(record)) => record,
                Ok(None) => {
                    report.skipped += 1;
                    continue;
                }
                Err(e) => {
                    report_failure(&mut report, &candidate, &e);
                    continue;
                }
            };

            match self.reconcile(&record).await {
                Ok(outcome) => report.tally(outcome),
                Err(e) => report_failure(&mut report, &record, &e),
            }
            self.ctx.release(&record).await;
        }

        log::info!("{report}");
        Ok(report)
    }

    async fn reconcile(&self, record: &DomainRecord) -> CoreResult<DomainOutcome> {
        let status = self
            .ctx
            .call_provider(
                "get_zone_status",
                self.ctx.provider.get_zone_status(&record.zone_id),
            )
            .await;
        self.ctx.touch(record).await;

        let status = match status {
            Ok(status) => status,
            Err(e) if e.is_not_found() => {
                self.retirement.retire(record, REASON_ZONE_GONE).await?;
                return Ok(DomainOutcome::Retired);
            }
            Err(e) => return Err(e.into()),
        };

        // 激活优先于过期
        if status.is_activated() {
            self.promote(record).await?;
            return Ok(DomainOutcome::Promoted);
        }

        if record.created_before(self.ctx.grace_cutoff()) {
            self.retirement.retire(record, REASON_NOT_ACTIVATED).await?;
            return Ok(DomainOutcome::Retired);
        }

        log::debug!("{} is still waiting for activation", record.label());
        Ok(DomainOutcome::Unchanged)
    }

    async fn promote(&self, record: &DomainRecord) -> CoreResult<()> {
        let origin_ip = self.ctx.config.require_origin_ip()?;
        self.install_records(record, origin_ip).await?;

        self.ctx
            .domain_repository
            .set_progress(&record.id, Progress::Done)
            .await?;

        let message = format!("changed {} to DONE", record.label());
        log::info!("{message}");
        self.ctx
            .log_sink
            .create(NewLogEntry::domain_check(message))
            .await
            .best_effort("write promotion log entry");

        self.ctx
            .webhook
            .post(&WebhookMessage::domain_linked(&record.url, &record.donator_id))
            .await
            .best_effort(&format!("announce {}", record.url));

        Ok(())
    }

    /// Ensures the apex and wildcard A records. Both are attempted; the first
    /// failure is returned after the second attempt.
    async fn install_records(&self, record: &DomainRecord, origin_ip: Ipv4Addr) -> CoreResult<()> {
        let mut first_error = None;

        for name in RECORD_NAMES {
            let req = CreateDnsRecordRequest {
                zone_id: record.zone_id.clone(),
                name: name.to_string(),
                record_type: DnsRecordType::A,
                content: origin_ip.to_string(),
                ttl: self.ctx.config.record_ttl,
                proxied: self.ctx.config.proxied,
            };
            match self
                .ctx
                .call_provider("ensure_record", self.ctx.provider.ensure_record(&req))
                .await
            {
                Ok(RecordOutcome::Created(created)) => {
                    log::debug!("{}: created {name} record {}", record.label(), created.id);
                }
                Ok(RecordOutcome::AlreadyExists) => {
                    log::debug!("{}: {name} record already present", record.label());
                }
                Err(e) => {
                    log::warn!("{}: failed to create {name} record: {e}", record.label());
                    first_error.get_or_insert(e);
                }
            }
        }

        match first_error {
            Some(e) => Err(e.into()),
            None => Ok(()),
        }
    }
}
