//! 存活检查：重新确认 `WAITING` / `DONE` 域名的 zone 仍然存在且有效

use std::sync::Arc;

use crate::error::CoreResult;
use crate::types::{DomainFilter, DomainOutcome, DomainRecord, Progress, SweepKind, SweepReport};

use super::{report_failure, ReconcilerContext, RetirementService};
use super::{REASON_ZONE_GONE, REASON_ZONE_INACTIVE};

/// Retires domains whose zone vanished or went inactive out-of-band.
///
/// Not every failed or non-active status check retires the domain:
/// - A transient provider error (timeout, rate limit, 5xx) and an auth failure
///   keep the record. The failure is reported and the next sweep checks again.
///   Only "zone not found" counts as the zone being gone.
/// - A pending zone of a `WAITING` domain is healthy here; its deadline belongs
///   to the activation reconciler.
/// - A terminal zone state retires the domain at any progress, as does a
///   `DONE` domain whose zone lost activation.
pub struct LivenessSweep {
    ctx: Arc<ReconcilerContext>,
    retirement: RetirementService,
}

impl LivenessSweep {
    #[must_use]
    pub fn new(ctx: Arc<ReconcilerContext>) -> Self {
        Self {
            retirement: RetirementService::new(ctx.clone()),
            ctx,
        }
    }

    /// Runs one sweep. Only listing the candidates can fail the whole run.
    pub async fn run(&self) -> CoreResult<SweepReport> {
        let mut report = SweepReport::new(SweepKind::Liveness, self.ctx.now());
        let filter = DomainFilter::any_of(&[Progress::Waiting, Progress::Done]);
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

            match self.verify(&record).await {
                Ok(outcome) => report.tally(outcome),
                Err(e) => report_failure(&mut report, &record, &e),
            }
            self.ctx.release(&record).await;
        }

        log::info!("{report}");
        Ok(report)
    }

    async fn verify(&self, record: &DomainRecord) -> CoreResult<DomainOutcome> {
        let status = self
            .ctx
            .call_provider(
                "get_zone_status",
                self.ctx.provider.get_zone_status(&record.zone_id),
            )
            .await;
        self.ctx.touch(record).await;

        let reason = match status {
            Err(e) if e.is_not_found() => REASON_ZONE_GONE,
            // 凭证失效、限流等不代表 zone 已消失
            Err(e) => return Err(e.into()),
            Ok(status) if status.state.is_terminal() => {
                log::info!("{}: zone state is {:?}", record.label(), status.state);
                REASON_ZONE_INACTIVE
            }
            Ok(status) if record.progress == Progress::Done && !status.is_activated() => {
                REASON_ZONE_INACTIVE
            }
            Ok(_) => return Ok(DomainOutcome::Unchanged),
        };

        self.retirement.retire(record, reason).await?;
        Ok(DomainOutcome::Retired)
    }
}
