//! Intake 清理：删除在 `INPUT` 阶段停留超过宽限期的记录

use std::sync::Arc;

use crate::error::CoreResult;
use crate::types::{
    DomainFilter, DomainOutcome, DomainRecord, NewLogEntry, Progress, SweepKind, SweepReport,
};

use super::{report_failure, BestEffort, ReconcilerContext};

/// Expires records whose donation never got past `INPUT`.
///
/// No user is notified: nothing can reference an `INPUT` domain yet.
pub struct IntakeSweeper {
    ctx: Arc<ReconcilerContext>,
}

impl IntakeSweeper {
    #[must_use]
    pub fn new(ctx: Arc<ReconcilerContext>) -> Self {
        Self { ctx }
    }

    /// Runs one sweep. Only listing the candidates can fail the whole run.
    pub async fn run(&self) -> CoreResult<SweepReport> {
        let mut report = SweepReport::new(SweepKind::Intake, self.ctx.now());
        let filter =
            DomainFilter::progress(Progress::Input).created_before(self.ctx.grace_cutoff());
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

            match self.expire(&record).await {
                Ok(outcome) => report.tally(outcome),
                Err(e) => {
                    report_failure(&mut report, &record, &e);
                    self.ctx.release(&record).await;
                }
            }
        }

        log::info!("{report}");
        Ok(report)
    }

    async fn expire(&self, record: &DomainRecord) -> CoreResult<DomainOutcome> {
        // 记录是唯一事实来源，先删记录
        self.ctx.domain_repository.delete(&record.id).await?;

        self.ctx
            .call_provider("delete_zone", self.ctx.provider.delete_zone(&record.zone_id))
            .await
            .best_effort(&format!("delete zone {} of {}", record.zone_id, record.label()));

        let message = format!("expired {} in INPUT", record.label());
        log::info!("{message}");
        self.ctx
            .log_sink
            .create(NewLogEntry::domain_check(message))
            .await
            .best_effort("write expiry log entry");

        Ok(DomainOutcome::Expired)
    }
}
