//! 扫描结果汇总

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Which sweep produced a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SweepKind {
    Intake,
    Activation,
    Liveness,
}

impl fmt::Display for SweepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Intake => "intake",
            Self::Activation => "activation",
            Self::Liveness => "liveness",
        })
    }
}

/// What happened to one claimed candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DomainOutcome {
    Promoted,
    Retired,
    Expired,
    Unchanged,
}

/// A per-domain failure collected during a sweep.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainFailure {
    pub domain_id: String,
    pub url: String,
    pub error: String,
}

/// Outcome counters for one sweep run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SweepReport {
    pub kind: SweepKind,
    #[serde(with = "crate::utils::datetime")]
    pub started_at: DateTime<Utc>,
    /// Candidates returned by the store.
    pub examined: usize,
    /// `WAITING -> DONE`
    pub promoted: usize,
    /// Deleted through the retirement saga.
    pub retired: usize,
    /// Deleted by the intake sweeper.
    pub expired: usize,
    pub unchanged: usize,
    /// Claimed by another worker.
    pub skipped: usize,
    pub failures: Vec<DomainFailure>,
}

impl SweepReport {
    #[must_use]
    pub fn new(kind: SweepKind, started_at: DateTime<Utc>) -> Self {
        Self {
            kind,
            started_at,
            examined: 0,
            promoted: 0,
            retired: 0,
            expired: 0,
            unchanged: 0,
            skipped: 0,
            failures: Vec::new(),
        }
    }

    pub(crate) fn tally(&mut self, outcome: DomainOutcome) {
        match outcome {
            DomainOutcome::Promoted => self.promoted += 1,
            DomainOutcome::Retired => self.retired += 1,
            DomainOutcome::Expired => self.expired += 1,
            DomainOutcome::Unchanged => self.unchanged += 1,
        }
    }

    pub(crate) fn record_failure(&mut self, domain_id: &str, url: &str, error: impl fmt::Display) {
        self.failures.push(DomainFailure {
            domain_id: domain_id.to_string(),
            url: url.to_string(),
            error: error.to_string(),
        });
    }

    #[must_use]
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}

impl fmt::Display for SweepReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} sweep: examined={} promoted={} retired={} expired={} unchanged={} skipped={} failed={}",
            self.kind,
            self.examined,
            self.promoted,
            self.retired,
            self.expired,
            self.unchanged,
            self.skipped,
            self.failures.len()
        )
    }
}

/// Reports of one full reconciliation cycle (intake, activation, liveness).
///
/// A sweep that could not list its candidates is recorded in `errors` instead.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CycleReport {
    pub sweeps: Vec<SweepReport>,
    pub errors: Vec<String>,
}

impl CycleReport {
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty() && self.sweeps.iter().all(|s| !s.has_failures())
    }

    #[must_use]
    pub fn sweep(&self, kind: SweepKind) -> Option<&SweepReport> {
        self.sweeps.iter().find(|s| s.kind == kind)
    }
}
