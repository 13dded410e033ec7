//! 捐赠域名记录类型定义

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Lifecycle stage of a donated domain.
///
/// Stages only move forward (`INPUT -> WAITING -> DONE`); leaving the
/// lifecycle means deleting the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Progress {
    /// Donor submitted the domain, nameservers not delegated yet.
    Input,
    /// Zone exists at the provider, waiting for activation.
    Waiting,
    /// Records installed, domain is linkable.
    Done,
}

impl Progress {
    /// 存储/日志使用的大写名称
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Input => "INPUT",
            Self::Waiting => "WAITING",
            Self::Done => "DONE",
        }
    }

    /// Whether `next` is a legal forward move from `self`.
    ///
    /// Setting the same stage again is allowed so retries stay idempotent.
    #[must_use]
    pub fn can_advance_to(self, next: Self) -> bool {
        next >= self
    }
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Progress {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "INPUT" => Ok(Self::Input),
            "WAITING" => Ok(Self::Waiting),
            "DONE" => Ok(Self::Done),
            other => Err(CoreError::ValidationError(format!(
                "unknown progress '{other}'"
            ))),
        }
    }
}

/// A user-donated custom domain tracked through its lifecycle.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DomainRecord {
    pub id: String,
    /// Hostname, unique across records.
    pub url: String,
    /// User who donated the domain.
    pub donator_id: String,
    /// Provider zone identifier.
    pub zone_id: String,
    pub progress: Progress,
    /// Opaque visibility flag owned by the donation flow.
    pub public: bool,
    #[serde(with = "crate::utils::datetime")]
    pub created_at: DateTime<Utc>,
    /// Stamped on every sweep that looks at the record.
    #[serde(default, with = "crate::utils::datetime::option")]
    pub last_checked_at: Option<DateTime<Utc>>,
    /// Claim lease held by a running sweep.
    #[serde(default, with = "crate::utils::datetime::option")]
    pub locked_until: Option<DateTime<Utc>>,
}

impl DomainRecord {
    /// Whether the record is older than `cutoff`.
    #[must_use]
    pub fn created_before(&self, cutoff: DateTime<Utc>) -> bool {
        self.created_at < cutoff
    }

    /// 日志中使用的标签：`{url} ({id})`
    #[must_use]
    pub fn label(&self) -> String {
        format!("{} ({})", self.url, self.id)
    }
}

/// 创建域名记录请求
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDomainRecord {
    pub url: String,
    pub donator_id: String,
    pub zone_id: String,
    pub progress: Progress,
    #[serde(default)]
    pub public: bool,
    /// Defaults to the store's current time.
    #[serde(default, with = "crate::utils::datetime::option")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Candidate query for the sweeps.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DomainFilter {
    /// Match any of these stages; empty matches every stage.
    pub progress: Vec<Progress>,
    /// Only records created strictly before this instant.
    pub created_before: Option<DateTime<Utc>>,
}

impl DomainFilter {
    /// Records in exactly one stage.
    #[must_use]
    pub fn progress(progress: Progress) -> Self {
        Self {
            progress: vec![progress],
            created_before: None,
        }
    }

    /// Records in any of the given stages.
    #[must_use]
    pub fn any_of(progress: &[Progress]) -> Self {
        Self {
            progress: progress.to_vec(),
            created_before: None,
        }
    }

    #[must_use]
    pub fn created_before(mut self, cutoff: DateTime<Utc>) -> Self {
        self.created_before = Some(cutoff);
        self
    }

    /// In-memory evaluation, used by stores without a query language.
    #[must_use]
    pub fn matches(&self, record: &DomainRecord) -> bool {
        (self.progress.is_empty() || self.progress.contains(&record.progress))
            && self
                .created_before
                .is_none_or(|cutoff| record.created_before(cutoff))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn record(progress: Progress, created_at: DateTime<Utc>) -> DomainRecord {
        DomainRecord {
            id: "d-1".to_string(),
            url: "example.com".to_string(),
            donator_id: "u-1".to_string(),
            zone_id: "z-1".to_string(),
            progress,
            public: true,
            created_at,
            last_checked_at: None,
            locked_until: None,
        }
    }

    #[test]
    fn progress_only_moves_forward() {
        assert!(Progress::Input.can_advance_to(Progress::Waiting));
        assert!(Progress::Waiting.can_advance_to(Progress::Done));
        assert!(Progress::Input.can_advance_to(Progress::Done));
        assert!(Progress::Done.can_advance_to(Progress::Done));
        assert!(!Progress::Done.can_advance_to(Progress::Waiting));
        assert!(!Progress::Waiting.can_advance_to(Progress::Input));
    }

    #[test]
    fn progress_parses_storage_names() {
        assert_eq!("WAITING".parse::<Progress>().unwrap(), Progress::Waiting);
        assert_eq!("done".parse::<Progress>().unwrap(), Progress::Done);
        assert!("ARCHIVED".parse::<Progress>().is_err());
        assert_eq!(
            serde_json::to_string(&Progress::Input).unwrap(),
            "\"INPUT\""
        );
    }

    #[test]
    fn filter_combines_stage_and_age() {
        let now = Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap();
        let old = record(Progress::Input, now - Duration::days(3));
        let fresh = record(Progress::Input, now - Duration::hours(1));
        let waiting = record(Progress::Waiting, now - Duration::days(3));

        let filter = DomainFilter::progress(Progress::Input).created_before(now - Duration::days(2));
        assert!(filter.matches(&old));
        assert!(!filter.matches(&fresh));
        assert!(!filter.matches(&waiting));

        let any = DomainFilter::any_of(&[Progress::Waiting, Progress::Done]);
        assert!(any.matches(&waiting));
        assert!(!any.matches(&old));
        assert!(DomainFilter::default().matches(&fresh));
    }

    #[test]
    fn label_has_url_and_id() {
        let r = record(Progress::Done, Utc::now());
        assert_eq!(r.label(), "example.com (d-1)");
    }
}
