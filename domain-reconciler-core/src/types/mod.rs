//! 核心类型定义

mod domain;
mod notification;
mod preferences;
mod report;

pub use domain::{DomainFilter, DomainRecord, NewDomainRecord, Progress};
pub use notification::{LogType, NewLogEntry, NewNotification, WebhookMessage};
pub use preferences::UploaderPreferences;
pub use report::{CycleReport, DomainFailure, DomainOutcome, SweepKind, SweepReport};
