//! Domain Reconciler Core Library
//!
//! Lifecycle reconciliation for user-donated custom domains:
//! - Intake Sweeper: expires records stuck in `INPUT`
//! - Activation Reconciler: installs records once the zone activates, retires
//!   domains that never do
//! - Liveness Sweep: retires domains whose zone disappeared or went inactive
//!
//! Storage, notifications and the DNS provider are reached only through the
//! traits in [`traits`]; the platform layer injects them via
//! [`ReconcilerContext`].

pub mod config;
pub mod error;
pub mod services;
pub mod traits;
pub mod types;
pub mod utils;

#[cfg(test)]
mod test_utils;

// Re-export common types
pub use config::ReconcilerConfig;
pub use error::{CoreError, CoreResult};
pub use services::{
    ActivationReconciler, BestEffort, Clock, IntakeSweeper, LivenessSweep, ReconcilerContext,
    RetirementService,
};
pub use traits::{
    DomainRecordRepository, LogSink, NoopWebhookNotifier, NotificationSink, PreferenceRepository,
    WebhookNotifier,
};
