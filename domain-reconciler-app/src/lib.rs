//! Application wiring for the domain reconciler.
//!
//! Provides `AppState` (the three sweeps sharing one `ReconcilerContext`),
//! `AppStateBuilder` (adapter injection) and the storage / webhook adapters.

pub mod adapters;

use std::sync::Arc;

use domain_reconciler_core::error::{CoreError, CoreResult};
use domain_reconciler_core::services::{
    ActivationReconciler, Clock, IntakeSweeper, LivenessSweep, ReconcilerContext,
};
use domain_reconciler_core::traits::{
    DomainRecordRepository, LogSink, NotificationSink, PreferenceRepository, WebhookNotifier,
};
use domain_reconciler_core::types::{CycleReport, SweepKind, SweepReport};
use domain_reconciler_core::ReconcilerConfig;
use domain_reconciler_provider::DnsProvider;

/// Sweeps plus the context they share.
///
/// Every entry point constructs this once at startup via `AppStateBuilder`.
pub struct AppState {
    /// Service context (holds all adapters)
    pub ctx: Arc<ReconcilerContext>,
    pub intake: IntakeSweeper,
    pub activation: ActivationReconciler,
    pub liveness: LivenessSweep,
}

impl AppState {
    pub async fn run_intake(&self) -> CoreResult<SweepReport> {
        self.intake.run().await
    }

    pub async fn run_activation(&self) -> CoreResult<SweepReport> {
        self.activation.run().await
    }

    pub async fn run_liveness(&self) -> CoreResult<SweepReport> {
        self.liveness.run().await
    }

    /// Runs intake, activation and liveness in that order.
    ///
    /// A sweep that cannot list its candidates is recorded in
    /// `CycleReport::errors` and the remaining sweeps still run.
    pub async fn run_all(&self) -> CycleReport {
        let mut cycle = CycleReport::default();

        for kind in [SweepKind::Intake, SweepKind::Activation, SweepKind::Liveness] {
            let result = match kind {
                SweepKind::Intake => self.run_intake().await,
                SweepKind::Activation => self.run_activation().await,
                SweepKind::Liveness => self.run_liveness().await,
            };
            match result {
                Ok(report) => cycle.sweeps.push(report),
                Err(e) => {
                    log::error!("{kind} sweep aborted: {e}");
                    cycle.errors.push(format!("{kind}: {e}"));
                }
            }
        }

        cycle
    }
}

/// Builder for constructing `AppState` with platform-specific adapters.
///
/// # Required adapters
/// - `domain_repository`, `preference_repository`
/// - `notification_sink`, `log_sink`
/// - `provider`
///
/// # Optional
/// - `webhook`: defaults to `NoopWebhookNotifier`
/// - `config`: defaults to `ReconcilerConfig::default()`
/// - `clock`: defaults to `Utc::now`
#[derive(Default)]
pub struct AppStateBuilder {
    domain_repository: Option<Arc<dyn DomainRecordRepository>>,
    preference_repository: Option<Arc<dyn PreferenceRepository>>,
    notification_sink: Option<Arc<dyn NotificationSink>>,
    log_sink: Option<Arc<dyn LogSink>>,
    provider: Option<Arc<dyn DnsProvider>>,
    webhook: Option<Arc<dyn WebhookNotifier>>,
    config: Option<ReconcilerConfig>,
    clock: Option<Clock>,
}

impl AppStateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn domain_repository(mut self, repo: Arc<dyn DomainRecordRepository>) -> Self {
        self.domain_repository = Some(repo);
        self
    }

    #[must_use]
    pub fn preference_repository(mut self, repo: Arc<dyn PreferenceRepository>) -> Self {
        self.preference_repository = Some(repo);
        self
    }

    #[must_use]
    pub fn notification_sink(mut self, sink: Arc<dyn NotificationSink>) -> Self {
        self.notification_sink = Some(sink);
        self
    }

    #[must_use]
    pub fn log_sink(mut self, sink: Arc<dyn LogSink>) -> Self {
        self.log_sink = Some(sink);
        self
    }

    #[must_use]
    pub fn provider(mut self, provider: Arc<dyn DnsProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    #[must_use]
    pub fn webhook(mut self, webhook: Arc<dyn WebhookNotifier>) -> Self {
        self.webhook = Some(webhook);
        self
    }

    #[must_use]
    pub fn config(mut self, config: ReconcilerConfig) -> Self {
        self.config = Some(config);
        self
    }

    #[must_use]
    pub fn clock(mut self, clock: Clock) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Build the `AppState`.
    ///
    /// # Errors
    /// Returns `CoreError::ValidationError` if a required adapter is missing or
    /// the config is invalid.
    pub fn build(self) -> CoreResult<AppState> {
        let domain_repository = self.domain_repository.ok_or_else(|| {
            CoreError::ValidationError("domain_repository is required".to_string())
        })?;
        let preference_repository = self.preference_repository.ok_or_else(|| {
            CoreError::ValidationError("preference_repository is required".to_string())
        })?;
        let notification_sink = self.notification_sink.ok_or_else(|| {
            CoreError::ValidationError("notification_sink is required".to_string())
        })?;
        let log_sink = self
            .log_sink
            .ok_or_else(|| CoreError::ValidationError("log_sink is required".to_string()))?;
        let provider = self
            .provider
            .ok_or_else(|| CoreError::ValidationError("provider is required".to_string()))?;
        let config = self.config.unwrap_or_default();
        config.validate()?;

        let mut ctx = ReconcilerContext::new(
            domain_repository,
            preference_repository,
            notification_sink,
            log_sink,
            provider,
            config,
        );
        if let Some(webhook) = self.webhook {
            ctx = ctx.with_webhook(webhook);
        }
        if let Some(clock) = self.clock {
            ctx = ctx.with_clock(clock);
        }
        let ctx = Arc::new(ctx);

        Ok(AppState {
            intake: IntakeSweeper::new(Arc::clone(&ctx)),
            activation: ActivationReconciler::new(Arc::clone(&ctx)),
            liveness: LivenessSweep::new(Arc::clone(&ctx)),
            ctx,
        })
    }
}
