//! Storage layer abstraction trait definition

mod domain_record_repository;
mod preference_repository;
mod sinks;
mod webhook_notifier;

pub use domain_record_repository::DomainRecordRepository;
pub use preference_repository::PreferenceRepository;
pub use sinks::{LogSink, NotificationSink};
pub use webhook_notifier::{NoopWebhookNotifier, WebhookNotifier};
