//! Storage and notification adapters for the reconciler binaries.

mod webhook;

pub use webhook::HttpWebhookNotifier;

#[cfg(feature = "sqlite-store")]
mod sqlite;

#[cfg(feature = "sqlite-store")]
pub use sqlite::SqliteStore;
