//! SQLite-based unified store using `SeaORM`.
//!
//! A single `SqliteStore` implements `DomainRecordRepository`,
//! `PreferenceRepository`, `NotificationSink` and `LogSink`, backed by a
//! local `SQLite` database.

mod domain_record_repo;
pub(crate) mod entity;
mod migration;
mod preference_repo;
mod sink_repo;

use std::path::Path;

use domain_reconciler_core::error::{CoreError, CoreResult};
use sea_orm::{Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;

use migration::Migrator;

/// SQLite-based store shared by every sweep.
///
/// Timestamps are kept as fixed-width RFC3339 text (see
/// `domain_reconciler_core::utils::datetime::to_storage`), so range filters
/// compare the raw column.
pub struct SqliteStore {
    /// Shared `SeaORM` database connection.
    pub(crate) db: DatabaseConnection,
}

impl SqliteStore {
    /// Create a new `SQLite` store.
    ///
    /// `db_path` is created if it does not exist; the schema is migrated
    /// before the store is returned.
    ///
    /// # Errors
    /// Returns `CoreError::StorageError` if directory creation, database
    /// connection, or schema migration fails.
    pub async fn new(db_path: &Path) -> CoreResult<Self> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| CoreError::StorageError(format!("Failed to create directory: {e}")))?;
        }

        let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
        let db = Database::connect(&db_url)
            .await
            .map_err(|e| CoreError::StorageError(format!("Failed to connect to SQLite: {e}")))?;

        let store = Self { db };

        Migrator::up(&store.db, None)
            .await
            .map_err(|e| CoreError::StorageError(format!("Failed to run migrations: {e}")))?;

        Ok(store)
    }
}
