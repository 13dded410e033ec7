//! `SeaORM` entities for `SqliteStore`.

pub mod domain;
pub mod log_entry;
pub mod notification;
pub mod uploader_preferences;
