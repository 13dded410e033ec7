//! Utility modules.

/// Date/time serialization and storage encoding helpers.
pub mod datetime;
