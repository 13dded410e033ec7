//! Utility modules.

/// Date/time serialization helpers shared by providers.
pub mod datetime;

/// Response-body shortening for error messages and logs.
pub mod log_sanitizer;
