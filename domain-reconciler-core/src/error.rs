//! Unified error type definition

use serde::Serialize;
use thiserror::Error;

use crate::types::Progress;

// Re-export library error type
pub use domain_reconciler_provider::ProviderError;

/// Core layer error type
#[derive(Error, Debug, Serialize)]
#[serde(tag = "code", content = "details")]
pub enum CoreError {
    /// Domain record not found
    #[error("Domain not found: {0}")]
    DomainNotFound(String),

    /// Uploader preferences not found
    #[error("Preferences not found: {0}")]
    PreferencesNotFound(String),

    /// Progress may only move forward
    #[error("Invalid progress transition: {from} -> {to}")]
    InvalidTransition { from: Progress, to: Progress },

    /// A record with the same url already exists
    #[error("Domain already registered: {0}")]
    DuplicateDomain(String),

    /// serialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Validation error
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Storage layer error
    #[error("Storage error: {0}")]
    StorageError(String),

    /// Operator webhook delivery failed
    #[error("Webhook error: {0}")]
    WebhookError(String),

    /// Provider error (converting from library)
    #[error("{0}")]
    Provider(#[from] ProviderError),
}

impl CoreError {
    /// Whether it is expected behavior (bad input, resource does not exist, etc.) is used for log classification.
    ///
    /// Level `warn` should be used when returning `true` and level `error` when returning `false`.
    /// **Please update this method simultaneously when new variants are added. **
    #[must_use]
    pub fn is_expected(&self) -> bool {
        match self {
            Self::DomainNotFound(_)
            | Self::PreferencesNotFound(_)
            | Self::InvalidTransition { .. }
            | Self::DuplicateDomain(_)
            | Self::ValidationError(_) => true,
            Self::Provider(e) => e.is_expected(),
            _ => false,
        }
    }

    /// Transient provider failures leave state untouched and are retried on the next sweep.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Provider(e) if e.is_transient())
    }
}

/// Core layer Result type alias
pub type CoreResult<T> = std::result::Result<T, CoreError>;
