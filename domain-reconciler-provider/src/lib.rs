//! # domain-reconciler-provider
//!
//! DNS provider client used by the domain reconciler. It exposes the zone-level
//! calls the reconciler needs: zone status lookup, zone deletion and record
//! creation.
//!
//! ## Supported Providers
//!
//! | Provider | Feature Flag | Auth Method |
//! |----------|-------------|-------------|
//! | [Cloudflare](https://www.cloudflare.com/) | `cloudflare` | Bearer Token |
//!
//! ## Feature Flags
//!
//! - **`cloudflare`** *(default)*: Enable the Cloudflare provider.
//! - **`native-tls`** *(default)*: Use the platform's native TLS implementation.
//! - **`rustls`**: Use rustls. Recommended for cross-compilation and static builds.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use domain_reconciler_provider::{
//!     create_provider, CreateDnsRecordRequest, DnsRecordType, ProviderCredentials,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = create_provider(ProviderCredentials::Cloudflare {
//!         api_token: "your-token".to_string(),
//!     })?;
//!
//!     let status = provider.get_zone_status("023e105f4ecef8ad9ca31a8372d0c353").await?;
//!     if status.is_activated() {
//!         let outcome = provider
//!             .ensure_record(&CreateDnsRecordRequest {
//!                 zone_id: status.id.clone(),
//!                 name: "*".to_string(),
//!                 record_type: DnsRecordType::A,
//!                 content: "203.0.113.7".to_string(),
//!                 ttl: 1,
//!                 proxied: true,
//!             })
//!             .await?;
//!         println!("created: {}", outcome.is_created());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! All provider operations return [`Result<T, ProviderError>`](ProviderError).
//!
//! - [`ProviderError::ZoneNotFound`]: the zone no longer exists at the provider
//! - [`ProviderError::RecordExists`]: an equivalent record is already present
//! - [`ProviderError::InvalidCredentials`]: authentication failed
//! - [`ProviderError::RateLimited`] / [`ProviderError::NetworkError`]: transient
//!
//! Transient errors (`NetworkError`, `Timeout`, `RateLimited`) are retried with
//! exponential backoff according to [`RetryPolicy`].

mod error;
mod factory;
mod http_client;
mod providers;
mod traits;
mod types;
mod utils;

// Re-export error types
pub use error::{ProviderError, Result};

// Re-export factory functions
pub use factory::create_provider;

pub use http_client::RetryPolicy;

// Re-export core trait only (internal traits are not exported)
pub use traits::DnsProvider;

// Re-export types
pub use types::{
    CreateDnsRecordRequest, DnsRecord, DnsRecordType, ProviderCredentials,
    RecordOutcome, ZoneState, ZoneStatus,
};

// Re-export utils module
pub use utils::datetime;
pub use utils::log_sanitizer::truncate_body;

// Re-export concrete providers (behind feature flags)
#[cfg(feature = "cloudflare")]
pub use providers::CloudflareProvider;
