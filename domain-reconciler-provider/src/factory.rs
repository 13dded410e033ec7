//! Provider factory functions.

use std::sync::Arc;

use crate::error::Result;
use crate::traits::DnsProvider;
use crate::types::ProviderCredentials;

#[cfg(feature = "cloudflare")]
use crate::providers::CloudflareProvider;

/// Creates a [`DnsProvider`] instance from the given credentials.
///
/// The concrete provider type is determined by the [`ProviderCredentials`] variant.
/// The returned provider is wrapped in `Arc<dyn DnsProvider>` so the sweepers can
/// share one client.
///
/// # Examples
///
/// ```rust,no_run
/// use domain_reconciler_provider::{create_provider, ProviderCredentials};
///
/// let provider = create_provider(ProviderCredentials::Cloudflare {
///     api_token: "your-token".to_string(),
/// }).unwrap();
/// ```
pub fn create_provider(credentials: ProviderCredentials) -> Result<Arc<dyn DnsProvider>> {
    match credentials {
        #[cfg(feature = "cloudflare")]
        ProviderCredentials::Cloudflare { api_token } => {
            if api_token.trim().is_empty() {
                return Err(crate::error::ProviderError::InvalidCredentials {
                    provider: "cloudflare".to_string(),
                    raw_message: Some("API token is empty".to_string()),
                });
            }
            Ok(Arc::new(CloudflareProvider::new(api_token)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProviderError;

    #[test]
    fn cloudflare_credentials_build_cloudflare_provider() {
        let provider = create_provider(ProviderCredentials::Cloudflare {
            api_token: "token".to_string(),
        })
        .unwrap();
        assert_eq!(provider.id(), "cloudflare");
    }

    #[test]
    fn blank_token_rejected() {
        let result = create_provider(ProviderCredentials::Cloudflare {
            api_token: "  ".to_string(),
        });
        assert!(matches!(
            result,
            Err(ProviderError::InvalidCredentials { .. })
        ));
    }
}
