//! Cloudflare DNS Provider

mod error;
mod http;
mod provider;
mod types;

use reqwest::Client;

use crate::http_client::RetryPolicy;
use crate::providers::common::create_http_client;

pub(crate) use types::{CloudflareDnsRecord, CloudflareResponse, CloudflareZone};

pub(crate) const CF_API_BASE: &str = "https://api.cloudflare.com/client/v4";

/// Cloudflare DNS Provider
pub struct CloudflareProvider {
    pub(crate) client: Client,
    pub(crate) api_token: String,
    pub(crate) api_base: String,
    pub(crate) retry: RetryPolicy,
}

impl CloudflareProvider {
    pub fn new(api_token: String) -> Self {
        Self {
            client: create_http_client(),
            api_token,
            api_base: CF_API_BASE.to_string(),
            retry: RetryPolicy::default(),
        }
    }

    /// Point the client at another API root (mock servers, API gateways).
    #[must_use]
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    #[must_use]
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}
