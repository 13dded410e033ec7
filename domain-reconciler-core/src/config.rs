//! Reconciler tuning knobs.

use std::net::Ipv4Addr;
use std::time::Duration;

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Settings shared by all three sweeps.
///
/// Every field has a default so a deployment only needs to supply the origin IP.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconcilerConfig {
    /// How long a domain may sit in `INPUT` or un-activated in `WAITING` (seconds).
    pub grace_period_secs: u64,
    /// Platform origin the apex and wildcard A records point at.
    pub origin_ip: Option<Ipv4Addr>,
    /// TTL of created records; `1` means automatic on Cloudflare.
    pub record_ttl: u32,
    /// Proxy created records through the provider edge.
    pub proxied: bool,
    /// Claim lease held on a record while a sweep works on it (seconds).
    pub lease_secs: u64,
    /// Upper bound for one provider call (seconds).
    pub provider_timeout_secs: u64,
}

impl Default for ReconcilerConfig {
    fn default() -> Self {
        Self {
            grace_period_secs: 2 * 24 * 60 * 60,
            origin_ip: None,
            record_ttl: 1,
            proxied: true,
            lease_secs: 300,
            provider_timeout_secs: 30,
        }
    }
}

impl ReconcilerConfig {
    #[must_use]
    pub fn grace_period(&self) -> TimeDelta {
        secs_to_delta(self.grace_period_secs)
    }

    #[must_use]
    pub fn lease(&self) -> TimeDelta {
        secs_to_delta(self.lease_secs)
    }

    #[must_use]
    pub fn provider_timeout(&self) -> Duration {
        Duration::from_secs(self.provider_timeout_secs)
    }

    /// Origin IP, required before any record can be created.
    pub fn require_origin_ip(&self) -> CoreResult<Ipv4Addr> {
        self.origin_ip
            .ok_or_else(|| CoreError::ValidationError("origin_ip is not configured".to_string()))
    }

    /// Rejects values that would make the sweeps misbehave.
    pub fn validate(&self) -> CoreResult<()> {
        if self.grace_period_secs == 0 {
            return Err(CoreError::ValidationError(
                "grace_period_secs must be positive".to_string(),
            ));
        }
        if self.lease_secs == 0 {
            return Err(CoreError::ValidationError(
                "lease_secs must be positive".to_string(),
            ));
        }
        if self.provider_timeout_secs == 0 {
            return Err(CoreError::ValidationError(
                "provider_timeout_secs must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

fn secs_to_delta(secs: u64) -> TimeDelta {
    i64::try_from(secs)
        .ok()
        .and_then(TimeDelta::try_seconds)
        .unwrap_or(TimeDelta::MAX)
}
