use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============ Credentials ============

/// Credentials needed to construct a provider client.
#[derive(Clone, Serialize, Deserialize)]
#[serde(tag = "provider", rename_all = "lowercase")]
pub enum ProviderCredentials {
    /// Cloudflare API token (needs `Zone:Edit` and `DNS:Edit`).
    #[cfg(feature = "cloudflare")]
    Cloudflare {
        /// Bearer token.
        api_token: String,
    },
}

impl std::fmt::Debug for ProviderCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {
            #[cfg(feature = "cloudflare")]
            Self::Cloudflare { .. } => f
                .debug_struct("Cloudflare")
                .field("api_token", &"<redacted>")
                .finish(),
        }
    }
}

// ============ Zone Types ============

/// Provider-side lifecycle state of a zone.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ZoneState {
    /// Nameservers are delegated and the zone is serving.
    Active,
    /// Waiting for nameserver delegation.
    Pending,
    /// Zone is being set up.
    Initializing,
    /// Nameservers were moved away from the provider.
    Moved,
    /// Zone was deleted.
    Deleted,
    /// Zone was deactivated (billing lapse, abuse, manual action).
    Deactivated,
    /// Status could not be determined.
    Unknown,
}

impl ZoneState {
    /// Whether the zone can never become active again without manual work.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Moved | Self::Deleted | Self::Deactivated)
    }
}

/// Zone status as reported by the provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneStatus {
    /// Provider zone identifier.
    pub id: String,
    /// Zone apex name (e.g. `"example.com"`).
    pub name: String,
    /// Lifecycle state.
    pub state: ZoneState,
    /// When the provider first saw the delegation; `None` until activated.
    #[serde(default, with = "crate::utils::datetime")]
    pub activated_on: Option<DateTime<Utc>>,
    /// Nameservers the donor must delegate to.
    #[serde(default)]
    pub name_servers: Vec<String>,
}

impl ZoneStatus {
    /// Activation is decided only by the activation timestamp.
    pub fn is_activated(&self) -> bool {
        self.activated_on.is_some()
    }
}

// ============ DNS Record Types ============

/// Supported DNS record types.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum DnsRecordType {
    /// IPv4 address.
    A,
    /// IPv6 address.
    Aaaa,
    /// Canonical name.
    Cname,
    /// Text record.
    Txt,
}

/// A DNS record returned by the provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DnsRecord {
    /// Provider record identifier.
    pub id: String,
    /// Zone the record belongs to.
    pub zone_id: String,
    /// Record type.
    pub record_type: DnsRecordType,
    /// Name relative to the zone apex (`"@"` for the apex itself).
    pub name: String,
    /// Record content (address, target, text).
    pub content: String,
    /// TTL in seconds (`1` means automatic on Cloudflare).
    pub ttl: u32,
    /// Whether traffic is proxied through the provider edge.
    pub proxied: bool,
}

/// Request to create a DNS record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDnsRecordRequest {
    /// Target zone.
    pub zone_id: String,
    /// Name relative to the zone apex (`"@"`, `"*"`, `"www"`).
    pub name: String,
    /// Record type.
    pub record_type: DnsRecordType,
    /// Record content.
    pub content: String,
    /// TTL in seconds.
    pub ttl: u32,
    /// Whether to proxy through the provider edge.
    pub proxied: bool,
}

/// Outcome of an idempotent record creation.
#[derive(Debug, Clone)]
pub enum RecordOutcome {
    /// The record was created by this call.
    Created(DnsRecord),
    /// An identical record was already present.
    AlreadyExists,
}

impl RecordOutcome {
    /// Whether this call created the record.
    pub fn is_created(&self) -> bool {
        matches!(self, Self::Created(_))
    }
}
