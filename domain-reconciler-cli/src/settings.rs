//! Runtime settings: TOML file first, then environment overrides.

use std::net::Ipv4Addr;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use domain_reconciler_core::ReconcilerConfig;

/// Looked up in the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "reconciler.toml";

pub const ENV_DATABASE_PATH: &str = "RECONCILER_DATABASE_PATH";
pub const ENV_API_TOKEN: &str = "CLOUDFLARE_API_TOKEN";
pub const ENV_ORIGIN_IP: &str = "RECONCILER_ORIGIN_IP";
pub const ENV_WEBHOOK_URL: &str = "RECONCILER_WEBHOOK_URL";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub database: DatabaseSettings,
    pub provider: ProviderSettings,
    pub webhook: WebhookSettings,
    pub reconciler: ReconcilerConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    pub path: PathBuf,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data/reconciler.db"),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProviderSettings {
    pub api_token: Option<String>,
    /// Override for the Cloudflare API base URL (testing, proxies).
    pub api_base: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WebhookSettings {
    pub url: Option<String>,
    pub timeout_secs: u64,
}

impl Default for WebhookSettings {
    fn default() -> Self {
        Self {
            url: None,
            timeout_secs: 10,
        }
    }
}

impl Settings {
    /// Loads the TOML file (explicit path, or `reconciler.toml` if present)
    /// and applies environment overrides.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut settings = match explicit {
            Some(path) => Self::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => Self::default(),
        };
        settings.apply_env(|key| std::env::var(key).ok())?;
        Ok(settings)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_toml(&raw).with_context(|| format!("invalid config file {}", path.display()))
    }

    pub fn from_toml(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    /// Environment variables win over file values; blank values are ignored.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(path) = get(ENV_DATABASE_PATH) {
            self.database.path = PathBuf::from(path);
        }
        if let Some(token) = get(ENV_API_TOKEN) {
            self.provider.api_token = Some(token);
        }
        if let Some(ip) = get(ENV_ORIGIN_IP) {
            let parsed: Ipv4Addr = ip
                .trim()
                .parse()
                .with_context(|| format!("{ENV_ORIGIN_IP} is not an IPv4 address: {ip}"))?;
            self.reconciler.origin_ip = Some(parsed);
        }
        if let Some(url) = get(ENV_WEBHOOK_URL) {
            self.webhook.url = Some(url);
        }
        Ok(())
    }

    /// The provider token, required by every command that talks to the provider.
    pub fn api_token(&self) -> Result<&str> {
        match self.provider.api_token.as_deref() {
            Some(token) if !token.trim().is_empty() => Ok(token),
            _ => bail!("provider API token is missing (set [provider].api_token or {ENV_API_TOKEN})"),
        }
    }
}
