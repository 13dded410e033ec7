//! 上传者偏好类型定义

use serde::{Deserialize, Serialize};

/// Per-user upload preferences.
///
/// `domains` holds the custom-domain URLs the user picked for link generation.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UploaderPreferences {
    pub id: String,
    pub user_id: String,
    #[serde(default)]
    pub domains: Vec<String>,
}

impl UploaderPreferences {
    #[must_use]
    pub fn contains(&self, url: &str) -> bool {
        self.domains.iter().any(|d| d == url)
    }

    /// Drops every occurrence of `url`; returns whether anything was removed.
    pub fn remove_domain(&mut self, url: &str) -> bool {
        let before = self.domains.len();
        self.domains.retain(|d| d != url);
        self.domains.len() != before
    }
}
