//! Cloudflare API 类型定义

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Cloudflare API 通用响应
#[derive(Debug, Deserialize)]
pub struct CloudflareResponse<T> {
    pub success: bool,
    pub result: Option<T>,
    pub errors: Option<Vec<CloudflareError>>,
}

impl<T> CloudflareResponse<T> {
    /// First error as `(code, message)`.
    pub fn first_error(&self) -> (String, String) {
        self.errors
            .as_ref()
            .and_then(|errors| errors.first())
            .map_or_else(
                || (String::new(), "Unknown error".to_string()),
                |e| (e.code.to_string(), e.message.clone()),
            )
    }
}

#[derive(Debug, Deserialize)]
pub struct CloudflareError {
    pub code: i32,
    pub message: String,
}

/// Cloudflare Zone 结构
#[derive(Debug, Deserialize)]
pub struct CloudflareZone {
    pub id: String,
    pub name: String,
    pub status: String,
    #[serde(default, with = "crate::utils::datetime")]
    pub activated_on: Option<DateTime<Utc>>,
    #[serde(default)]
    pub name_servers: Vec<String>,
}

/// Cloudflare DNS Record 结构（响应）
#[derive(Debug, Deserialize)]
pub struct CloudflareDnsRecord {
    pub id: String,
    #[serde(rename = "type")]
    pub record_type: String,
    pub name: String,
    pub content: String,
    pub ttl: u32,
    #[serde(default)]
    pub proxied: Option<bool>,
}

/// `DELETE /zones/{id}` 响应
#[derive(Debug, Deserialize)]
pub struct CloudflareDeleted {
    pub id: String,
}
