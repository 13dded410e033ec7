//! Provider 公共工具函数

use std::time::Duration;

use reqwest::Client;

use crate::error::{ProviderError, Result};
use crate::types::DnsRecordType;

// ============ HTTP Client ============

/// 默认连接超时（秒）
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
/// 默认请求超时（秒）
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// 创建带超时配置的 HTTP Client
///
/// Falls back to a client without timeouts if the TLS backend refuses the builder.
pub fn create_http_client() -> Client {
    Client::builder()
        .connect_timeout(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS))
        .timeout(Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS))
        .build()
        .unwrap_or_else(|e| {
            log::error!("Failed to build HTTP client with timeouts, using defaults: {e}");
            Client::new()
        })
}

// ============ 记录类型转换 ============

/// 将字符串转换为 `DnsRecordType`
pub fn parse_record_type(record_type: &str, provider: &str) -> Result<DnsRecordType> {
    match record_type.to_uppercase().as_str() {
        "A" => Ok(DnsRecordType::A),
        "AAAA" => Ok(DnsRecordType::Aaaa),
        "CNAME" => Ok(DnsRecordType::Cname),
        "TXT" => Ok(DnsRecordType::Txt),
        _ => Err(ProviderError::InvalidParameter {
            provider: provider.to_string(),
            param: "record_type".to_string(),
            detail: format!("unsupported record type: {record_type}"),
        }),
    }
}

/// 将 `DnsRecordType` 转换为大写字符串
pub fn record_type_to_string(record_type: DnsRecordType) -> &'static str {
    match record_type {
        DnsRecordType::A => "A",
        DnsRecordType::Aaaa => "AAAA",
        DnsRecordType::Cname => "CNAME",
        DnsRecordType::Txt => "TXT",
    }
}

// ============ 域名名称处理 ============

/// 去掉域名末尾的点
pub fn normalize_domain_name(name: &str) -> String {
    name.trim_end_matches('.').to_string()
}

/// 将完整域名转换为相对名称
/// 如: "www.example.com" + "example.com" -> "www"
/// 如: "example.com" + "example.com" -> "@"
pub fn full_name_to_relative(full_name: &str, zone_name: &str) -> String {
    let full = normalize_domain_name(full_name);
    let zone = normalize_domain_name(zone_name);

    if full == zone {
        "@".to_string()
    } else if let Some(subdomain) = full.strip_suffix(&format!(".{zone}")) {
        subdomain.to_string()
    } else {
        full
    }
}

/// 将相对名称转换为完整域名
/// 如: "*" + "example.com" -> "*.example.com"
/// 如: "@" + "example.com" -> "example.com"
pub fn relative_to_full_name(relative_name: &str, zone_name: &str) -> String {
    let zone = normalize_domain_name(zone_name);

    if relative_name == "@" || relative_name.is_empty() {
        zone
    } else {
        format!("{relative_name}.{zone}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apex_and_wildcard_round_trip() {
        assert_eq!(relative_to_full_name("@", "example.com"), "example.com");
        assert_eq!(relative_to_full_name("*", "example.com."), "*.example.com");
        assert_eq!(full_name_to_relative("example.com", "example.com"), "@");
        assert_eq!(full_name_to_relative("*.example.com", "example.com"), "*");
    }

    #[test]
    fn foreign_name_kept_whole() {
        assert_eq!(
            full_name_to_relative("www.other.org", "example.com"),
            "www.other.org"
        );
    }

    #[test]
    fn parse_record_type_is_case_insensitive() {
        assert!(matches!(
            parse_record_type("aaaa", "test"),
            Ok(DnsRecordType::Aaaa)
        ));
        assert!(matches!(
            parse_record_type("LOC", "test"),
            Err(ProviderError::InvalidParameter { .. })
        ));
    }
}
