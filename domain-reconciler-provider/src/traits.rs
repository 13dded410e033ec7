use async_trait::async_trait;

use crate::error::{ProviderError, Result};
use crate::types::{CreateDnsRecordRequest, DnsRecord, RecordOutcome, ZoneStatus};

/// 原始 API 错误（内部使用）
#[derive(Debug, Clone)]
pub(crate) struct RawApiError {
    /// 错误码（各 Provider 格式不同）
    pub code: Option<String>,
    /// 原始错误消息
    pub message: String,
}

impl RawApiError {
    #[cfg(test)]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
        }
    }

    pub fn with_code(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            message: message.into(),
        }
    }
}

/// 错误上下文信息（内部使用）
/// 用于在映射错误时提供额外信息
#[derive(Debug, Clone, Default)]
pub(crate) struct ErrorContext {
    /// 记录名称（用于 `RecordExists`）
    pub record_name: Option<String>,
    /// Zone ID（用于 `ZoneNotFound`）
    pub zone_id: Option<String>,
}

impl ErrorContext {
    pub fn zone(zone_id: &str) -> Self {
        Self {
            zone_id: Some(zone_id.to_string()),
            ..Self::default()
        }
    }

    pub fn record(zone_id: &str, record_name: &str) -> Self {
        Self {
            record_name: Some(record_name.to_string()),
            zone_id: Some(zone_id.to_string()),
        }
    }
}

/// Provider 错误映射 Trait（内部使用）
/// 各 Provider 实现此 trait 以将原始 API 错误映射到统一错误类型
pub(crate) trait ProviderErrorMapper {
    /// 返回 Provider 标识符
    fn provider_name(&self) -> &'static str;

    /// 将原始 API 错误映射到统一错误类型
    fn map_error(&self, raw: RawApiError, context: ErrorContext) -> ProviderError;

    /// 快捷方法：解析错误
    fn parse_error(&self, detail: impl ToString) -> ProviderError {
        ProviderError::ParseError {
            provider: self.provider_name().to_string(),
            detail: detail.to_string(),
        }
    }

    /// 快捷方法：未知错误（fallback）
    fn unknown_error(&self, raw: RawApiError) -> ProviderError {
        ProviderError::Unknown {
            provider: self.provider_name().to_string(),
            raw_code: raw.code,
            raw_message: raw.message,
        }
    }
}

/// DNS 提供商 Trait
///
/// The reconciler only needs the zone-level calls below; zone creation belongs
/// to the donation flow.
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// 提供商标识符
    fn id(&self) -> &'static str;

    /// 验证 API token 是否有效
    async fn validate_credentials(&self) -> Result<bool>;

    /// Fetch the zone's activation status.
    ///
    /// Fails with [`ProviderError::ZoneNotFound`] when the zone no longer exists.
    async fn get_zone_status(&self, zone_id: &str) -> Result<ZoneStatus>;

    /// Delete a zone. Callers treat failures as ignorable.
    async fn delete_zone(&self, zone_id: &str) -> Result<()>;

    /// 创建 DNS 记录
    ///
    /// Fails with [`ProviderError::RecordExists`] if an equivalent record is present.
    async fn create_record(&self, req: &CreateDnsRecordRequest) -> Result<DnsRecord>;

    /// Create a record, treating a duplicate as success.
    async fn ensure_record(&self, req: &CreateDnsRecordRequest) -> Result<RecordOutcome> {
        match self.create_record(req).await {
            Ok(record) => Ok(RecordOutcome::Created(record)),
            Err(ProviderError::RecordExists { record_name, .. }) => {
                log::debug!(
                    "[{}] record '{record_name}' already present in zone {}",
                    self.id(),
                    req.zone_id
                );
                Ok(RecordOutcome::AlreadyExists)
            }
            Err(e) => Err(e),
        }
    }
}
