//! Cloudflare DnsProvider trait 实现

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{ProviderError, Result};
use crate::providers::common::{
    full_name_to_relative, parse_record_type, record_type_to_string, relative_to_full_name,
};
use crate::traits::{DnsProvider, ErrorContext, ProviderErrorMapper};
use crate::types::{CreateDnsRecordRequest, DnsRecord, ZoneState, ZoneStatus};

use super::types::CloudflareDeleted;
use super::{CloudflareDnsRecord, CloudflareProvider, CloudflareZone};

impl CloudflareProvider {
    /// 将 Cloudflare zone 转换为 `ZoneStatus`
    /// Cloudflare 状态：active, pending, initializing, moved, deleted, deactivated
    pub(crate) fn zone_to_status(zone: CloudflareZone) -> ZoneStatus {
        let state = match zone.status.as_str() {
            "active" => ZoneState::Active,
            "pending" => ZoneState::Pending,
            "initializing" => ZoneState::Initializing,
            "moved" => ZoneState::Moved,
            "deleted" => ZoneState::Deleted,
            "deactivated" => ZoneState::Deactivated,
            other => {
                log::debug!("[cloudflare] unrecognised zone status '{other}'");
                ZoneState::Unknown
            }
        };

        ZoneStatus {
            id: zone.id,
            name: zone.name,
            state,
            activated_on: zone.activated_on,
            name_servers: zone.name_servers,
        }
    }

    /// 将 Cloudflare 记录转换为 `DnsRecord`
    pub(crate) fn cf_record_to_dns_record(
        &self,
        cf_record: CloudflareDnsRecord,
        zone_id: &str,
        zone_name: &str,
    ) -> Result<DnsRecord> {
        let record_type = parse_record_type(&cf_record.record_type, self.provider_name())?;

        Ok(DnsRecord {
            id: cf_record.id,
            zone_id: zone_id.to_string(),
            record_type,
            name: full_name_to_relative(&cf_record.name, zone_name),
            content: cf_record.content,
            ttl: cf_record.ttl,
            proxied: cf_record.proxied.unwrap_or(false),
        })
    }

    async fn fetch_zone(&self, zone_id: &str) -> Result<CloudflareZone> {
        self.get(&format!("/zones/{zone_id}"), ErrorContext::zone(zone_id))
            .await
    }
}

#[async_trait]
impl DnsProvider for CloudflareProvider {
    fn id(&self) -> &'static str {
        "cloudflare"
    }

    async fn validate_credentials(&self) -> Result<bool> {
        #[derive(Deserialize)]
        struct VerifyResponse {
            status: String,
        }

        match self
            .get::<VerifyResponse>("/user/tokens/verify", ErrorContext::default())
            .await
        {
            Ok(resp) => Ok(resp.status == "active"),
            Err(ProviderError::InvalidCredentials { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }

    async fn get_zone_status(&self, zone_id: &str) -> Result<ZoneStatus> {
        let zone = self.fetch_zone(zone_id).await?;
        Ok(Self::zone_to_status(zone))
    }

    async fn delete_zone(&self, zone_id: &str) -> Result<()> {
        let deleted: CloudflareDeleted = self
            .delete(&format!("/zones/{zone_id}"), ErrorContext::zone(zone_id))
            .await?;
        log::debug!("[cloudflare] deleted zone {}", deleted.id);
        Ok(())
    }

    async fn create_record(&self, req: &CreateDnsRecordRequest) -> Result<DnsRecord> {
        // 先获取 zone 信息
        let zone = self.fetch_zone(&req.zone_id).await?;
        let zone_name = zone.name;

        let full_name = relative_to_full_name(&req.name, &zone_name);

        #[derive(Serialize)]
        struct CreateRecordBody<'a> {
            #[serde(rename = "type")]
            record_type: &'static str,
            name: String,
            content: &'a str,
            ttl: u32,
            proxied: bool,
        }

        let body = CreateRecordBody {
            record_type: record_type_to_string(req.record_type),
            name: full_name,
            content: &req.content,
            ttl: req.ttl,
            proxied: req.proxied,
        };

        let cf_record: CloudflareDnsRecord = self
            .post(
                &format!("/zones/{}/dns_records", req.zone_id),
                &body,
                ErrorContext::record(&req.zone_id, &req.name),
            )
            .await?;

        self.cf_record_to_dns_record(cf_record, &req.zone_id, &zone_name)
    }
}
