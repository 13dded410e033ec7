//! 测试辅助模块
//!
//! 提供 mock 实现和便捷的测试工厂方法。

use std::collections::{HashMap, HashSet};
use std::net::Ipv4Addr;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domain_reconciler_provider::{
    CreateDnsRecordRequest, DnsProvider, DnsRecord, ProviderError, ZoneState, ZoneStatus,
};
use tokio::sync::RwLock;

use crate::config::ReconcilerConfig;
use crate::error::{CoreError, CoreResult};
use crate::services::{Clock, ReconcilerContext};
use crate::traits::{
    DomainRecordRepository, LogSink, NotificationSink, PreferenceRepository, WebhookNotifier,
};
use crate::types::{
    DomainFilter, DomainRecord, NewDomainRecord, NewLogEntry, NewNotification, Progress,
    UploaderPreferences, WebhookMessage,
};

/// Parses an RFC3339 literal.
pub fn ts(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
}

/// "Now" of every harness unless overridden.
pub fn test_now() -> DateTime<Utc> {
    ts("2024-03-10T12:00:00Z")
}

pub fn fixed_clock(now: DateTime<Utc>) -> Clock {
    Arc::new(move || now)
}

pub const ORIGIN_IP: Ipv4Addr = Ipv4Addr::new(203, 0, 113, 7);

fn provider_error(zone_id: &str) -> ProviderError {
    ProviderError::ZoneNotFound {
        provider: "mock".to_string(),
        zone_id: zone_id.to_string(),
        raw_message: None,
    }
}

// ===== MockDomainRecordRepository =====

pub struct MockDomainRecordRepository {
    records: RwLock<HashMap<String, DomainRecord>>,
    /// delete 时对这些 ID 返回错误（用于测试单条失败隔离）
    delete_errors: RwLock<HashSet<String>>,
    list_error: RwLock<Option<String>>,
}

impl MockDomainRecordRepository {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
            delete_errors: RwLock::new(HashSet::new()),
            list_error: RwLock::new(None),
        }
    }

    pub async fn fail_delete_for(&self, id: &str) {
        self.delete_errors.write().await.insert(id.to_string());
    }

    pub async fn set_list_error(&self, err: Option<String>) {
        *self.list_error.write().await = err;
    }

    pub async fn get(&self, id: &str) -> Option<DomainRecord> {
        self.records.read().await.get(id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// Holds the lease on `id` until `until`, as another worker would.
    pub async fn lock(&self, id: &str, until: DateTime<Utc>) {
        if let Some(record) = self.records.write().await.get_mut(id) {
            record.locked_until = Some(until);
        }
    }
}

#[async_trait]
impl DomainRecordRepository for MockDomainRecordRepository {
    async fn find_many(&self, filter: &DomainFilter) -> CoreResult<Vec<DomainRecord>> {
        if let Some(ref msg) = *self.list_error.read().await {
            return Err(CoreError::StorageError(msg.clone()));
        }
        let mut records: Vec<DomainRecord> = self
            .records
            .read()
            .await
            .values()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect();
        records.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(records)
    }

    async fn find_by_id(&self, id: &str) -> CoreResult<Option<DomainRecord>> {
        Ok(self.records.read().await.get(id).cloned())
    }

    async fn create(&self, record: NewDomainRecord) -> CoreResult<DomainRecord> {
        let mut store = self.records.write().await;
        if store.values().any(|r| r.url == record.url) {
            return Err(CoreError::DuplicateDomain(record.url));
        }
        let created = DomainRecord {
            id: uuid::Uuid::new_v4().to_string(),
            url: record.url,
            donator_id: record.donator_id,
            zone_id: record.zone_id,
            progress: record.progress,
            public: record.public,
            created_at: record.created_at.unwrap_or_else(test_now),
            last_checked_at: None,
            locked_until: None,
        };
        store.insert(created.id.clone(), created.clone());
        Ok(created)
    }

    async fn touch_checked(&self, id: &str, at: DateTime<Utc>) -> CoreResult<()> {
        if let Some(record) = self.records.write().await.get_mut(id) {
            record.last_checked_at = Some(at);
        }
        Ok(())
    }

    async fn set_progress(&self, id: &str, progress: Progress) -> CoreResult<()> {
        let mut store = self.records.write().await;
        let record = store
            .get_mut(id)
            .ok_or_else(|| CoreError::DomainNotFound(id.to_string()))?;
        if !record.progress.can_advance_to(progress) {
            return Err(CoreError::InvalidTransition {
                from: record.progress,
                to: progress,
            });
        }
        record.progress = progress;
        Ok(())
    }

    async fn delete(&self, id: &str) -> CoreResult<()> {
        if self.delete_errors.read().await.contains(id) {
            return Err(CoreError::StorageError(format!("database is locked ({id})")));
        }
        self.records.write().await.remove(id);
        Ok(())
    }

    async fn try_claim(
        &self,
        id: &str,
        now: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> CoreResult<bool> {
        let mut store = self.records.write().await;
        match store.get_mut(id) {
            Some(record) if record.locked_until.is_none_or(|l| l < now) => {
                record.locked_until = Some(until);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn release_claim(&self, id: &str, lease: DateTime<Utc>) -> CoreResult<()> {
        if let Some(record) = self.records.write().await.get_mut(id) {
            if record.locked_until == Some(lease) {
                record.locked_until = None;
            }
        }
        Ok(())
    }
}

// ===== MockPreferenceRepository =====

pub struct MockPreferenceRepository {
    preferences: RwLock<HashMap<String, UploaderPreferences>>,
    /// 如果 Some，写入时返回此错误（用于测试中止路径）
    write_error: RwLock<Option<String>>,
}

impl MockPreferenceRepository {
    pub fn new() -> Self {
        Self {
            preferences: RwLock::new(HashMap::new()),
            write_error: RwLock::new(None),
        }
    }

    pub async fn set_write_error(&self, err: Option<String>) {
        *self.write_error.write().await = err;
    }

    pub async fn insert(&self, id: &str, user_id: &str, domains: &[&str]) {
        self.preferences.write().await.insert(
            id.to_string(),
            UploaderPreferences {
                id: id.to_string(),
                user_id: user_id.to_string(),
                domains: domains.iter().map(ToString::to_string).collect(),
            },
        );
    }

    pub async fn domains_of(&self, id: &str) -> Vec<String> {
        self.preferences
            .read()
            .await
            .get(id)
            .map(|p| p.domains.clone())
            .unwrap_or_default()
    }

    async fn check_write(&self) -> CoreResult<()> {
        match *self.write_error.read().await {
            Some(ref msg) => Err(CoreError::StorageError(msg.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl PreferenceRepository for MockPreferenceRepository {
    async fn find_containing(&self, url: &str) -> CoreResult<Vec<UploaderPreferences>> {
        let mut found: Vec<UploaderPreferences> = self
            .preferences
            .read()
            .await
            .values()
            .filter(|p| p.contains(url))
            .cloned()
            .collect();
        found.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(found)
    }

    async fn find_by_user(&self, user_id: &str) -> CoreResult<Option<UploaderPreferences>> {
        Ok(self
            .preferences
            .read()
            .await
            .values()
            .find(|p| p.user_id == user_id)
            .cloned())
    }

    async fn save(&self, preferences: &UploaderPreferences) -> CoreResult<()> {
        self.check_write().await?;
        self.preferences
            .write()
            .await
            .insert(preferences.id.clone(), preferences.clone());
        Ok(())
    }

    async fn update_domains(&self, id: &str, domains: &[String]) -> CoreResult<()> {
        self.check_write().await?;
        let mut store = self.preferences.write().await;
        let prefs = store
            .get_mut(id)
            .ok_or_else(|| CoreError::PreferencesNotFound(id.to_string()))?;
        prefs.domains = domains.to_vec();
        Ok(())
    }
}

// ===== Sinks =====

#[derive(Default)]
pub struct MockNotificationSink {
    pub sent: RwLock<Vec<NewNotification>>,
    pub fail: RwLock<bool>,
}

#[async_trait]
impl NotificationSink for MockNotificationSink {
    async fn create(&self, notification: NewNotification) -> CoreResult<()> {
        if *self.fail.read().await {
            return Err(CoreError::StorageError("notifications unavailable".to_string()));
        }
        self.sent.write().await.push(notification);
        Ok(())
    }
}

#[derive(Default)]
pub struct MockLogSink {
    pub entries: RwLock<Vec<NewLogEntry>>,
    pub fail: RwLock<bool>,
}

impl MockLogSink {
    pub async fn messages(&self) -> Vec<String> {
        self.entries
            .read()
            .await
            .iter()
            .map(|e| e.message.clone())
            .collect()
    }
}

#[async_trait]
impl LogSink for MockLogSink {
    async fn create(&self, entry: NewLogEntry) -> CoreResult<()> {
        if *self.fail.read().await {
            return Err(CoreError::StorageError("logs unavailable".to_string()));
        }
        self.entries.write().await.push(entry);
        Ok(())
    }
}

#[derive(Default)]
pub struct MockWebhookNotifier {
    pub posted: RwLock<Vec<WebhookMessage>>,
    pub fail: RwLock<bool>,
}

#[async_trait]
impl WebhookNotifier for MockWebhookNotifier {
    async fn post(&self, message: &WebhookMessage) -> CoreResult<()> {
        if *self.fail.read().await {
            return Err(CoreError::WebhookError("HTTP 500".to_string()));
        }
        self.posted.write().await.push(message.clone());
        Ok(())
    }
}

// ===== MockDnsProvider =====

/// Scriptable provider: per-zone status or failure, record bookkeeping.
///
/// Unknown zones answer `ZoneNotFound`.
pub struct MockDnsProvider {
    zones: RwLock<HashMap<String, Result<ZoneStatus, ProviderError>>>,
    /// (zone_id, name) 创建记录时返回的错误
    record_errors: RwLock<HashMap<(String, String), ProviderError>>,
    pub records: RwLock<Vec<DnsRecord>>,
    pub deleted_zones: RwLock<Vec<String>>,
    pub fail_zone_delete: RwLock<bool>,
}

impl MockDnsProvider {
    pub fn new() -> Self {
        Self {
            zones: RwLock::new(HashMap::new()),
            record_errors: RwLock::new(HashMap::new()),
            records: RwLock::new(Vec::new()),
            deleted_zones: RwLock::new(Vec::new()),
            fail_zone_delete: RwLock::new(false),
        }
    }

    pub async fn set_zone(&self, zone_id: &str, state: ZoneState, activated: bool) {
        let status = ZoneStatus {
            id: zone_id.to_string(),
            name: format!("{zone_id}.example"),
            state,
            activated_on: activated.then(|| ts("2024-03-09T08:00:00Z")),
            name_servers: vec!["ada.ns.cloudflare.com".to_string()],
        };
        self.zones
            .write()
            .await
            .insert(zone_id.to_string(), Ok(status));
    }

    pub async fn fail_zone(&self, zone_id: &str, err: ProviderError) {
        self.zones
            .write()
            .await
            .insert(zone_id.to_string(), Err(err));
    }

    pub async fn fail_record(&self, zone_id: &str, name: &str, err: ProviderError) {
        self.record_errors
            .write()
            .await
            .insert((zone_id.to_string(), name.to_string()), err);
    }

    pub async fn records_in(&self, zone_id: &str) -> Vec<DnsRecord> {
        self.records
            .read()
            .await
            .iter()
            .filter(|r| r.zone_id == zone_id)
            .cloned()
            .collect()
    }
}

/// A transient failure as produced by the HTTP layer.
pub fn network_error() -> ProviderError {
    ProviderError::NetworkError {
        provider: "mock".to_string(),
        detail: "connection reset".to_string(),
    }
}

#[async_trait]
impl DnsProvider for MockDnsProvider {
    fn id(&self) -> &'static str {
        "mock"
    }

    async fn validate_credentials(&self) -> domain_reconciler_provider::Result<bool> {
        Ok(true)
    }

    async fn get_zone_status(&self, zone_id: &str) -> domain_reconciler_provider::Result<ZoneStatus> {
        self.zones
            .read()
            .await
            .get(zone_id)
            .cloned()
            .unwrap_or_else(|| Err(provider_error(zone_id)))
    }

    async fn delete_zone(&self, zone_id: &str) -> domain_reconciler_provider::Result<()> {
        if *self.fail_zone_delete.read().await {
            return Err(network_error());
        }
        self.deleted_zones.write().await.push(zone_id.to_string());
        self.zones.write().await.remove(zone_id);
        Ok(())
    }

    async fn create_record(
        &self,
        req: &CreateDnsRecordRequest,
    ) -> domain_reconciler_provider::Result<DnsRecord> {
        if let Some(err) = self
            .record_errors
            .read()
            .await
            .get(&(req.zone_id.clone(), req.name.clone()))
        {
            return Err(err.clone());
        }
        let mut records = self.records.write().await;
        if records.iter().any(|r| {
            r.zone_id == req.zone_id && r.name == req.name && r.record_type == req.record_type
        }) {
            return Err(ProviderError::RecordExists {
                provider: "mock".to_string(),
                record_name: req.name.clone(),
                raw_message: None,
            });
        }
        let record = DnsRecord {
            id: format!("rec-{}", records.len() + 1),
            zone_id: req.zone_id.clone(),
            record_type: req.record_type,
            name: req.name.clone(),
            content: req.content.clone(),
            ttl: req.ttl,
            proxied: req.proxied,
        };
        records.push(record.clone());
        Ok(record)
    }
}

// ===== 工厂方法 =====

/// 测试用上下文和所有 mock 的句柄
pub struct TestHarness {
    pub ctx: Arc<ReconcilerContext>,
    pub domains: Arc<MockDomainRecordRepository>,
    pub preferences: Arc<MockPreferenceRepository>,
    pub notifications: Arc<MockNotificationSink>,
    pub logs: Arc<MockLogSink>,
    pub webhook: Arc<MockWebhookNotifier>,
    pub provider: Arc<MockDnsProvider>,
}

impl TestHarness {
    /// Inserts a record directly into the mock store.
    pub async fn seed(
        &self,
        url: &str,
        zone_id: &str,
        progress: Progress,
        created_at: DateTime<Utc>,
    ) -> DomainRecord {
        self.domains
            .create(NewDomainRecord {
                url: url.to_string(),
                donator_id: format!("donor-of-{url}"),
                zone_id: zone_id.to_string(),
                progress,
                public: true,
                created_at: Some(created_at),
            })
            .await
            .unwrap()
    }
}

/// 创建测试用 `ReconcilerContext`（固定时钟 [`test_now`]，已配置 origin IP）
pub fn harness() -> TestHarness {
    harness_with(ReconcilerConfig {
        origin_ip: Some(ORIGIN_IP),
        ..ReconcilerConfig::default()
    })
}

pub fn harness_with(config: ReconcilerConfig) -> TestHarness {
    let domains = Arc::new(MockDomainRecordRepository::new());
    let preferences = Arc::new(MockPreferenceRepository::new());
    let notifications = Arc::new(MockNotificationSink::default());
    let logs = Arc::new(MockLogSink::default());
    let webhook = Arc::new(MockWebhookNotifier::default());
    let provider = Arc::new(MockDnsProvider::new());

    let ctx = ReconcilerContext::new(
        domains.clone(),
        preferences.clone(),
        notifications.clone(),
        logs.clone(),
        provider.clone(),
        config,
    )
    .with_webhook(webhook.clone())
    .with_clock(fixed_clock(test_now()));

    TestHarness {
        ctx: Arc::new(ctx),
        domains,
        preferences,
        notifications,
        logs,
        webhook,
        provider,
    }
}
