//! 上传者偏好持久化抽象 Trait

use async_trait::async_trait;

use crate::error::CoreResult;
use crate::types::UploaderPreferences;

/// 上传者偏好仓库 Trait
#[async_trait]
pub trait PreferenceRepository: Send + Sync {
    /// 所有 `domains` 中包含 `url` 的偏好
    async fn find_containing(&self, url: &str) -> CoreResult<Vec<UploaderPreferences>>;

    /// 获取用户的偏好
    async fn find_by_user(&self, user_id: &str) -> CoreResult<Option<UploaderPreferences>>;

    /// 保存或更新偏好（按 `id` upsert）
    async fn save(&self, preferences: &UploaderPreferences) -> CoreResult<()>;

    /// 仅替换域名列表
    ///
    /// Fails with `PreferencesNotFound` when `id` does not exist.
    async fn update_domains(&self, id: &str, domains: &[String]) -> CoreResult<()>;
}
