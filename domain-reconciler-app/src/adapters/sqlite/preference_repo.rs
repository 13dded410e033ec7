//! `PreferenceRepository` implementation for `SqliteStore`.

use async_trait::async_trait;
use sea_orm::{ActiveValue::Set, ColumnTrait, EntityTrait, QueryFilter, QueryOrder};

use domain_reconciler_core::error::{CoreError, CoreResult};
use domain_reconciler_core::traits::PreferenceRepository;
use domain_reconciler_core::types::UploaderPreferences;

use super::entity::uploader_preferences;
use super::SqliteStore;

impl uploader_preferences::Model {
    fn into_preferences(self) -> CoreResult<UploaderPreferences> {
        let domains: Vec<String> = serde_json::from_str(&self.domains)
            .map_err(|e| CoreError::SerializationError(format!("Invalid domains JSON: {e}")))?;

        Ok(UploaderPreferences {
            id: self.id,
            user_id: self.user_id,
            domains,
        })
    }
}

fn domains_json(domains: &[String]) -> CoreResult<String> {
    serde_json::to_string(domains).map_err(|e| CoreError::SerializationError(e.to_string()))
}

#[async_trait]
impl PreferenceRepository for SqliteStore {
    async fn find_containing(&self, url: &str) -> CoreResult<Vec<UploaderPreferences>> {
        // LIKE 只做粗筛，精确匹配在解析后进行
        let needle = serde_json::to_string(url)
            .map_err(|e| CoreError::SerializationError(e.to_string()))?;

        let rows = uploader_preferences::Entity::find()
            .filter(uploader_preferences::Column::Domains.contains(needle.as_str()))
            .order_by_asc(uploader_preferences::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| CoreError::StorageError(format!("Failed to query preferences: {e}")))?;

        let mut found = Vec::with_capacity(rows.len());
        for row in rows {
            let prefs = row.into_preferences()?;
            if prefs.contains(url) {
                found.push(prefs);
            }
        }
        Ok(found)
    }

    async fn find_by_user(&self, user_id: &str) -> CoreResult<Option<UploaderPreferences>> {
        let row = uploader_preferences::Entity::find()
            .filter(uploader_preferences::Column::UserId.eq(user_id))
            .one(&self.db)
            .await
            .map_err(|e| CoreError::StorageError(format!("Failed to query preferences: {e}")))?;

        row.map(uploader_preferences::Model::into_preferences)
            .transpose()
    }

    async fn save(&self, preferences: &UploaderPreferences) -> CoreResult<()> {
        let active = uploader_preferences::ActiveModel {
            id: Set(preferences.id.clone()),
            user_id: Set(preferences.user_id.clone()),
            domains: Set(domains_json(&preferences.domains)?),
        };

        uploader_preferences::Entity::insert(active)
            .on_conflict(
                sea_orm::sea_query::OnConflict::column(uploader_preferences::Column::Id)
                    .update_columns([
                        uploader_preferences::Column::UserId,
                        uploader_preferences::Column::Domains,
                    ])
                    .to_owned(),
            )
            .exec(&self.db)
            .await
            .map_err(|e| CoreError::StorageError(format!("Failed to save preferences: {e}")))?;

        Ok(())
    }

    async fn update_domains(&self, id: &str, domains: &[String]) -> CoreResult<()> {
        let result = uploader_preferences::Entity::update_many()
            .col_expr(
                uploader_preferences::Column::Domains,
                sea_orm::sea_query::Expr::value(domains_json(domains)?),
            )
            .filter(uploader_preferences::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| CoreError::StorageError(format!("Failed to update preferences: {e}")))?;

        if result.rows_affected == 0 {
            return Err(CoreError::PreferencesNotFound(id.to_string()));
        }
        Ok(())
    }
}
