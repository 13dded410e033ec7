//! `DomainRecordRepository` implementation for `SqliteStore`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, DbErr,
    EntityTrait, QueryFilter, QueryOrder, SqlErr,
};

use domain_reconciler_core::error::{CoreError, CoreResult};
use domain_reconciler_core::traits::DomainRecordRepository;
use domain_reconciler_core::types::{DomainFilter, DomainRecord, NewDomainRecord, Progress};
use domain_reconciler_core::utils::datetime::{from_storage, to_storage};

use super::entity::domain;
use super::SqliteStore;

fn parse_time(field: &str, raw: &str) -> CoreResult<DateTime<Utc>> {
    from_storage(raw).map_err(|e| CoreError::SerializationError(format!("Invalid {field}: {e}")))
}

impl domain::Model {
    /// Convert a `SeaORM` row model into a `DomainRecord`.
    fn into_record(self) -> CoreResult<DomainRecord> {
        let progress: Progress = self.progress.parse().map_err(|_| {
            CoreError::SerializationError(format!("Invalid progress: {}", self.progress))
        })?;
        let created_at = parse_time("created_at", &self.created_at)?;
        let last_checked_at = self
            .last_checked_at
            .as_deref()
            .map(|s| parse_time("last_checked_at", s))
            .transpose()?;
        let locked_until = self
            .locked_until
            .as_deref()
            .map(|s| parse_time("locked_until", s))
            .transpose()?;

        Ok(DomainRecord {
            id: self.id,
            url: self.url,
            donator_id: self.donator_id,
            zone_id: self.zone_id,
            progress,
            public: self.public != 0,
            created_at,
            last_checked_at,
            locked_until,
        })
    }
}

fn storage_error(action: &str) -> impl FnOnce(DbErr) -> CoreError + '_ {
    move |e| CoreError::StorageError(format!("Failed to {action}: {e}"))
}

impl SqliteStore {
    async fn find_domain_row(&self, id: &str) -> CoreResult<Option<domain::Model>> {
        domain::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(storage_error("query domain"))
    }
}

#[async_trait]
impl DomainRecordRepository for SqliteStore {
    async fn find_many(&self, filter: &DomainFilter) -> CoreResult<Vec<DomainRecord>> {
        let mut query = domain::Entity::find();
        if !filter.progress.is_empty() {
            query = query.filter(
                domain::Column::Progress.is_in(filter.progress.iter().map(|p| p.as_str())),
            );
        }
        if let Some(cutoff) = filter.created_before {
            query = query.filter(domain::Column::CreatedAt.lt(to_storage(&cutoff)));
        }

        let rows = query
            .order_by_asc(domain::Column::CreatedAt)
            .order_by_asc(domain::Column::Id)
            .all(&self.db)
            .await
            .map_err(storage_error("query domains"))?;

        rows.into_iter().map(domain::Model::into_record).collect()
    }

    async fn find_by_id(&self, id: &str) -> CoreResult<Option<DomainRecord>> {
        self.find_domain_row(id)
            .await?
            .map(domain::Model::into_record)
            .transpose()
    }

    async fn create(&self, record: NewDomainRecord) -> CoreResult<DomainRecord> {
        let created_at = record.created_at.unwrap_or_else(Utc::now);
        let active = domain::ActiveModel {
            id: Set(uuid::Uuid::new_v4().to_string()),
            url: Set(record.url.clone()),
            donator_id: Set(record.donator_id),
            zone_id: Set(record.zone_id),
            progress: Set(record.progress.as_str().to_string()),
            public: Set(i32::from(record.public)),
            created_at: Set(to_storage(&created_at)),
            last_checked_at: Set(None),
            locked_until: Set(None),
        };

        let model = active.insert(&self.db).await.map_err(|e| match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => CoreError::DuplicateDomain(record.url),
            _ => CoreError::StorageError(format!("Failed to insert domain: {e}")),
        })?;

        model.into_record()
    }

    async fn touch_checked(&self, id: &str, at: DateTime<Utc>) -> CoreResult<()> {
        domain::Entity::update_many()
            .col_expr(
                domain::Column::LastCheckedAt,
                Expr::value(Some(to_storage(&at))),
            )
            .filter(domain::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(storage_error("stamp domain check"))?;
        Ok(())
    }

    async fn set_progress(&self, id: &str, progress: Progress) -> CoreResult<()> {
        let current = self
            .find_domain_row(id)
            .await?
            .ok_or_else(|| CoreError::DomainNotFound(id.to_string()))?
            .into_record()?
            .progress;

        if !current.can_advance_to(progress) {
            return Err(CoreError::InvalidTransition {
                from: current,
                to: progress,
            });
        }

        let active = domain::ActiveModel {
            id: Set(id.to_string()),
            progress: Set(progress.as_str().to_string()),
            ..Default::default()
        };
        active
            .update(&self.db)
            .await
            .map_err(storage_error("update progress"))?;
        Ok(())
    }

    async fn delete(&self, id: &str) -> CoreResult<()> {
        domain::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(storage_error("delete domain"))?;
        Ok(())
    }

    async fn try_claim(
        &self,
        id: &str,
        now: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> CoreResult<bool> {
        // 单条条件 UPDATE，SQLite 写锁保证只有一个 sweep 成功
        let result = domain::Entity::update_many()
            .col_expr(
                domain::Column::LockedUntil,
                Expr::value(Some(to_storage(&until))),
            )
            .filter(domain::Column::Id.eq(id))
            .filter(
                Condition::any()
                    .add(domain::Column::LockedUntil.is_null())
                    .add(domain::Column::LockedUntil.lt(to_storage(&now))),
            )
            .exec(&self.db)
            .await
            .map_err(storage_error("claim domain"))?;

        Ok(result.rows_affected == 1)
    }

    async fn release_claim(&self, id: &str, lease: DateTime<Utc>) -> CoreResult<()> {
        // 只释放自己持有的租约；过期后被接管的租约不动
        domain::Entity::update_many()
            .col_expr(domain::Column::LockedUntil, Expr::value(Option::<String>::None))
            .filter(domain::Column::Id.eq(id))
            .filter(domain::Column::LockedUntil.eq(to_storage(&lease)))
            .exec(&self.db)
            .await
            .map_err(storage_error("release domain claim"))?;
        Ok(())
    }
}
