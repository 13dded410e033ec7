//! `SeaORM` entity for the `domains` table.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "domains")]
/// Database row model for a donated domain.
///
/// Timestamp columns hold `datetime::to_storage` text and are range-filtered
/// as plain strings.
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(unique)]
    pub url: String,
    pub donator_id: String,
    pub zone_id: String,
    pub progress: String,
    pub public: i32,
    pub created_at: String,
    pub last_checked_at: Option<String>,
    pub locked_until: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
