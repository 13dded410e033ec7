use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // domains 表
        manager
            .create_table(
                Table::create()
                    .table(Domain::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Domain::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Domain::Url).string().not_null().unique_key())
                    .col(ColumnDef::new(Domain::DonatorId).string().not_null())
                    .col(ColumnDef::new(Domain::ZoneId).string().not_null())
                    .col(ColumnDef::new(Domain::Progress).string().not_null())
                    .col(
                        ColumnDef::new(Domain::Public)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Domain::CreatedAt).string().not_null())
                    .col(ColumnDef::new(Domain::LastCheckedAt).string().null())
                    .col(ColumnDef::new(Domain::LockedUntil).string().null())
                    .to_owned(),
            )
            .await?;

        // sweeps 按 (progress, created_at) 查询候选
        manager
            .create_index(
                Index::create()
                    .name("idx_domains_progress_created_at")
                    .table(Domain::Table)
                    .if_not_exists()
                    .col(Domain::Progress)
                    .col(Domain::CreatedAt)
                    .to_owned(),
            )
            .await?;

        // uploader_preferences 表
        manager
            .create_table(
                Table::create()
                    .table(UploaderPreferences::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UploaderPreferences::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(UploaderPreferences::UserId)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(UploaderPreferences::Domains)
                            .string()
                            .not_null()
                            .default("[]"),
                    )
                    .to_owned(),
            )
            .await?;

        // notifications 表
        manager
            .create_table(
                Table::create()
                    .table(Notification::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Notification::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Notification::ReceiverId).string().not_null())
                    .col(ColumnDef::new(Notification::Content).string().not_null())
                    .col(ColumnDef::new(Notification::CreatedAt).string().not_null())
                    .to_owned(),
            )
            .await?;

        // logs 表
        manager
            .create_table(
                Table::create()
                    .table(LogEntry::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(LogEntry::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(LogEntry::Message).string().not_null())
                    .col(ColumnDef::new(LogEntry::LogType).string().not_null())
                    .col(ColumnDef::new(LogEntry::CreatedAt).string().not_null())
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(LogEntry::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Notification::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(UploaderPreferences::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Domain::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Domain {
    #[sea_orm(iden = "domains")]
    Table,
    Id,
    Url,
    DonatorId,
    ZoneId,
    Progress,
    Public,
    CreatedAt,
    LastCheckedAt,
    LockedUntil,
}

#[derive(DeriveIden)]
enum UploaderPreferences {
    #[sea_orm(iden = "uploader_preferences")]
    Table,
    Id,
    UserId,
    Domains,
}

#[derive(DeriveIden)]
enum Notification {
    #[sea_orm(iden = "notifications")]
    Table,
    Id,
    ReceiverId,
    Content,
    CreatedAt,
}

#[derive(DeriveIden)]
enum LogEntry {
    #[sea_orm(iden = "logs")]
    Table,
    Id,
    Message,
    LogType,
    CreatedAt,
}
