use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create activity_logs table
        manager
            .create_table(
                Table::create()
                    .table(ActivityLogs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ActivityLogs::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ActivityLogs::Timestamp).string().not_null())
                    .col(ColumnDef::new(ActivityLogs::Actor).string().not_null())
                    .col(ColumnDef::new(ActivityLogs::Endpoint).string_len(512).not_null())
                    .col(ColumnDef::new(ActivityLogs::Method).string_len(16).not_null())
                    .col(ColumnDef::new(ActivityLogs::IpAddress).string().null())
                    .col(ColumnDef::new(ActivityLogs::UserAgent).string_len(512).null())
                    .col(ColumnDef::new(ActivityLogs::StatusCode).integer().not_null())
                    .col(ColumnDef::new(ActivityLogs::RequestResult).string_len(16).not_null())
                    .col(ColumnDef::new(ActivityLogs::Request).text().not_null())
                    .col(ColumnDef::new(ActivityLogs::DurationMs).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // Create indexes separately
        manager
            .create_index(
                Index::create()
                    .name("idx_activity_logs_actor")
                    .table(ActivityLogs::Table)
                    .col(ActivityLogs::Actor)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_activity_logs_timestamp")
                    .table(ActivityLogs::Table)
                    .col(ActivityLogs::Timestamp)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ActivityLogs::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum ActivityLogs {
    Table,
    Id,
    Timestamp,
    Actor,
    Endpoint,
    Method,
    IpAddress,
    UserAgent,
    StatusCode,
    #[sea_orm(iden = "result")]
    RequestResult,
    Request,
    DurationMs,
}
