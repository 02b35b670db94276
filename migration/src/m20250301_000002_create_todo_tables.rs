use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(TodoLists::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TodoLists::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(TodoLists::Title).string_len(200).not_null().unique_key())
                    .col(ColumnDef::new(TodoLists::Colour).string_len(7).not_null())
                    .col(ColumnDef::new(TodoLists::CreatedAt).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(TodoLists::CreatedBy).string().null())
                    .col(ColumnDef::new(TodoLists::LastModifiedAt).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(TodoLists::LastModifiedBy).string().null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(TodoItems::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TodoItems::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(TodoItems::ListId).big_integer().not_null())
                    .col(ColumnDef::new(TodoItems::Title).string_len(200).not_null())
                    .col(ColumnDef::new(TodoItems::Note).string_len(2000).null())
                    .col(ColumnDef::new(TodoItems::Priority).string_len(16).not_null().default("none"))
                    .col(ColumnDef::new(TodoItems::Reminder).timestamp_with_time_zone().null())
                    .col(ColumnDef::new(TodoItems::Done).boolean().not_null().default(false))
                    .col(ColumnDef::new(TodoItems::DoneAt).timestamp_with_time_zone().null())
                    .col(ColumnDef::new(TodoItems::CreatedAt).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(TodoItems::CreatedBy).string().null())
                    .col(ColumnDef::new(TodoItems::LastModifiedAt).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(TodoItems::LastModifiedBy).string().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_todo_items_list_id")
                            .from(TodoItems::Table, TodoItems::ListId)
                            .to(TodoLists::Table, TodoLists::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_todo_items_list_id")
                    .table(TodoItems::Table)
                    .col(TodoItems::ListId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TodoItems::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TodoLists::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum TodoLists {
    Table,
    Id,
    Title,
    Colour,
    CreatedAt,
    CreatedBy,
    LastModifiedAt,
    LastModifiedBy,
}

#[derive(DeriveIden)]
enum TodoItems {
    Table,
    Id,
    ListId,
    Title,
    Note,
    Priority,
    Reminder,
    Done,
    DoneAt,
    CreatedAt,
    CreatedBy,
    LastModifiedAt,
    LastModifiedBy,
}
