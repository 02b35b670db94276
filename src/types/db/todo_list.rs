use sea_orm::entity::prelude::*;

use super::auditable::{AuditColumns, Auditable};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "todo_lists")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub title: String,
    pub colour: String,
    pub created_at: DateTimeUtc,
    pub created_by: Option<String>,
    pub last_modified_at: DateTimeUtc,
    pub last_modified_by: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::todo_item::Entity")]
    TodoItem,
}

impl Related<super::todo_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TodoItem.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Auditable for ActiveModel {
    fn audit_columns() -> AuditColumns<Column> {
        AuditColumns {
            created_at: Column::CreatedAt,
            created_by: Column::CreatedBy,
            last_modified_at: Column::LastModifiedAt,
            last_modified_by: Column::LastModifiedBy,
        }
    }
}
