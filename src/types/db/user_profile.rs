use sea_orm::entity::prelude::*;

use super::auditable::{AuditColumns, Auditable};

/// Customer profile, one per user
///
/// `addresses` and `preferences` hold owned records serialized as JSON,
/// see `types::internal::profile`.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "user_profiles")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub display_name: Option<String>,
    pub phone_number: Option<String>,
    pub avatar_url: Option<String>,
    #[sea_orm(column_type = "Text")]
    pub addresses: String,
    #[sea_orm(column_type = "Text")]
    pub preferences: String,
    pub loyalty_points: i32,
    pub created_at: DateTimeUtc,
    pub created_by: Option<String>,
    pub last_modified_at: DateTimeUtc,
    pub last_modified_by: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
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

    fn owned_columns() -> Vec<Column> {
        vec![Column::Addresses, Column::Preferences]
    }
}
