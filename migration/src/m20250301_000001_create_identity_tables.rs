use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create users table
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Users::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Users::Username).string_len(64).not_null().unique_key())
                    .col(ColumnDef::new(Users::Email).string_len(256).not_null().unique_key())
                    .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                    .col(ColumnDef::new(Users::Status).string_len(16).not_null().default("active"))
                    .col(ColumnDef::new(Users::RefreshTokenHash).string().null())
                    .col(ColumnDef::new(Users::RefreshTokenExpiresAt).big_integer().null())
                    .col(ColumnDef::new(Users::LastLoginAt).big_integer().null())
                    .col(ColumnDef::new(Users::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Users::UpdatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // Create roles table
        manager
            .create_table(
                Table::create()
                    .table(Roles::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Roles::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Roles::Name).string_len(64).not_null().unique_key())
                    .col(ColumnDef::new(Roles::Description).string_len(256).null())
                    .col(ColumnDef::new(Roles::CreatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // Create user_roles join table
        manager
            .create_table(
                Table::create()
                    .table(UserRoles::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(UserRoles::UserId).string().not_null())
                    .col(ColumnDef::new(UserRoles::RoleId).string().not_null())
                    .primary_key(
                        Index::create()
                            .col(UserRoles::UserId)
                            .col(UserRoles::RoleId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_roles_user_id")
                            .from(UserRoles::Table, UserRoles::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_roles_role_id")
                            .from(UserRoles::Table, UserRoles::RoleId)
                            .to(Roles::Table, Roles::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create role_claims table
        manager
            .create_table(
                Table::create()
                    .table(RoleClaims::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RoleClaims::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(RoleClaims::RoleId).string().not_null())
                    .col(ColumnDef::new(RoleClaims::ClaimType).string_len(16).not_null())
                    .col(ColumnDef::new(RoleClaims::ClaimValue).string_len(128).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_role_claims_role_id")
                            .from(RoleClaims::Table, RoleClaims::RoleId)
                            .to(Roles::Table, Roles::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_role_claims_unique")
                    .table(RoleClaims::Table)
                    .col(RoleClaims::RoleId)
                    .col(RoleClaims::ClaimType)
                    .col(RoleClaims::ClaimValue)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Create user_profiles table
        manager
            .create_table(
                Table::create()
                    .table(UserProfiles::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(UserProfiles::UserId).string().not_null().primary_key())
                    .col(ColumnDef::new(UserProfiles::FirstName).string_len(128).null())
                    .col(ColumnDef::new(UserProfiles::LastName).string_len(128).null())
                    .col(ColumnDef::new(UserProfiles::DisplayName).string_len(128).null())
                    .col(ColumnDef::new(UserProfiles::PhoneNumber).string_len(32).null())
                    .col(ColumnDef::new(UserProfiles::AvatarUrl).string().null())
                    .col(ColumnDef::new(UserProfiles::Addresses).text().not_null().default("[]"))
                    .col(ColumnDef::new(UserProfiles::Preferences).text().not_null().default("{}"))
                    .col(ColumnDef::new(UserProfiles::LoyaltyPoints).integer().not_null().default(0))
                    .col(ColumnDef::new(UserProfiles::CreatedAt).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(UserProfiles::CreatedBy).string().null())
                    .col(ColumnDef::new(UserProfiles::LastModifiedAt).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(UserProfiles::LastModifiedBy).string().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_profiles_user_id")
                            .from(UserProfiles::Table, UserProfiles::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UserProfiles::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(RoleClaims::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(UserRoles::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Roles::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Username,
    Email,
    PasswordHash,
    Status,
    RefreshTokenHash,
    RefreshTokenExpiresAt,
    LastLoginAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Roles {
    Table,
    Id,
    Name,
    Description,
    CreatedAt,
}

#[derive(DeriveIden)]
enum UserRoles {
    Table,
    UserId,
    RoleId,
}

#[derive(DeriveIden)]
enum RoleClaims {
    Table,
    Id,
    RoleId,
    ClaimType,
    ClaimValue,
}

#[derive(DeriveIden)]
enum UserProfiles {
    Table,
    UserId,
    FirstName,
    LastName,
    DisplayName,
    PhoneNumber,
    AvatarUrl,
    Addresses,
    Preferences,
    LoyaltyPoints,
    CreatedAt,
    CreatedBy,
    LastModifiedAt,
    LastModifiedBy,
}
