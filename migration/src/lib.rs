pub use sea_orm_migration::prelude::*;

mod m20250301_000001_create_identity_tables;
mod m20250301_000002_create_todo_tables;
mod m20250301_000003_create_activity_logs;

/// Identity, profile and todo tables
pub struct AppMigrator;

#[async_trait::async_trait]
impl MigratorTrait for AppMigrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_identity_tables::Migration),
            Box::new(m20250301_000002_create_todo_tables::Migration),
        ]
    }
}

/// Activity log tables, kept separate so they can live in their own database
pub struct ActivityLogMigrator;

#[async_trait::async_trait]
impl MigratorTrait for ActivityLogMigrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20250301_000003_create_activity_logs::Migration)]
    }

    // Separate bookkeeping table so both migrators can share one database
    fn migration_table_name() -> DynIden {
        Alias::new("seaql_migrations_activity").into_iden()
    }
}
