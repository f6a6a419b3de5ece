pub use sea_orm_migration::prelude::*;

mod m20250101_000001_create_bookings_tables;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    // Kept apart from the application's own seaql_migrations table
    fn migration_table_name() -> sea_orm::DynIden {
        Alias::new("bookings_seaorm_migrations").into_iden()
    }

    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20250101_000001_create_bookings_tables::Migration)]
    }
}
