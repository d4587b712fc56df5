use sea_orm_migration::prelude::*;

mod m0001_create_connections;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m0001_create_connections::Migration)]
    }

    // Each module keeps its own migration history table; sea-orm rejects a
    // shared table containing versions another migrator applied.
    fn migration_table_name() -> DynIden {
        Alias::new("seaql_migrations_connections").into_iden()
    }
}
