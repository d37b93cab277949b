pub use sea_orm_migration::prelude::*;

mod iden;
mod m20240301_000001_create_rsvp_tables;
mod m20240612_000002_add_expenses_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240301_000001_create_rsvp_tables::Migration),
            Box::new(m20240612_000002_add_expenses_table::Migration),
        ]
    }
}
