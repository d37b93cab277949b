use sea_orm_migration::{prelude::*, schema::*};

use crate::iden::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let table = Table::create()
            .table(Expenses::Table)
            .col(pk_auto(Expenses::Id))
            .col(string(Expenses::Label))
            .col(string(Expenses::Kind))
            .col(double(Expenses::UnitAmount))
            .col(string_null(Expenses::Note))
            .col(date_time(Expenses::CreatedAt))
            .to_owned();
        manager.create_table(table).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Expenses::Table).to_owned())
            .await?;

        Ok(())
    }
}
