use sea_orm_migration::{prelude::*, schema::*};

use crate::iden::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create Guests Table
        let table = Table::create()
            .table(Guests::Table)
            .col(pk_auto(Guests::Id))
            .col(string_uniq(Guests::Name))
            .to_owned();
        manager.create_table(table).await?;

        // Create Responses Table. Deliberately no foreign key to guests:
        // response rows keep their guest_name even when the registry
        // entry is renamed or removed without a cascade.
        let table = Table::create()
            .table(Responses::Table)
            .col(pk_auto(Responses::Id))
            .col(string(Responses::GuestName))
            .col(boolean(Responses::Attending))
            .col(string_null(Responses::Menu))
            .col(string_null(Responses::Note))
            .col(date_time(Responses::SubmittedAt))
            .to_owned();
        manager.create_table(table).await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_responses_guest_name")
                    .table(Responses::Table)
                    .col(Responses::GuestName)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Responses::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Guests::Table).to_owned())
            .await?;

        Ok(())
    }
}
