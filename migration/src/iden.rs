use sea_orm_migration::prelude::*;

// Define table names
#[derive(DeriveIden)]
pub enum Guests {
    Table,
    Id,
    Name,
}

#[derive(DeriveIden)]
pub enum Responses {
    Table,
    Id,
    GuestName,
    Attending,
    Menu,
    Note,
    SubmittedAt,
}

#[derive(DeriveIden)]
pub enum Expenses {
    Table,
    Id,
    Label,
    Kind,
    UnitAmount,
    Note,
    CreatedAt,
}
