use sea_orm::entity::prelude::*;
use serde::Serialize;

/// An expense line item, either charged once ("flat") or multiplied by
/// the selected headcount ("per_guest").
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub label: String,
    pub kind: String,
    pub unit_amount: f64,
    pub note: Option<String>,
    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
