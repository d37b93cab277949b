use sea_orm::entity::prelude::*;
use serde::Serialize;

/// One RSVP submission. The log is append-only through the public form;
/// a guest's current status is their most recent row. `guest_name` is a
/// plain string on purpose: there is no foreign key to the registry.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "responses")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub guest_name: String,
    pub attending: bool,
    /// Canonical menu ("standard" / "veggie"); always None when declining.
    pub menu: Option<String>,
    pub note: Option<String>,
    pub submitted_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
