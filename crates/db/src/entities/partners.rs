//! `SeaORM` Entity for partners table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "partners")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub code: String,
    pub name: String,
    pub is_active: bool,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::document_headers::Entity")]
    DocumentHeaders,
}

impl Related<super::document_headers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DocumentHeaders.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
