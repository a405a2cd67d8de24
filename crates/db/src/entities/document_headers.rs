//! `SeaORM` Entity for document_headers table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::{DocumentDomain, DocumentStatus};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "document_headers")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub code: String,
    pub domain: DocumentDomain,
    pub document_type: String,
    pub warehouse_id: Option<i32>,
    pub destination_warehouse_id: Option<i32>,
    pub partner_id: Option<i32>,
    pub related_entity_kind: Option<String>,
    pub related_entity_id: Option<i32>,
    pub document_date: Date,
    pub due_date: Option<Date>,
    pub status: DocumentStatus,
    #[sea_orm(column_type = "Decimal(Some((15, 2)))")]
    pub subtotal: Decimal,
    #[sea_orm(column_type = "Decimal(Some((15, 2)))")]
    pub tax_amount: Decimal,
    #[sea_orm(column_type = "Decimal(Some((15, 2)))")]
    pub discount_amount: Decimal,
    #[sea_orm(column_type = "Decimal(Some((15, 2)))")]
    pub total_amount: Decimal,
    #[sea_orm(column_type = "Text", nullable)]
    pub notes: Option<String>,
    pub reference: Option<String>,
    pub created_by: Uuid,
    pub validated_by: Option<Uuid>,
    pub validated_at: Option<DateTimeWithTimeZone>,
    pub cancelled_by: Option<Uuid>,
    pub cancelled_at: Option<DateTimeWithTimeZone>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::document_lines::Entity")]
    DocumentLines,
    #[sea_orm(has_many = "super::journal_stock::Entity")]
    JournalStock,
    #[sea_orm(
        belongs_to = "super::partners::Entity",
        from = "Column::PartnerId",
        to = "super::partners::Column::Id"
    )]
    Partners,
}

impl Related<super::document_lines::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DocumentLines.def()
    }
}

impl Related<super::journal_stock::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::JournalStock.def()
    }
}

impl Related<super::partners::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Partners.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
