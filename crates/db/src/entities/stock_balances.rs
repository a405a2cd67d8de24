//! `SeaORM` Entity for stock_balances table.
//!
//! Rows are a cache over `journal_stock`, one per (warehouse, product).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "stock_balances")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub warehouse_id: i32,
    pub product_id: i32,
    #[sea_orm(column_type = "Decimal(Some((15, 3)))")]
    pub quantity: Decimal,
    #[sea_orm(column_type = "Decimal(Some((15, 3)))")]
    pub reserved_quantity: Decimal,
    pub last_movement_id: Option<i32>,
    pub last_movement_date: Option<Date>,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::warehouses::Entity",
        from = "Column::WarehouseId",
        to = "super::warehouses::Column::Id"
    )]
    Warehouses,
}

impl Related<super::warehouses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Warehouses.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
