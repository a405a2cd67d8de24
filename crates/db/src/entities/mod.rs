//! `SeaORM` entity definitions.

pub mod prelude;

pub mod document_headers;
pub mod document_lines;
pub mod journal_stock;
pub mod numbering_systems;
pub mod partners;
pub mod products;
pub mod sea_orm_active_enums;
pub mod stock_balances;
pub mod warehouses;
