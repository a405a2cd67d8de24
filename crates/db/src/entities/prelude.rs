//! `SeaORM` entity prelude.

pub use super::document_headers::Entity as DocumentHeaders;
pub use super::document_lines::Entity as DocumentLines;
pub use super::journal_stock::Entity as JournalStock;
pub use super::numbering_systems::Entity as NumberingSystems;
pub use super::partners::Entity as Partners;
pub use super::products::Entity as Products;
pub use super::stock_balances::Entity as StockBalances;
pub use super::warehouses::Entity as Warehouses;
