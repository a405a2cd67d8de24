//! Stock journal and the per-(warehouse, product) balance cache.

use sea_orm_migration::prelude::*;

use super::m20261001_000001_master_data::{Products, Warehouses};
use super::m20261001_000003_documents::{DocumentHeaders, DocumentLines};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(JournalStock::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(JournalStock::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(JournalStock::Code)
                            .string_len(100)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(JournalStock::MovementType)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(ColumnDef::new(JournalStock::DocumentId).integer().null())
                    .col(ColumnDef::new(JournalStock::DocumentLineId).integer().null())
                    .col(ColumnDef::new(JournalStock::WarehouseId).integer().not_null())
                    .col(ColumnDef::new(JournalStock::ProductId).integer().not_null())
                    .col(
                        ColumnDef::new(JournalStock::Quantity)
                            .decimal_len(15, 3)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(JournalStock::UnitCost)
                            .decimal_len(15, 2)
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(JournalStock::TotalCost)
                            .decimal_len(15, 2)
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(JournalStock::MovementDate).date().not_null())
                    .col(ColumnDef::new(JournalStock::Reference).string().null())
                    .col(ColumnDef::new(JournalStock::Notes).text().null())
                    .col(ColumnDef::new(JournalStock::CreatedBy).uuid().not_null())
                    .col(
                        ColumnDef::new(JournalStock::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_journal_stock_document")
                            .from(JournalStock::Table, JournalStock::DocumentId)
                            .to(DocumentHeaders::Table, DocumentHeaders::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_journal_stock_document_line")
                            .from(JournalStock::Table, JournalStock::DocumentLineId)
                            .to(DocumentLines::Table, DocumentLines::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_journal_stock_warehouse")
                            .from(JournalStock::Table, JournalStock::WarehouseId)
                            .to(Warehouses::Table, Warehouses::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_journal_stock_product")
                            .from(JournalStock::Table, JournalStock::ProductId)
                            .to(Products::Table, Products::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_journal_stock_pair_date")
                    .table(JournalStock::Table)
                    .col(JournalStock::WarehouseId)
                    .col(JournalStock::ProductId)
                    .col(JournalStock::MovementDate)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_journal_stock_document")
                    .table(JournalStock::Table)
                    .col(JournalStock::DocumentId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(StockBalances::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(StockBalances::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(StockBalances::WarehouseId).integer().not_null())
                    .col(ColumnDef::new(StockBalances::ProductId).integer().not_null())
                    .col(
                        ColumnDef::new(StockBalances::Quantity)
                            .decimal_len(15, 3)
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(StockBalances::ReservedQuantity)
                            .decimal_len(15, 3)
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(StockBalances::LastMovementId).integer().null())
                    .col(ColumnDef::new(StockBalances::LastMovementDate).date().null())
                    .col(
                        ColumnDef::new(StockBalances::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_stock_balances_warehouse")
                            .from(StockBalances::Table, StockBalances::WarehouseId)
                            .to(Warehouses::Table, Warehouses::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_stock_balances_product")
                            .from(StockBalances::Table, StockBalances::ProductId)
                            .to(Products::Table, Products::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_stock_balances_last_movement")
                            .from(StockBalances::Table, StockBalances::LastMovementId)
                            .to(JournalStock::Table, JournalStock::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq_stock_balances_warehouse_product")
                    .table(StockBalances::Table)
                    .col(StockBalances::WarehouseId)
                    .col(StockBalances::ProductId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(StockBalances::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(JournalStock::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum JournalStock {
    Table,
    Id,
    Code,
    MovementType,
    DocumentId,
    DocumentLineId,
    WarehouseId,
    ProductId,
    Quantity,
    UnitCost,
    TotalCost,
    MovementDate,
    Reference,
    Notes,
    CreatedBy,
    CreatedAt,
}

#[derive(DeriveIden)]
enum StockBalances {
    Table,
    Id,
    WarehouseId,
    ProductId,
    Quantity,
    ReservedQuantity,
    LastMovementId,
    LastMovementDate,
    UpdatedAt,
}
