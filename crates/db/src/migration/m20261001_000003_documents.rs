//! Document headers and lines.

use sea_orm_migration::prelude::*;

use super::m20261001_000001_master_data::{Partners, Products, Warehouses};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(DocumentHeaders::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DocumentHeaders::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(DocumentHeaders::Code)
                            .string_len(100)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(DocumentHeaders::Domain)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DocumentHeaders::DocumentType)
                            .string_len(50)
                            .not_null(),
                    )
                    .col(ColumnDef::new(DocumentHeaders::WarehouseId).integer().null())
                    .col(
                        ColumnDef::new(DocumentHeaders::DestinationWarehouseId)
                            .integer()
                            .null(),
                    )
                    .col(ColumnDef::new(DocumentHeaders::PartnerId).integer().null())
                    .col(
                        ColumnDef::new(DocumentHeaders::RelatedEntityKind)
                            .string_len(16)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(DocumentHeaders::RelatedEntityId)
                            .integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(DocumentHeaders::DocumentDate)
                            .date()
                            .not_null(),
                    )
                    .col(ColumnDef::new(DocumentHeaders::DueDate).date().null())
                    .col(
                        ColumnDef::new(DocumentHeaders::Status)
                            .string_len(16)
                            .not_null()
                            .default("draft"),
                    )
                    .col(money(DocumentHeaders::Subtotal))
                    .col(money(DocumentHeaders::TaxAmount))
                    .col(money(DocumentHeaders::DiscountAmount))
                    .col(money(DocumentHeaders::TotalAmount))
                    .col(ColumnDef::new(DocumentHeaders::Notes).text().null())
                    .col(ColumnDef::new(DocumentHeaders::Reference).string().null())
                    .col(ColumnDef::new(DocumentHeaders::CreatedBy).uuid().not_null())
                    .col(ColumnDef::new(DocumentHeaders::ValidatedBy).uuid().null())
                    .col(
                        ColumnDef::new(DocumentHeaders::ValidatedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(ColumnDef::new(DocumentHeaders::CancelledBy).uuid().null())
                    .col(
                        ColumnDef::new(DocumentHeaders::CancelledAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(DocumentHeaders::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DocumentHeaders::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_document_headers_warehouse")
                            .from(DocumentHeaders::Table, DocumentHeaders::WarehouseId)
                            .to(Warehouses::Table, Warehouses::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_document_headers_destination_warehouse")
                            .from(DocumentHeaders::Table, DocumentHeaders::DestinationWarehouseId)
                            .to(Warehouses::Table, Warehouses::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_document_headers_partner")
                            .from(DocumentHeaders::Table, DocumentHeaders::PartnerId)
                            .to(Partners::Table, Partners::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_document_headers_domain_type")
                    .table(DocumentHeaders::Table)
                    .col(DocumentHeaders::Domain)
                    .col(DocumentHeaders::DocumentType)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(DocumentLines::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DocumentLines::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(DocumentLines::DocumentId).integer().not_null())
                    .col(ColumnDef::new(DocumentLines::ProductId).integer().not_null())
                    .col(ColumnDef::new(DocumentLines::LineNumber).integer().not_null())
                    .col(
                        ColumnDef::new(DocumentLines::Quantity)
                            .decimal_len(15, 3)
                            .not_null(),
                    )
                    .col(money(DocumentLines::UnitPrice))
                    .col(
                        ColumnDef::new(DocumentLines::UnitCost)
                            .decimal_len(15, 2)
                            .null(),
                    )
                    .col(percent(DocumentLines::DiscountPercent))
                    .col(money(DocumentLines::DiscountAmount))
                    .col(percent(DocumentLines::TaxPercent))
                    .col(money(DocumentLines::TaxAmount))
                    .col(money(DocumentLines::LineTotal))
                    .col(ColumnDef::new(DocumentLines::Description).text().null())
                    .col(ColumnDef::new(DocumentLines::Notes).text().null())
                    .col(
                        ColumnDef::new(DocumentLines::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DocumentLines::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_document_lines_document")
                            .from(DocumentLines::Table, DocumentLines::DocumentId)
                            .to(DocumentHeaders::Table, DocumentHeaders::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_document_lines_product")
                            .from(DocumentLines::Table, DocumentLines::ProductId)
                            .to(Products::Table, Products::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq_document_lines_document_line_number")
                    .table(DocumentLines::Table)
                    .col(DocumentLines::DocumentId)
                    .col(DocumentLines::LineNumber)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(DocumentLines::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(DocumentHeaders::Table).to_owned())
            .await?;
        Ok(())
    }
}

fn money<T: IntoIden>(column: T) -> ColumnDef {
    ColumnDef::new(column)
        .decimal_len(15, 2)
        .not_null()
        .default(0)
        .to_owned()
}

fn percent<T: IntoIden>(column: T) -> ColumnDef {
    ColumnDef::new(column)
        .decimal_len(5, 2)
        .not_null()
        .default(0)
        .to_owned()
}

#[derive(DeriveIden)]
pub enum DocumentHeaders {
    Table,
    Id,
    Code,
    Domain,
    DocumentType,
    WarehouseId,
    DestinationWarehouseId,
    PartnerId,
    RelatedEntityKind,
    RelatedEntityId,
    DocumentDate,
    DueDate,
    Status,
    Subtotal,
    TaxAmount,
    DiscountAmount,
    TotalAmount,
    Notes,
    Reference,
    CreatedBy,
    ValidatedBy,
    ValidatedAt,
    CancelledBy,
    CancelledAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub enum DocumentLines {
    Table,
    Id,
    DocumentId,
    ProductId,
    LineNumber,
    Quantity,
    UnitPrice,
    UnitCost,
    DiscountPercent,
    DiscountAmount,
    TaxPercent,
    TaxAmount,
    LineTotal,
    Description,
    Notes,
    CreatedAt,
    UpdatedAt,
}
