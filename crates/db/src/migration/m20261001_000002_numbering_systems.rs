//! Numbering templates and their counters.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(NumberingSystems::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(NumberingSystems::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(NumberingSystems::Title).string().not_null())
                    .col(
                        ColumnDef::new(NumberingSystems::Domain)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(NumberingSystems::CodeType)
                            .string_len(50)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(NumberingSystems::Template)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(NumberingSystems::NextValue)
                            .big_integer()
                            .not_null()
                            .default(1),
                    )
                    .col(
                        ColumnDef::new(NumberingSystems::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(NumberingSystems::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(NumberingSystems::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_numbering_systems_domain_type")
                    .table(NumberingSystems::Table)
                    .col(NumberingSystems::Domain)
                    .col(NumberingSystems::CodeType)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(NumberingSystems::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum NumberingSystems {
    Table,
    Id,
    Title,
    Domain,
    CodeType,
    Template,
    NextValue,
    IsActive,
    CreatedAt,
    UpdatedAt,
}
