use super::audit_columns;
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let mut table = Table::create();
        table
            .table(Tags::Table)
            .if_not_exists()
            .col(ColumnDef::new(Tags::Id).uuid().not_null().primary_key())
            .col(ColumnDef::new(Tags::Name).string_len(255).not_null())
            .col(
                ColumnDef::new(Tags::NameKey)
                    .string_len(255)
                    .not_null()
                    .unique_key(),
            );
        audit_columns(
            &mut table,
            Tags::CreatedAt,
            Tags::UpdatedAt,
            Tags::CreatedBy,
            Tags::UpdatedBy,
        );
        manager.create_table(table.to_owned()).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Tags::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden, Clone, Copy)]
enum Tags {
    Table,
    Id,
    Name,
    NameKey,
    CreatedAt,
    UpdatedAt,
    CreatedBy,
    UpdatedBy,
}
