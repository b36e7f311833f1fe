use super::audit_columns;
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let mut table = Table::create();
        table
            .table(Categories::Table)
            .if_not_exists()
            .col(
                ColumnDef::new(Categories::Id)
                    .uuid()
                    .not_null()
                    .primary_key(),
            )
            .col(ColumnDef::new(Categories::Name).string_len(255).not_null())
            .col(
                ColumnDef::new(Categories::NameKey)
                    .string_len(255)
                    .not_null()
                    .unique_key(),
            )
            .col(
                ColumnDef::new(Categories::IsDefault)
                    .boolean()
                    .not_null()
                    .default(false),
            );
        audit_columns(
            &mut table,
            Categories::CreatedAt,
            Categories::UpdatedAt,
            Categories::CreatedBy,
            Categories::UpdatedBy,
        );
        manager.create_table(table.to_owned()).await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_categories_is_default")
                    .table(Categories::Table)
                    .col(Categories::IsDefault)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Categories::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden, Clone, Copy)]
enum Categories {
    Table,
    Id,
    Name,
    NameKey,
    IsDefault,
    CreatedAt,
    UpdatedAt,
    CreatedBy,
    UpdatedBy,
}
