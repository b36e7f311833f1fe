use super::audit_columns;
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let mut table = Table::create();
        table
            .table(Subcategories::Table)
            .if_not_exists()
            .col(
                ColumnDef::new(Subcategories::Id)
                    .uuid()
                    .not_null()
                    .primary_key(),
            )
            .col(ColumnDef::new(Subcategories::Name).string_len(255).not_null())
            .col(
                ColumnDef::new(Subcategories::NameKey)
                    .string_len(255)
                    .not_null(),
            )
            .col(ColumnDef::new(Subcategories::CategoryId).uuid().not_null())
            .foreign_key(
                ForeignKey::create()
                    .name("fk_subcategories_category")
                    .from(Subcategories::Table, Subcategories::CategoryId)
                    .to(Categories::Table, Categories::Id)
                    .on_delete(ForeignKeyAction::Restrict)
                    .on_update(ForeignKeyAction::Cascade),
            );
        audit_columns(
            &mut table,
            Subcategories::CreatedAt,
            Subcategories::UpdatedAt,
            Subcategories::CreatedBy,
            Subcategories::UpdatedBy,
        );
        manager.create_table(table.to_owned()).await?;

        // Case-folded names are unique within their parent category
        manager
            .create_index(
                Index::create()
                    .name("idx_subcategories_category_name")
                    .table(Subcategories::Table)
                    .col(Subcategories::CategoryId)
                    .col(Subcategories::NameKey)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Subcategories::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden, Clone, Copy)]
enum Subcategories {
    Table,
    Id,
    Name,
    NameKey,
    CategoryId,
    CreatedAt,
    UpdatedAt,
    CreatedBy,
    UpdatedBy,
}

#[derive(DeriveIden)]
enum Categories {
    Table,
    Id,
}
