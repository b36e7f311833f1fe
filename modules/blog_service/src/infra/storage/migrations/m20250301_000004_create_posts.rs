use super::audit_columns;
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let mut table = Table::create();
        table
            .table(Posts::Table)
            .if_not_exists()
            .col(ColumnDef::new(Posts::Id).uuid().not_null().primary_key())
            .col(ColumnDef::new(Posts::Slug).string_len(255).unique_key())
            .col(ColumnDef::new(Posts::Title).string_len(255).not_null())
            .col(ColumnDef::new(Posts::Content).json())
            .col(
                ColumnDef::new(Posts::ContentText)
                    .text()
                    .not_null()
                    .default(""),
            )
            .col(ColumnDef::new(Posts::CoverImageUrl).text())
            .col(
                ColumnDef::new(Posts::Published)
                    .boolean()
                    .not_null()
                    .default(false),
            )
            .col(ColumnDef::new(Posts::PublishedAt).timestamp_with_time_zone())
            .col(ColumnDef::new(Posts::CategoryId).uuid())
            .col(ColumnDef::new(Posts::SubcategoryId).uuid())
            .foreign_key(
                ForeignKey::create()
                    .name("fk_posts_category")
                    .from(Posts::Table, Posts::CategoryId)
                    .to(Categories::Table, Categories::Id)
                    .on_delete(ForeignKeyAction::Restrict)
                    .on_update(ForeignKeyAction::Cascade),
            )
            .foreign_key(
                ForeignKey::create()
                    .name("fk_posts_subcategory")
                    .from(Posts::Table, Posts::SubcategoryId)
                    .to(Subcategories::Table, Subcategories::Id)
                    .on_delete(ForeignKeyAction::Restrict)
                    .on_update(ForeignKeyAction::Cascade),
            );
        audit_columns(
            &mut table,
            Posts::CreatedAt,
            Posts::UpdatedAt,
            Posts::CreatedBy,
            Posts::UpdatedBy,
        );
        manager.create_table(table.to_owned()).await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_posts_published_created_at")
                    .table(Posts::Table)
                    .col(Posts::Published)
                    .col(Posts::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_posts_category_id")
                    .table(Posts::Table)
                    .col(Posts::CategoryId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_posts_subcategory_id")
                    .table(Posts::Table)
                    .col(Posts::SubcategoryId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Posts::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden, Clone, Copy)]
enum Posts {
    Table,
    Id,
    Slug,
    Title,
    Content,
    ContentText,
    CoverImageUrl,
    Published,
    PublishedAt,
    CategoryId,
    SubcategoryId,
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

#[derive(DeriveIden)]
enum Subcategories {
    Table,
    Id,
}
