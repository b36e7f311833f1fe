//! Database migrations for the blog service

use sea_orm_migration::prelude::*;

mod m20250301_000001_create_categories;
mod m20250301_000002_create_subcategories;
mod m20250301_000003_create_tags;
mod m20250301_000004_create_posts;
mod m20250301_000005_create_post_tags;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_categories::Migration),
            Box::new(m20250301_000002_create_subcategories::Migration),
            Box::new(m20250301_000003_create_tags::Migration),
            Box::new(m20250301_000004_create_posts::Migration),
            Box::new(m20250301_000005_create_post_tags::Migration),
        ]
    }
}

/// Audit columns shared by every content table
fn audit_columns<T: IntoIden + Copy>(
    table: &mut TableCreateStatement,
    created_at: T,
    updated_at: T,
    created_by: T,
    updated_by: T,
) {
    table
        .col(
            ColumnDef::new(created_at)
                .timestamp_with_time_zone()
                .not_null()
                .default(Expr::current_timestamp()),
        )
        .col(
            ColumnDef::new(updated_at)
                .timestamp_with_time_zone()
                .not_null()
                .default(Expr::current_timestamp()),
        )
        .col(ColumnDef::new(created_by).string())
        .col(ColumnDef::new(updated_by).string());
}
