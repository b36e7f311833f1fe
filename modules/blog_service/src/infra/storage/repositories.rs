//! SeaORM repository implementations

use crate::contract::{
    Category, CategoryQuery, Page, PageRequest, Post, PostQuery, Subcategory, SubcategoryQuery,
    Tag, TagQuery,
};
use crate::domain::repository::{
    CategoryRepository, PostRepository, SubcategoryRepository, TagRepository, UniqueViolation,
};
use anyhow::{Context, Result};
use async_trait::async_trait;
use sea_orm::sea_query::{Expr, Func, LikeExpr, SimpleExpr};
use sea_orm::{
    ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, QueryTrait, SqlErr, TransactionTrait,
};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use super::entity::{category, post, post_tag, subcategory, tag};
use super::mapper::{name_key, post_from_entity, post_tag_rows};

// ===== Query helpers =====

/// `%needle%` with LIKE wildcards in `needle` escaped
fn contains_pattern(needle: &str) -> LikeExpr {
    let escaped = needle
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    LikeExpr::new(format!("%{}%", escaped)).escape('\\')
}

/// `lower(col) LIKE '%needle%'`, for free text columns
fn lower_contains<C: ColumnTrait>(col: C, needle: &str) -> SimpleExpr {
    Expr::expr(Func::lower(Expr::col(col))).like(contains_pattern(&needle.to_lowercase()))
}

/// Substring match on a taxonomy `name_key` column
fn key_contains<C: ColumnTrait>(col: C, needle: &str) -> SimpleExpr {
    Expr::col(col).like(contains_pattern(&name_key(needle)))
}

/// Surface unique index collisions as [`UniqueViolation`]
fn unique_or(error: DbErr, what: &str) -> anyhow::Error {
    match error.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => UniqueViolation {
            what: what.to_string(),
        }
        .into(),
        _ => error.into(),
    }
}

/// Drop the default flag from every category except `keep`
async fn clear_defaults<C: ConnectionTrait>(conn: &C, keep: Uuid) -> Result<()> {
    category::Entity::update_many()
        .col_expr(category::Column::IsDefault, Expr::value(false))
        .filter(category::Column::IsDefault.eq(true))
        .filter(category::Column::Id.ne(keep))
        .exec(conn)
        .await?;
    Ok(())
}

/// Non-blank search term
fn search_term(search: &Option<String>) -> Option<&str> {
    search.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

// ===== Category Repository =====

pub struct SeaOrmCategoryRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmCategoryRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CategoryRepository for SeaOrmCategoryRepository {
    async fn create(&self, category: &Category) -> Result<Category> {
        let txn = self.db.begin().await?;

        if category.is_default {
            clear_defaults(&txn, category.id).await?;
        }
        let active: category::ActiveModel = category.into();
        let result = category::Entity::insert(active)
            .exec_with_returning(&txn)
            .await
            .map_err(|e| unique_or(e, "category name"))?;

        txn.commit().await?;
        Ok(result.into())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Category>> {
        let result = category::Entity::find_by_id(id).one(&*self.db).await?;
        Ok(result.map(Into::into))
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Category>> {
        let result = category::Entity::find()
            .filter(category::Column::NameKey.eq(name_key(name)))
            .one(&*self.db)
            .await?;
        Ok(result.map(Into::into))
    }

    async fn find_default(&self) -> Result<Option<Category>> {
        let result = category::Entity::find()
            .filter(category::Column::IsDefault.eq(true))
            .one(&*self.db)
            .await?;
        Ok(result.map(Into::into))
    }

    async fn list(&self, query: &CategoryQuery, page: PageRequest) -> Result<Page<Category>> {
        let mut select = category::Entity::find();
        if let Some(search) = search_term(&query.search) {
            select = select.filter(key_contains(category::Column::NameKey, search));
        }
        let select = select
            .order_by_desc(category::Column::IsDefault)
            .order_by_asc(category::Column::Name);

        let total = select.clone().count(&*self.db).await?;
        let rows = select
            .offset(page.offset())
            .limit(page.per_page)
            .all(&*self.db)
            .await?;

        Ok(Page::new(rows.into_iter().map(Into::into).collect(), total, page))
    }

    async fn list_all(&self) -> Result<Vec<Category>> {
        let rows = category::Entity::find()
            .order_by_desc(category::Column::IsDefault)
            .order_by_asc(category::Column::Name)
            .all(&*self.db)
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn update(&self, category: &Category) -> Result<Category> {
        use sea_orm::ActiveValue::NotSet;

        let txn = self.db.begin().await?;

        let mut active: category::ActiveModel = category.into();
        if category.is_default {
            clear_defaults(&txn, category.id).await?;
        } else {
            // Unsetting only happens by flagging another category
            active.is_default = NotSet;
        }
        active.created_at = NotSet;
        active.created_by = NotSet;

        let result = category::Entity::update(active)
            .exec(&txn)
            .await
            .map_err(|e| unique_or(e, "category name"))?;

        txn.commit().await?;
        Ok(result.into())
    }

    async fn set_default(&self, id: Uuid) -> Result<()> {
        let txn = self.db.begin().await?;

        clear_defaults(&txn, id).await?;

        let updated = category::Entity::update_many()
            .col_expr(category::Column::IsDefault, Expr::value(true))
            .filter(category::Column::Id.eq(id))
            .exec(&txn)
            .await?;
        if updated.rows_affected == 0 {
            anyhow::bail!("category {} vanished while switching the default", id);
        }

        txn.commit().await?;
        Ok(())
    }

    async fn delete_reassigning(&self, id: Uuid, default_id: Uuid) -> Result<u64> {
        let txn = self.db.begin().await?;

        let moved = post::Entity::update_many()
            .col_expr(post::Column::CategoryId, Expr::value(default_id))
            .col_expr(post::Column::SubcategoryId, Expr::value(Option::<Uuid>::None))
            .filter(post::Column::CategoryId.eq(id))
            .exec(&txn)
            .await
            .context("reassigning posts to the default category")?;

        subcategory::Entity::delete_many()
            .filter(subcategory::Column::CategoryId.eq(id))
            .exec(&txn)
            .await?;

        category::Entity::delete_by_id(id).exec(&txn).await?;

        txn.commit().await?;
        Ok(moved.rows_affected)
    }
}

// ===== Subcategory Repository =====

pub struct SeaOrmSubcategoryRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmSubcategoryRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SubcategoryRepository for SeaOrmSubcategoryRepository {
    async fn create(&self, subcategory: &Subcategory) -> Result<Subcategory> {
        let active: subcategory::ActiveModel = subcategory.into();
        let result = subcategory::Entity::insert(active)
            .exec_with_returning(&*self.db)
            .await
            .map_err(|e| unique_or(e, "subcategory name"))?;
        Ok(result.into())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Subcategory>> {
        let result = subcategory::Entity::find_by_id(id).one(&*self.db).await?;
        Ok(result.map(Into::into))
    }

    async fn find_by_name(&self, category_id: Uuid, name: &str) -> Result<Option<Subcategory>> {
        let result = subcategory::Entity::find()
            .filter(subcategory::Column::CategoryId.eq(category_id))
            .filter(subcategory::Column::NameKey.eq(name_key(name)))
            .one(&*self.db)
            .await?;
        Ok(result.map(Into::into))
    }

    async fn list(
        &self,
        query: &SubcategoryQuery,
        page: PageRequest,
    ) -> Result<Page<Subcategory>> {
        let mut select = subcategory::Entity::find();
        if let Some(category_id) = query.category_id {
            select = select.filter(subcategory::Column::CategoryId.eq(category_id));
        }
        if let Some(search) = search_term(&query.search) {
            select = select.filter(key_contains(subcategory::Column::NameKey, search));
        }
        let select = select.order_by_asc(subcategory::Column::Name);

        let total = select.clone().count(&*self.db).await?;
        let rows = select
            .offset(page.offset())
            .limit(page.per_page)
            .all(&*self.db)
            .await?;

        Ok(Page::new(rows.into_iter().map(Into::into).collect(), total, page))
    }

    async fn update(&self, subcategory: &Subcategory) -> Result<Subcategory> {
        use sea_orm::ActiveValue::NotSet;

        let mut active: subcategory::ActiveModel = subcategory.into();
        active.created_at = NotSet;
        active.created_by = NotSet;

        let result = subcategory::Entity::update(active)
            .exec(&*self.db)
            .await
            .map_err(|e| unique_or(e, "subcategory name"))?;
        Ok(result.into())
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        subcategory::Entity::delete_by_id(id).exec(&*self.db).await?;
        Ok(())
    }

    async fn count_posts(&self, id: Uuid) -> Result<u64> {
        let count = post::Entity::find()
            .filter(post::Column::SubcategoryId.eq(id))
            .count(&*self.db)
            .await?;
        Ok(count)
    }
}

// ===== Tag Repository =====

pub struct SeaOrmTagRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmTagRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TagRepository for SeaOrmTagRepository {
    async fn create(&self, tag: &Tag) -> Result<Tag> {
        let active: tag::ActiveModel = tag.into();
        let result = tag::Entity::insert(active)
            .exec_with_returning(&*self.db)
            .await
            .map_err(|e| unique_or(e, "tag name"))?;
        Ok(result.into())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Tag>> {
        let result = tag::Entity::find_by_id(id).one(&*self.db).await?;
        Ok(result.map(Into::into))
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Tag>> {
        let result = tag::Entity::find()
            .filter(tag::Column::NameKey.eq(name_key(name)))
            .one(&*self.db)
            .await?;
        Ok(result.map(Into::into))
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Tag>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = tag::Entity::find()
            .filter(tag::Column::Id.is_in(ids.iter().copied()))
            .order_by_asc(tag::Column::Name)
            .all(&*self.db)
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn list(&self, query: &TagQuery, page: PageRequest) -> Result<Page<Tag>> {
        let mut select = tag::Entity::find();
        if let Some(search) = search_term(&query.search) {
            select = select.filter(key_contains(tag::Column::NameKey, search));
        }
        let select = select.order_by_asc(tag::Column::Name);

        let total = select.clone().count(&*self.db).await?;
        let rows = select
            .offset(page.offset())
            .limit(page.per_page)
            .all(&*self.db)
            .await?;

        Ok(Page::new(rows.into_iter().map(Into::into).collect(), total, page))
    }

    async fn list_all(&self) -> Result<Vec<Tag>> {
        let rows = tag::Entity::find()
            .order_by_asc(tag::Column::Name)
            .all(&*self.db)
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn update(&self, tag: &Tag) -> Result<Tag> {
        use sea_orm::ActiveValue::NotSet;

        let mut active: tag::ActiveModel = tag.into();
        active.created_at = NotSet;
        active.created_by = NotSet;

        let result = tag::Entity::update(active)
            .exec(&*self.db)
            .await
            .map_err(|e| unique_or(e, "tag name"))?;
        Ok(result.into())
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let txn = self.db.begin().await?;

        post_tag::Entity::delete_many()
            .filter(post_tag::Column::TagId.eq(id))
            .exec(&txn)
            .await?;
        tag::Entity::delete_by_id(id).exec(&txn).await?;

        txn.commit().await?;
        Ok(())
    }
}

// ===== Post Repository =====

pub struct SeaOrmPostRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmPostRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Tag ids per post, in their stored order
    async fn load_tag_ids<C: ConnectionTrait>(
        conn: &C,
        post_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, Vec<Uuid>>> {
        let mut by_post: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
        if post_ids.is_empty() {
            return Ok(by_post);
        }

        let rows = post_tag::Entity::find()
            .filter(post_tag::Column::PostId.is_in(post_ids.iter().copied()))
            .order_by_asc(post_tag::Column::PostId)
            .order_by_asc(post_tag::Column::Position)
            .all(conn)
            .await?;
        for row in rows {
            by_post.entry(row.post_id).or_default().push(row.tag_id);
        }
        Ok(by_post)
    }

    async fn with_tags(&self, rows: Vec<post::Model>) -> Result<Vec<Post>> {
        let ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();
        let mut tags = Self::load_tag_ids(&*self.db, &ids).await?;
        Ok(rows
            .into_iter()
            .map(|row| {
                let tag_ids = tags.remove(&row.id).unwrap_or_default();
                post_from_entity(row, tag_ids)
            })
            .collect())
    }

    async fn write_tags<C: ConnectionTrait>(conn: &C, post: &Post) -> Result<()> {
        post_tag::Entity::delete_many()
            .filter(post_tag::Column::PostId.eq(post.id))
            .exec(conn)
            .await?;

        let rows = post_tag_rows(post);
        if !rows.is_empty() {
            post_tag::Entity::insert_many(rows).exec(conn).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl PostRepository for SeaOrmPostRepository {
    async fn create(&self, post: &Post) -> Result<Post> {
        let txn = self.db.begin().await?;

        let active: post::ActiveModel = post.into();
        let row = post::Entity::insert(active)
            .exec_with_returning(&txn)
            .await
            .map_err(|e| unique_or(e, "post slug"))?;
        Self::write_tags(&txn, post).await?;

        txn.commit().await?;
        Ok(post_from_entity(row, post.tag_ids.clone()))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>> {
        let Some(row) = post::Entity::find_by_id(id).one(&*self.db).await? else {
            return Ok(None);
        };
        Ok(self.with_tags(vec![row]).await?.pop())
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>> {
        let Some(row) = post::Entity::find()
            .filter(post::Column::Slug.eq(slug))
            .one(&*self.db)
            .await?
        else {
            return Ok(None);
        };
        Ok(self.with_tags(vec![row]).await?.pop())
    }

    async fn slug_exists(&self, slug: &str, exclude: Option<Uuid>) -> Result<bool> {
        let mut select = post::Entity::find().filter(post::Column::Slug.eq(slug));
        if let Some(id) = exclude {
            select = select.filter(post::Column::Id.ne(id));
        }
        Ok(select.count(&*self.db).await? > 0)
    }

    async fn list(&self, query: &PostQuery, page: PageRequest) -> Result<Page<Post>> {
        let mut select = post::Entity::find();

        if let Some(published) = query.published {
            select = select.filter(post::Column::Published.eq(published));
        }
        if let Some(category_id) = query.category_id {
            select = select.filter(post::Column::CategoryId.eq(category_id));
        }
        if let Some(subcategory_id) = query.subcategory_id {
            select = select.filter(post::Column::SubcategoryId.eq(subcategory_id));
        }
        if let Some(tag_id) = query.tag_id {
            let tagged = post_tag::Entity::find()
                .select_only()
                .column(post_tag::Column::PostId)
                .filter(post_tag::Column::TagId.eq(tag_id))
                .into_query();
            select = select.filter(post::Column::Id.in_subquery(tagged));
        }
        if let Some(search) = search_term(&query.search) {
            select = select.filter(
                Condition::any()
                    .add(lower_contains(post::Column::Title, search))
                    .add(lower_contains(post::Column::ContentText, search)),
            );
        }

        let select = select
            .order_by_desc(post::Column::CreatedAt)
            .order_by_asc(post::Column::Id);

        let total = select.clone().count(&*self.db).await?;
        let rows = select
            .offset(page.offset())
            .limit(page.per_page)
            .all(&*self.db)
            .await?;

        Ok(Page::new(self.with_tags(rows).await?, total, page))
    }

    async fn update(&self, post: &Post) -> Result<Post> {
        use sea_orm::ActiveValue::NotSet;

        let txn = self.db.begin().await?;

        let mut active: post::ActiveModel = post.into();
        active.created_at = NotSet;
        active.created_by = NotSet;
        let row = post::Entity::update(active)
            .exec(&txn)
            .await
            .map_err(|e| unique_or(e, "post slug"))?;
        Self::write_tags(&txn, post).await?;

        txn.commit().await?;
        Ok(post_from_entity(row, post.tag_ids.clone()))
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let txn = self.db.begin().await?;

        post_tag::Entity::delete_many()
            .filter(post_tag::Column::PostId.eq(id))
            .exec(&txn)
            .await?;
        post::Entity::delete_by_id(id).exec(&txn).await?;

        txn.commit().await?;
        Ok(())
    }
}
