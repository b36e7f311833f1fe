//! Repository traits for data access
//!
//! These traits define the interface for data access operations.
//! Implementations are in infra/storage/repositories.rs

use crate::contract::{
    Category, CategoryQuery, Page, PageRequest, Post, PostQuery, Subcategory, SubcategoryQuery,
    Tag, TagQuery,
};
use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

/// A write collided with a unique index, e.g. a concurrent insert of the
/// same name or slug. Repositories return it inside `anyhow::Error`.
#[derive(Debug, thiserror::Error)]
#[error("{what} already exists")]
pub struct UniqueViolation {
    pub what: String,
}

/// Repository for categories
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// Insert a new category; when it is flagged default, every other
    /// category loses the flag in the same transaction
    async fn create(&self, category: &Category) -> Result<Category>;

    /// Find a category by id
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Category>>;

    /// Find a category by name, ignoring case
    async fn find_by_name(&self, name: &str) -> Result<Option<Category>>;

    /// Find the category flagged as default
    async fn find_default(&self) -> Result<Option<Category>>;

    /// List categories, default first then by name
    async fn list(&self, query: &CategoryQuery, page: PageRequest) -> Result<Page<Category>>;

    /// Every category, default first then by name
    async fn list_all(&self) -> Result<Vec<Category>>;

    /// Update name and audit fields. A category flagged default takes the
    /// flag from the others in the same transaction; an unflagged one keeps
    /// its stored flag.
    async fn update(&self, category: &Category) -> Result<Category>;

    /// Atomically make `id` the only default category
    async fn set_default(&self, id: Uuid) -> Result<()>;

    /// Atomically move the category's posts to `default_id`, clear their
    /// subcategory, drop the category's subcategories and the category.
    ///
    /// Returns the number of reassigned posts.
    async fn delete_reassigning(&self, id: Uuid, default_id: Uuid) -> Result<u64>;
}

/// Repository for subcategories
#[async_trait]
pub trait SubcategoryRepository: Send + Sync {
    async fn create(&self, subcategory: &Subcategory) -> Result<Subcategory>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Subcategory>>;

    /// Find a subcategory of `category_id` by name, ignoring case
    async fn find_by_name(&self, category_id: Uuid, name: &str) -> Result<Option<Subcategory>>;

    async fn list(&self, query: &SubcategoryQuery, page: PageRequest)
        -> Result<Page<Subcategory>>;

    async fn update(&self, subcategory: &Subcategory) -> Result<Subcategory>;

    async fn delete(&self, id: Uuid) -> Result<()>;

    /// Number of posts referencing the subcategory
    async fn count_posts(&self, id: Uuid) -> Result<u64>;
}

/// Repository for tags
#[async_trait]
pub trait TagRepository: Send + Sync {
    async fn create(&self, tag: &Tag) -> Result<Tag>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Tag>>;

    /// Find a tag by name, ignoring case
    async fn find_by_name(&self, name: &str) -> Result<Option<Tag>>;

    /// Fetch the tags that exist among `ids`, ordered by name
    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Tag>>;

    async fn list(&self, query: &TagQuery, page: PageRequest) -> Result<Page<Tag>>;

    /// Every tag by name
    async fn list_all(&self) -> Result<Vec<Tag>>;

    async fn update(&self, tag: &Tag) -> Result<Tag>;

    /// Delete the tag together with its post links
    async fn delete(&self, id: Uuid) -> Result<()>;
}

/// Repository for posts
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Insert a post with its tag links
    async fn create(&self, post: &Post) -> Result<Post>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>>;

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>>;

    /// Whether another post (not `exclude`) already uses `slug`
    async fn slug_exists(&self, slug: &str, exclude: Option<Uuid>) -> Result<bool>;

    /// List posts, newest first
    async fn list(&self, query: &PostQuery, page: PageRequest) -> Result<Page<Post>>;

    /// Replace a post and its tag links
    async fn update(&self, post: &Post) -> Result<Post>;

    /// Delete a post together with its tag links
    async fn delete(&self, id: Uuid) -> Result<()>;
}
