//! Native client trait for inter-module communication
//!
//! Read-only operations a server-side renderer needs from the blog.
//! NO HTTP - direct function calls.

use super::{
    error::BlogError,
    model::{Category, Page, PageRequest, Post, PostQuery, PublishedPost, Tag},
};
use async_trait::async_trait;

/// Blog reader API for inter-module communication
#[async_trait]
pub trait BlogApi: Send + Sync {
    /// List published posts; `query.published` is ignored
    async fn list_published_posts(
        &self,
        query: PostQuery,
        page: PageRequest,
    ) -> Result<Page<Post>, BlogError>;

    /// Get a published post by slug, with its table of contents
    async fn get_published_post(&self, slug: &str) -> Result<PublishedPost, BlogError>;

    /// All categories, default first
    async fn list_categories(&self) -> Result<Vec<Category>, BlogError>;

    /// All tags by name
    async fn list_tags(&self) -> Result<Vec<Tag>, BlogError>;
}
