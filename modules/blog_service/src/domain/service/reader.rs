//! Public reader operations - published content only

use super::{internal, Service};
use crate::contract::{BlogError, Page, PageRequest, Post, PostQuery, PublishedPost};
use crate::domain::content::table_of_contents;

impl Service {
    /// List published posts, newest first
    pub async fn list_published_posts(
        &self,
        mut query: PostQuery,
        page: PageRequest,
    ) -> Result<Page<Post>, BlogError> {
        query.published = Some(true);
        self.repos.posts.list(&query, page).await.map_err(internal)
    }

    /// Published post by slug; drafts are reported as not found
    pub async fn get_published_post(&self, slug: &str) -> Result<PublishedPost, BlogError> {
        let post = self
            .repos
            .posts
            .find_by_slug(slug)
            .await
            .map_err(internal)?
            .filter(|p| p.published)
            .ok_or_else(|| BlogError::not_found("post", slug))?;

        let toc = post
            .content
            .as_ref()
            .map(table_of_contents)
            .unwrap_or_default();
        let details = self.resolve_details(post).await?;

        Ok(PublishedPost { details, toc })
    }
}
