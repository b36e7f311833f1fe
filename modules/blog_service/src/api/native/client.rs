//! Native client implementation - wraps domain service for in-process calls

use crate::contract::{
    BlogApi, BlogError, Category, Page, PageRequest, Post, PostQuery, PublishedPost, Tag,
};
use crate::domain::Service;
use async_trait::async_trait;
use std::sync::Arc;

/// Native client that calls the domain service directly
///
/// Used by in-process consumers such as a server-side renderer.
#[derive(Clone)]
pub struct NativeClient {
    service: Arc<Service>,
}

impl NativeClient {
    /// Create a new native client
    pub fn new(service: Arc<Service>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl BlogApi for NativeClient {
    async fn list_published_posts(
        &self,
        query: PostQuery,
        page: PageRequest,
    ) -> Result<Page<Post>, BlogError> {
        self.service.list_published_posts(query, page).await
    }

    async fn get_published_post(&self, slug: &str) -> Result<PublishedPost, BlogError> {
        self.service.get_published_post(slug).await
    }

    async fn list_categories(&self) -> Result<Vec<Category>, BlogError> {
        self.service.all_categories().await
    }

    async fn list_tags(&self) -> Result<Vec<Tag>, BlogError> {
        self.service.all_tags().await
    }
}
