//! Domain service - business logic orchestration
//!
//! One `Service` owns every repository; the operations are grouped per
//! resource in the submodules.

mod categories;
mod posts;
mod reader;
mod subcategories;
mod tags;

use super::events::{ContentEvent, EventPublisher};
use super::repository::{
    CategoryRepository, PostRepository, SubcategoryRepository, TagRepository, UniqueViolation,
};
use crate::config::Config;
use crate::contract::{BlogError, PageRequest};
use std::sync::Arc;

/// Repository handles the service works against
#[derive(Clone)]
pub struct Repositories {
    pub categories: Arc<dyn CategoryRepository>,
    pub subcategories: Arc<dyn SubcategoryRepository>,
    pub tags: Arc<dyn TagRepository>,
    pub posts: Arc<dyn PostRepository>,
}

/// Domain service for blog content management
pub struct Service {
    repos: Repositories,
    event_publisher: Arc<dyn EventPublisher>,
    config: Config,
}

impl Service {
    /// Create a new service instance
    pub fn new(
        repos: Repositories,
        event_publisher: Arc<dyn EventPublisher>,
        config: Config,
    ) -> Self {
        Self {
            repos,
            event_publisher,
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Build a page request from optional query parameters
    ///
    /// Page numbers start at 1; `per_page` is clamped to the configured
    /// maximum.
    pub fn page_request(&self, page: Option<u64>, per_page: Option<u64>) -> PageRequest {
        let pagination = &self.config.pagination;
        let per_page = per_page
            .unwrap_or(pagination.default_per_page)
            .clamp(1, pagination.max_per_page.max(1));
        PageRequest::new(page.unwrap_or(1).max(1), per_page)
    }

    async fn publish(&self, event: ContentEvent) {
        if let Err(e) = self.event_publisher.publish(event).await {
            // Log error but don't fail the operation
            tracing::warn!(error = %e, "Failed to publish content event");
        }
    }
}

/// Log a repository failure and hide its details from the caller
fn internal(error: anyhow::Error) -> BlogError {
    tracing::error!(error = ?error, "Repository operation failed");
    BlogError::Internal
}

/// Map a failed write, reporting unique index collisions as conflicts
fn write_failed(error: anyhow::Error) -> BlogError {
    match error.downcast_ref::<UniqueViolation>() {
        Some(violation) => BlogError::conflict(violation.to_string()),
        None => internal(error),
    }
}
