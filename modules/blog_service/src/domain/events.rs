//! Domain events for blog service
//!
//! Every successful mutation publishes one event so that caches and
//! page revalidation can react:
//! - Post events carry the slug so public pages can be invalidated
//! - Taxonomy events carry the entry kind and id
//! - Category deletion reports where its posts went

use crate::contract::model::Post;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Domain event types for blog content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum ContentEvent {
    /// Post was created or updated
    PostUpserted(PostUpsertedEvent),
    /// Post was deleted
    PostDeleted(PostDeletedEvent),
    /// Category, subcategory or tag was created, renamed or deleted
    TaxonomyChanged(TaxonomyChangedEvent),
    /// Category was deleted and its posts reassigned
    CategoryDeleted(CategoryDeletedEvent),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostUpsertedEvent {
    pub post_id: Uuid,
    pub slug: Option<String>,
    pub published: bool,
    /// Whether this was a create or update
    pub is_new: bool,
    pub timestamp: DateTime<Utc>,
    pub actor: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostDeletedEvent {
    pub post_id: Uuid,
    pub slug: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub actor: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaxonomyKind {
    Category,
    Subcategory,
    Tag,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Created,
    Updated,
    Deleted,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxonomyChangedEvent {
    pub kind: TaxonomyKind,
    pub id: Uuid,
    pub change: ChangeKind,
    pub timestamp: DateTime<Utc>,
    pub actor: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryDeletedEvent {
    pub category_id: Uuid,
    pub reassigned_to: Uuid,
    pub reassigned_posts: u64,
    pub timestamp: DateTime<Utc>,
    pub actor: Option<String>,
}

/// Event publisher trait for publishing domain events
///
/// Implementations should handle delivery to whatever cache or queue
/// consumes content changes. Failures are logged by the caller and never
/// abort the mutation.
#[async_trait::async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish(&self, event: ContentEvent) -> anyhow::Result<()>;
}

/// No-op event publisher for testing or when events are disabled
pub struct NoOpEventPublisher;

#[async_trait::async_trait]
impl EventPublisher for NoOpEventPublisher {
    async fn publish(&self, _event: ContentEvent) -> anyhow::Result<()> {
        Ok(())
    }
}

/// Publisher that emits each event as a structured log line
pub struct TracingEventPublisher;

#[async_trait::async_trait]
impl EventPublisher for TracingEventPublisher {
    async fn publish(&self, event: ContentEvent) -> anyhow::Result<()> {
        let payload = serde_json::to_string(&event)?;
        tracing::info!(target: "blog_service::events", event = %payload, "content event");
        Ok(())
    }
}

impl ContentEvent {
    /// Create a new PostUpserted event
    pub fn post_upserted(post: &Post, is_new: bool, actor: Option<String>) -> Self {
        ContentEvent::PostUpserted(PostUpsertedEvent {
            post_id: post.id,
            slug: post.slug.clone(),
            published: post.published,
            is_new,
            timestamp: Utc::now(),
            actor,
        })
    }

    /// Create a new PostDeleted event
    pub fn post_deleted(post: &Post, actor: Option<String>) -> Self {
        ContentEvent::PostDeleted(PostDeletedEvent {
            post_id: post.id,
            slug: post.slug.clone(),
            timestamp: Utc::now(),
            actor,
        })
    }

    pub fn taxonomy(
        kind: TaxonomyKind,
        id: Uuid,
        change: ChangeKind,
        actor: Option<String>,
    ) -> Self {
        ContentEvent::TaxonomyChanged(TaxonomyChangedEvent {
            kind,
            id,
            change,
            timestamp: Utc::now(),
            actor,
        })
    }

    pub fn category_deleted(
        category_id: Uuid,
        reassigned_to: Uuid,
        reassigned_posts: u64,
        actor: Option<String>,
    ) -> Self {
        ContentEvent::CategoryDeleted(CategoryDeletedEvent {
            category_id,
            reassigned_to,
            reassigned_posts,
            timestamp: Utc::now(),
            actor,
        })
    }
}
