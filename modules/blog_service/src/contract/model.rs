//! Contract models for blog service
//!
//! These models are transport-agnostic and used for inter-module communication.
//! NO serde derives - these are pure domain models.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Audit fields shared by every persisted record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Audit {
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Subject of the authenticated caller that created the record
    pub created_by: Option<String>,
    /// Subject of the authenticated caller that last changed the record
    pub updated_by: Option<String>,
}

impl Audit {
    /// Fresh audit block for a record created by `actor`
    pub fn created(actor: &AuthContext) -> Self {
        let now = Utc::now();
        Self {
            created_at: now,
            updated_at: now,
            created_by: actor.subject.clone(),
            updated_by: actor.subject.clone(),
        }
    }

    /// Stamp an update by `actor`
    pub fn touch(&mut self, actor: &AuthContext) {
        self.updated_at = Utc::now();
        self.updated_by = actor.subject.clone();
    }
}

// ===== Taxonomy =====

/// Top-level post category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    /// The default category absorbs posts of deleted categories
    pub is_default: bool,
    pub audit: Audit,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewCategory {
    pub name: String,
    pub is_default: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryPatch {
    pub name: Option<String>,
    pub is_default: Option<bool>,
}

/// Category nested under exactly one parent category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subcategory {
    pub id: Uuid,
    pub name: String,
    pub category_id: Uuid,
    pub audit: Audit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSubcategory {
    pub name: String,
    pub category_id: Uuid,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubcategoryPatch {
    pub name: Option<String>,
    pub category_id: Option<Uuid>,
}

/// Flat post label
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub id: Uuid,
    pub name: String,
    pub audit: Audit,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewTag {
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagPatch {
    pub name: Option<String>,
}

// ===== Posts =====

/// Blog post
///
/// Drafts may leave `slug`, `content`, `cover_image_url` and `category_id`
/// empty; a published post has all of them.
#[derive(Debug, Clone, PartialEq)]
pub struct Post {
    pub id: Uuid,
    pub slug: Option<String>,
    pub title: String,
    /// Rich editor document, stored as-is
    pub content: Option<serde_json::Value>,
    /// Plain-text mirror of `content`
    pub content_text: String,
    pub cover_image_url: Option<String>,
    pub published: bool,
    pub published_at: Option<DateTime<Utc>>,
    pub category_id: Option<Uuid>,
    pub subcategory_id: Option<Uuid>,
    pub tag_ids: Vec<Uuid>,
    pub audit: Audit,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewPost {
    pub title: String,
    pub slug: Option<String>,
    pub content: Option<serde_json::Value>,
    pub cover_image_url: Option<String>,
    pub published: bool,
    pub category_id: Option<Uuid>,
    pub subcategory_id: Option<Uuid>,
    pub tag_ids: Vec<Uuid>,
}

/// Partial post update
///
/// `None` leaves a field untouched; `Some(None)` clears a nullable field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostPatch {
    pub title: Option<String>,
    pub slug: Option<Option<String>>,
    pub content: Option<Option<serde_json::Value>>,
    pub cover_image_url: Option<Option<String>>,
    pub published: Option<bool>,
    pub category_id: Option<Option<Uuid>>,
    pub subcategory_id: Option<Option<Uuid>>,
    pub tag_ids: Option<Vec<Uuid>>,
}

/// Post with its taxonomy resolved
#[derive(Debug, Clone, PartialEq)]
pub struct PostDetails {
    pub post: Post,
    pub category: Option<Category>,
    pub subcategory: Option<Subcategory>,
    pub tags: Vec<Tag>,
}

/// Published post as served to readers
#[derive(Debug, Clone, PartialEq)]
pub struct PublishedPost {
    pub details: PostDetails,
    pub toc: Vec<TocEntry>,
}

/// Heading extracted from a post body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TocEntry {
    /// Heading level, 1..=6
    pub level: u8,
    pub text: String,
    /// Anchor id, unique within the document
    pub anchor: String,
}

/// Outcome of a slug availability check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlugStatus {
    Available,
    Taken,
    Invalid { reason: String },
}

// ===== Queries and paging =====

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryQuery {
    pub search: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubcategoryQuery {
    pub search: Option<String>,
    pub category_id: Option<Uuid>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagQuery {
    pub search: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostQuery {
    /// Case-insensitive match on title or plain text
    pub search: Option<String>,
    pub published: Option<bool>,
    pub category_id: Option<Uuid>,
    pub subcategory_id: Option<Uuid>,
    pub tag_id: Option<Uuid>,
}

/// 1-based page request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub per_page: u64,
}

impl PageRequest {
    pub fn new(page: u64, per_page: u64) -> Self {
        Self { page, per_page }
    }

    /// Number of rows to skip
    pub fn offset(&self) -> u64 {
        self.page.saturating_sub(1) * self.per_page
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: 10,
        }
    }
}

/// One page of results plus the total row count
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: u64, request: PageRequest) -> Self {
        Self {
            items,
            total,
            page: request.page,
            per_page: request.per_page,
        }
    }

    pub fn total_pages(&self) -> u64 {
        if self.per_page == 0 {
            return 0;
        }
        self.total.div_ceil(self.per_page)
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            per_page: self.per_page,
        }
    }
}

/// Authentication context for audit stamping
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthContext {
    /// Token subject (`sub` claim)
    pub subject: Option<String>,
    /// Roles granted by the identity provider
    pub roles: Vec<String>,
}

impl AuthContext {
    /// Context for system tasks (start-up seeding, tests)
    pub fn system() -> Self {
        Self {
            subject: Some("system".to_string()),
            roles: Vec::new(),
        }
    }

    pub fn user(subject: impl Into<String>, roles: Vec<String>) -> Self {
        Self {
            subject: Some(subject.into()),
            roles,
        }
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}
