//! REST DTOs with serde derives for HTTP API
//!
//! Field names are camelCase on the wire.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

/// Distinguish an absent field (`None`) from an explicit `null` (`Some(None)`)
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

// ===== Category DTOs =====

/// Category response DTO
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDto {
    pub id: Uuid,

    #[schema(example = "Engineering")]
    pub name: String,

    /// Receives the posts of deleted categories
    pub is_default: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<String>,
}

/// Create category request
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCategoryRequest {
    #[schema(example = "Engineering")]
    pub name: String,

    /// Make this the default category
    #[serde(default)]
    pub is_default: bool,
}

/// Partial category update
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCategoryRequest {
    pub name: Option<String>,

    /// Only `true` is accepted; the default moves, it is never unset
    pub is_default: Option<bool>,
}

/// Result of deleting a category
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDeleteResponse {
    /// Posts moved to the default category
    pub reassigned_posts: u64,
}

// ===== Subcategory DTOs =====

/// Subcategory response DTO
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubcategoryDto {
    pub id: Uuid,

    #[schema(example = "Rust")]
    pub name: String,

    pub category_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<String>,
}

/// Create subcategory request
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateSubcategoryRequest {
    #[schema(example = "Rust")]
    pub name: String,

    pub category_id: Uuid,
}

/// Partial subcategory update
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSubcategoryRequest {
    pub name: Option<String>,

    /// Move to another category; only allowed while no post uses it
    pub category_id: Option<Uuid>,
}

// ===== Tag DTOs =====

/// Tag response DTO
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TagDto {
    pub id: Uuid,

    #[schema(example = "async")]
    pub name: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<String>,
}

/// Create tag request
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTagRequest {
    #[schema(example = "async")]
    pub name: String,
}

/// Partial tag update
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTagRequest {
    pub name: Option<String>,
}

// ===== Post DTOs =====

/// Post response DTO
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PostDto {
    pub id: Uuid,

    #[schema(example = "hello-world")]
    pub slug: Option<String>,

    #[schema(example = "Hello, world")]
    pub title: String,

    /// Rich editor document
    #[schema(value_type = Option<Object>)]
    pub content: Option<serde_json::Value>,

    /// Plain text derived from `content`
    pub content_text: String,

    pub cover_image_url: Option<String>,
    pub published: bool,
    pub published_at: Option<DateTime<Utc>>,
    pub category_id: Option<Uuid>,
    pub subcategory_id: Option<Uuid>,

    /// Tag ids in display order
    pub tag_ids: Vec<Uuid>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<String>,
}

/// Post with its category, subcategory and tags resolved
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PostDetailsDto {
    #[serde(flatten)]
    pub post: PostDto,

    pub category: Option<CategoryDto>,
    pub subcategory: Option<SubcategoryDto>,
    pub tags: Vec<TagDto>,
}

/// Create post request
///
/// Only `title` is needed for a draft. A published post also needs a slug
/// (generated from the title when omitted), content, a category and a cover
/// image.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    #[serde(default)]
    #[schema(example = "Hello, world")]
    pub title: String,

    #[serde(default)]
    pub slug: Option<String>,

    #[serde(default)]
    #[schema(value_type = Option<Object>)]
    pub content: Option<serde_json::Value>,

    #[serde(default)]
    pub cover_image_url: Option<String>,

    #[serde(default)]
    pub published: bool,

    #[serde(default)]
    pub category_id: Option<Uuid>,

    #[serde(default)]
    pub subcategory_id: Option<Uuid>,

    #[serde(default)]
    pub tag_ids: Vec<Uuid>,
}

/// Partial post update
///
/// Omitted fields are left unchanged; `null` clears a nullable field.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePostRequest {
    #[serde(default)]
    pub title: Option<String>,

    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>, nullable)]
    pub slug: Option<Option<String>>,

    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<Object>, nullable)]
    pub content: Option<Option<serde_json::Value>>,

    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>, nullable)]
    pub cover_image_url: Option<Option<String>>,

    #[serde(default)]
    pub published: Option<bool>,

    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<Uuid>, nullable)]
    pub category_id: Option<Option<Uuid>>,

    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<Uuid>, nullable)]
    pub subcategory_id: Option<Option<Uuid>>,

    /// Replaces the whole tag list
    #[serde(default)]
    pub tag_ids: Option<Vec<Uuid>>,
}

/// Query for a slug suggestion
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct SlugSuggestionQuery {
    /// Post title to derive the slug from
    pub title: String,

    /// Post being edited; its own slug does not count as taken
    pub exclude_id: Option<Uuid>,
}

/// Suggested slug; `null` when the title yields nothing usable
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SlugSuggestionResponse {
    #[schema(example = "hello-world-2")]
    pub slug: Option<String>,
}

/// Query for a slug availability check
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct SlugCheckQuery {
    pub slug: String,
    pub exclude_id: Option<Uuid>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SlugAvailability {
    Available,
    Taken,
    Invalid,
}

/// Slug availability
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SlugCheckResponse {
    pub slug: String,
    pub status: SlugAvailability,

    /// Why the slug is invalid
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

// ===== Public reader DTOs =====

/// Published post in a listing
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PostSummaryDto {
    pub id: Uuid,
    pub slug: Option<String>,
    pub title: String,

    /// Leading part of the post's plain text
    pub excerpt: String,

    pub cover_image_url: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub category_id: Option<Uuid>,
    pub subcategory_id: Option<Uuid>,
    pub tag_ids: Vec<Uuid>,
}

/// Table of contents entry
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TocEntryDto {
    /// Heading level, 1 to 6
    pub level: u8,
    pub text: String,

    /// Anchor id for in-page links
    #[schema(example = "getting-started")]
    pub anchor: String,
}

/// Published post with its table of contents
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PublishedPostDto {
    #[serde(flatten)]
    pub details: PostDetailsDto,

    pub toc: Vec<TocEntryDto>,
}

// ===== List Query DTOs =====

/// Paging and search for taxonomy listings
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    /// Case-insensitive name match
    pub search: Option<String>,

    /// 1-based page number
    pub page: Option<u64>,

    /// Page size, capped by configuration
    pub per_page: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListSubcategoriesQuery {
    pub search: Option<String>,

    /// Only subcategories of this category
    pub category_id: Option<Uuid>,

    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListPostsQuery {
    /// Case-insensitive match on title or text
    pub search: Option<String>,

    pub published: Option<bool>,
    pub category_id: Option<Uuid>,
    pub subcategory_id: Option<Uuid>,
    pub tag_id: Option<Uuid>,
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct PublicPostsQuery {
    pub search: Option<String>,
    pub category_id: Option<Uuid>,
    pub subcategory_id: Option<Uuid>,
    pub tag_id: Option<Uuid>,
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

// ===== List Response DTOs =====

/// Paginated list of categories
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryListResponse {
    pub items: Vec<CategoryDto>,
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
    pub total_pages: u64,
}

/// Paginated list of subcategories
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubcategoryListResponse {
    pub items: Vec<SubcategoryDto>,
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
    pub total_pages: u64,
}

/// Paginated list of tags
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TagListResponse {
    pub items: Vec<TagDto>,
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
    pub total_pages: u64,
}

/// Paginated list of posts
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PostListResponse {
    pub items: Vec<PostDto>,
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
    pub total_pages: u64,
}

/// Paginated list of published post summaries
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PostSummaryListResponse {
    pub items: Vec<PostSummaryDto>,
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
    pub total_pages: u64,
}

/// Liveness response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    #[schema(example = "ok")]
    pub status: String,
}
