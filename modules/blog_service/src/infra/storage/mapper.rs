//! Entity to model mappers
//!
//! Conversions between SeaORM entities and contract models

use super::entity::{category, post, post_tag, subcategory, tag};
use crate::contract::{Audit, Category, Post, Subcategory, Tag};
use sea_orm::ActiveValue::Set;
use uuid::Uuid;

fn audit(
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
    created_by: Option<String>,
    updated_by: Option<String>,
) -> Audit {
    Audit {
        created_at,
        updated_at,
        created_by,
        updated_by,
    }
}

/// Case-folded form of a taxonomy name, used for lookups and uniqueness
pub fn name_key(name: &str) -> String {
    name.to_lowercase()
}

// ===== Category Conversions =====

impl From<category::Model> for Category {
    fn from(entity: category::Model) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            is_default: entity.is_default,
            audit: audit(
                entity.created_at,
                entity.updated_at,
                entity.created_by,
                entity.updated_by,
            ),
        }
    }
}

impl From<&Category> for category::ActiveModel {
    fn from(model: &Category) -> Self {
        Self {
            id: Set(model.id),
            name: Set(model.name.clone()),
            name_key: Set(name_key(&model.name)),
            is_default: Set(model.is_default),
            created_at: Set(model.audit.created_at),
            updated_at: Set(model.audit.updated_at),
            created_by: Set(model.audit.created_by.clone()),
            updated_by: Set(model.audit.updated_by.clone()),
        }
    }
}

// ===== Subcategory Conversions =====

impl From<subcategory::Model> for Subcategory {
    fn from(entity: subcategory::Model) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            category_id: entity.category_id,
            audit: audit(
                entity.created_at,
                entity.updated_at,
                entity.created_by,
                entity.updated_by,
            ),
        }
    }
}

impl From<&Subcategory> for subcategory::ActiveModel {
    fn from(model: &Subcategory) -> Self {
        Self {
            id: Set(model.id),
            name: Set(model.name.clone()),
            name_key: Set(name_key(&model.name)),
            category_id: Set(model.category_id),
            created_at: Set(model.audit.created_at),
            updated_at: Set(model.audit.updated_at),
            created_by: Set(model.audit.created_by.clone()),
            updated_by: Set(model.audit.updated_by.clone()),
        }
    }
}

// ===== Tag Conversions =====

impl From<tag::Model> for Tag {
    fn from(entity: tag::Model) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            audit: audit(
                entity.created_at,
                entity.updated_at,
                entity.created_by,
                entity.updated_by,
            ),
        }
    }
}

impl From<&Tag> for tag::ActiveModel {
    fn from(model: &Tag) -> Self {
        Self {
            id: Set(model.id),
            name: Set(model.name.clone()),
            name_key: Set(name_key(&model.name)),
            created_at: Set(model.audit.created_at),
            updated_at: Set(model.audit.updated_at),
            created_by: Set(model.audit.created_by.clone()),
            updated_by: Set(model.audit.updated_by.clone()),
        }
    }
}

// ===== Post Conversions =====

/// Build a post from its row and its ordered tag ids
pub fn post_from_entity(entity: post::Model, tag_ids: Vec<Uuid>) -> Post {
    Post {
        id: entity.id,
        slug: entity.slug,
        title: entity.title,
        content: entity.content,
        content_text: entity.content_text,
        cover_image_url: entity.cover_image_url,
        published: entity.published,
        published_at: entity.published_at,
        category_id: entity.category_id,
        subcategory_id: entity.subcategory_id,
        tag_ids,
        audit: audit(
            entity.created_at,
            entity.updated_at,
            entity.created_by,
            entity.updated_by,
        ),
    }
}

impl From<&Post> for post::ActiveModel {
    fn from(model: &Post) -> Self {
        Self {
            id: Set(model.id),
            slug: Set(model.slug.clone()),
            title: Set(model.title.clone()),
            content: Set(model.content.clone()),
            content_text: Set(model.content_text.clone()),
            cover_image_url: Set(model.cover_image_url.clone()),
            published: Set(model.published),
            published_at: Set(model.published_at),
            category_id: Set(model.category_id),
            subcategory_id: Set(model.subcategory_id),
            created_at: Set(model.audit.created_at),
            updated_at: Set(model.audit.updated_at),
            created_by: Set(model.audit.created_by.clone()),
            updated_by: Set(model.audit.updated_by.clone()),
        }
    }
}

/// Join rows for a post's tags, keeping their order
pub fn post_tag_rows(post: &Post) -> Vec<post_tag::ActiveModel> {
    post.tag_ids
        .iter()
        .enumerate()
        .map(|(position, tag_id)| post_tag::ActiveModel {
            post_id: Set(post.id),
            tag_id: Set(*tag_id),
            position: Set(position as i32),
        })
        .collect()
}
