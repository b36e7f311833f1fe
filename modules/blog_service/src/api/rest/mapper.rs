//! Mapper implementations for converting between DTOs and contract models

use super::dto::*;
use crate::contract;
use crate::domain::content::excerpt;

// ===== Category conversions =====

impl From<contract::Category> for CategoryDto {
    fn from(category: contract::Category) -> Self {
        Self {
            id: category.id,
            name: category.name,
            is_default: category.is_default,
            created_at: category.audit.created_at,
            updated_at: category.audit.updated_at,
            created_by: category.audit.created_by,
            updated_by: category.audit.updated_by,
        }
    }
}

impl From<CreateCategoryRequest> for contract::NewCategory {
    fn from(req: CreateCategoryRequest) -> Self {
        Self {
            name: req.name,
            is_default: req.is_default,
        }
    }
}

impl From<UpdateCategoryRequest> for contract::CategoryPatch {
    fn from(req: UpdateCategoryRequest) -> Self {
        Self {
            name: req.name,
            is_default: req.is_default,
        }
    }
}

// ===== Subcategory conversions =====

impl From<contract::Subcategory> for SubcategoryDto {
    fn from(subcategory: contract::Subcategory) -> Self {
        Self {
            id: subcategory.id,
            name: subcategory.name,
            category_id: subcategory.category_id,
            created_at: subcategory.audit.created_at,
            updated_at: subcategory.audit.updated_at,
            created_by: subcategory.audit.created_by,
            updated_by: subcategory.audit.updated_by,
        }
    }
}

impl From<CreateSubcategoryRequest> for contract::NewSubcategory {
    fn from(req: CreateSubcategoryRequest) -> Self {
        Self {
            name: req.name,
            category_id: req.category_id,
        }
    }
}

impl From<UpdateSubcategoryRequest> for contract::SubcategoryPatch {
    fn from(req: UpdateSubcategoryRequest) -> Self {
        Self {
            name: req.name,
            category_id: req.category_id,
        }
    }
}

// ===== Tag conversions =====

impl From<contract::Tag> for TagDto {
    fn from(tag: contract::Tag) -> Self {
        Self {
            id: tag.id,
            name: tag.name,
            created_at: tag.audit.created_at,
            updated_at: tag.audit.updated_at,
            created_by: tag.audit.created_by,
            updated_by: tag.audit.updated_by,
        }
    }
}

impl From<CreateTagRequest> for contract::NewTag {
    fn from(req: CreateTagRequest) -> Self {
        Self { name: req.name }
    }
}

impl From<UpdateTagRequest> for contract::TagPatch {
    fn from(req: UpdateTagRequest) -> Self {
        Self { name: req.name }
    }
}

// ===== Post conversions =====

impl From<contract::Post> for PostDto {
    fn from(post: contract::Post) -> Self {
        Self {
            id: post.id,
            slug: post.slug,
            title: post.title,
            content: post.content,
            content_text: post.content_text,
            cover_image_url: post.cover_image_url,
            published: post.published,
            published_at: post.published_at,
            category_id: post.category_id,
            subcategory_id: post.subcategory_id,
            tag_ids: post.tag_ids,
            created_at: post.audit.created_at,
            updated_at: post.audit.updated_at,
            created_by: post.audit.created_by,
            updated_by: post.audit.updated_by,
        }
    }
}

impl From<contract::PostDetails> for PostDetailsDto {
    fn from(details: contract::PostDetails) -> Self {
        Self {
            post: details.post.into(),
            category: details.category.map(Into::into),
            subcategory: details.subcategory.map(Into::into),
            tags: details.tags.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<CreatePostRequest> for contract::NewPost {
    fn from(req: CreatePostRequest) -> Self {
        Self {
            title: req.title,
            slug: req.slug,
            content: req.content,
            cover_image_url: req.cover_image_url,
            published: req.published,
            category_id: req.category_id,
            subcategory_id: req.subcategory_id,
            tag_ids: req.tag_ids,
        }
    }
}

impl From<UpdatePostRequest> for contract::PostPatch {
    fn from(req: UpdatePostRequest) -> Self {
        Self {
            title: req.title,
            slug: req.slug,
            content: req.content,
            cover_image_url: req.cover_image_url,
            published: req.published,
            category_id: req.category_id,
            subcategory_id: req.subcategory_id,
            tag_ids: req.tag_ids,
        }
    }
}

impl From<ListPostsQuery> for contract::PostQuery {
    fn from(query: ListPostsQuery) -> Self {
        Self {
            search: query.search,
            published: query.published,
            category_id: query.category_id,
            subcategory_id: query.subcategory_id,
            tag_id: query.tag_id,
        }
    }
}

impl From<PublicPostsQuery> for contract::PostQuery {
    fn from(query: PublicPostsQuery) -> Self {
        Self {
            search: query.search,
            published: Some(true),
            category_id: query.category_id,
            subcategory_id: query.subcategory_id,
            tag_id: query.tag_id,
        }
    }
}

impl SlugCheckResponse {
    pub fn new(slug: String, status: contract::SlugStatus) -> Self {
        let (status, reason) = match status {
            contract::SlugStatus::Available => (SlugAvailability::Available, None),
            contract::SlugStatus::Taken => (SlugAvailability::Taken, None),
            contract::SlugStatus::Invalid { reason } => (SlugAvailability::Invalid, Some(reason)),
        };
        Self {
            slug,
            status,
            reason,
        }
    }
}

// ===== Public reader conversions =====

impl PostSummaryDto {
    /// Summary with the first `excerpt_length` characters of plain text
    pub fn from_post(post: contract::Post, excerpt_length: usize) -> Self {
        Self {
            excerpt: excerpt(&post.content_text, excerpt_length),
            id: post.id,
            slug: post.slug,
            title: post.title,
            cover_image_url: post.cover_image_url,
            published_at: post.published_at,
            category_id: post.category_id,
            subcategory_id: post.subcategory_id,
            tag_ids: post.tag_ids,
        }
    }
}

impl From<contract::TocEntry> for TocEntryDto {
    fn from(entry: contract::TocEntry) -> Self {
        Self {
            level: entry.level,
            text: entry.text,
            anchor: entry.anchor,
        }
    }
}

impl From<contract::PublishedPost> for PublishedPostDto {
    fn from(published: contract::PublishedPost) -> Self {
        Self {
            details: published.details.into(),
            toc: published.toc.into_iter().map(Into::into).collect(),
        }
    }
}

// ===== List conversions =====

impl From<contract::Page<contract::Category>> for CategoryListResponse {
    fn from(page: contract::Page<contract::Category>) -> Self {
        let total_pages = page.total_pages();
        Self {
            items: page.items.into_iter().map(Into::into).collect(),
            total: page.total,
            page: page.page,
            per_page: page.per_page,
            total_pages,
        }
    }
}

impl From<contract::Page<contract::Subcategory>> for SubcategoryListResponse {
    fn from(page: contract::Page<contract::Subcategory>) -> Self {
        let total_pages = page.total_pages();
        Self {
            items: page.items.into_iter().map(Into::into).collect(),
            total: page.total,
            page: page.page,
            per_page: page.per_page,
            total_pages,
        }
    }
}

impl From<contract::Page<contract::Tag>> for TagListResponse {
    fn from(page: contract::Page<contract::Tag>) -> Self {
        let total_pages = page.total_pages();
        Self {
            items: page.items.into_iter().map(Into::into).collect(),
            total: page.total,
            page: page.page,
            per_page: page.per_page,
            total_pages,
        }
    }
}

impl From<contract::Page<contract::Post>> for PostListResponse {
    fn from(page: contract::Page<contract::Post>) -> Self {
        let total_pages = page.total_pages();
        Self {
            items: page.items.into_iter().map(Into::into).collect(),
            total: page.total,
            page: page.page,
            per_page: page.per_page,
            total_pages,
        }
    }
}

impl From<contract::Page<PostSummaryDto>> for PostSummaryListResponse {
    fn from(page: contract::Page<PostSummaryDto>) -> Self {
        let total_pages = page.total_pages();
        Self {
            items: page.items,
            total: page.total,
            page: page.page,
            per_page: page.per_page,
            total_pages,
        }
    }
}
