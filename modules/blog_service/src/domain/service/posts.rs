use super::{internal, write_failed, Service};
use crate::contract::{
    Audit, AuthContext, BlogError, NewPost, Page, PageRequest, Post, PostDetails, PostPatch,
    PostQuery, SlugStatus,
};
use crate::domain::content::plain_text;
use crate::domain::events::ContentEvent;
use crate::domain::slug::{slugify, with_suffix};
use crate::domain::validation::{validate_content, validate_cover_image_url, validate_slug};
use chrono::Utc;
use uuid::Uuid;

/// Give up on numeric suffixes after this many collisions
const MAX_SLUG_ATTEMPTS: u32 = 100;

impl Service {
    /// List posts, newest first
    pub async fn list_posts(
        &self,
        query: PostQuery,
        page: PageRequest,
    ) -> Result<Page<Post>, BlogError> {
        self.repos.posts.list(&query, page).await.map_err(internal)
    }

    pub async fn get_post(&self, id: Uuid) -> Result<Post, BlogError> {
        self.repos
            .posts
            .find_by_id(id)
            .await
            .map_err(internal)?
            .ok_or_else(|| BlogError::not_found("post", id))
    }

    /// Post with category, subcategory and tags resolved
    pub async fn get_post_details(&self, id: Uuid) -> Result<PostDetails, BlogError> {
        let post = self.get_post(id).await?;
        self.resolve_details(post).await
    }

    /// Create a post
    ///
    /// When no slug is given, one is derived from the title.
    pub async fn create_post(&self, new: NewPost, actor: &AuthContext) -> Result<Post, BlogError> {
        let mut post = Post {
            id: Uuid::new_v4(),
            slug: new.slug,
            title: new.title,
            content: new.content,
            content_text: String::new(),
            cover_image_url: new.cover_image_url,
            published: new.published,
            published_at: None,
            category_id: new.category_id,
            subcategory_id: new.subcategory_id,
            tag_ids: new.tag_ids,
            audit: Audit::created(actor),
        };

        self.prepare_post(&mut post, None, true, false).await?;

        let created = self.repos.posts.create(&post).await.map_err(write_failed)?;
        tracing::info!(
            post_id = %created.id,
            slug = ?created.slug,
            published = created.published,
            "Post created"
        );
        self.publish(ContentEvent::post_upserted(
            &created,
            true,
            actor.subject.clone(),
        ))
        .await;

        Ok(created)
    }

    /// Apply a partial update and re-validate the whole post
    pub async fn update_post(
        &self,
        id: Uuid,
        patch: PostPatch,
        actor: &AuthContext,
    ) -> Result<Post, BlogError> {
        let mut post = self.get_post(id).await?;
        let was_published = post.published;

        if let Some(title) = patch.title {
            post.title = title;
        }
        if let Some(slug) = patch.slug {
            post.slug = slug;
        }
        if let Some(content) = patch.content {
            post.content = content;
        }
        if let Some(cover) = patch.cover_image_url {
            post.cover_image_url = cover;
        }
        if let Some(published) = patch.published {
            post.published = published;
        }
        if let Some(category_id) = patch.category_id {
            post.category_id = category_id;
        }
        if let Some(subcategory_id) = patch.subcategory_id {
            post.subcategory_id = subcategory_id;
        }
        if let Some(tag_ids) = patch.tag_ids {
            post.tag_ids = tag_ids;
        }

        self.prepare_post(&mut post, Some(id), false, was_published)
            .await?;
        post.audit.touch(actor);

        let updated = self.repos.posts.update(&post).await.map_err(write_failed)?;
        if updated.published != was_published {
            tracing::info!(post_id = %id, published = updated.published, "Post visibility changed");
        }
        self.publish(ContentEvent::post_upserted(
            &updated,
            false,
            actor.subject.clone(),
        ))
        .await;

        Ok(updated)
    }

    pub async fn delete_post(&self, id: Uuid, actor: &AuthContext) -> Result<(), BlogError> {
        let post = self.get_post(id).await?;
        self.repos.posts.delete(id).await.map_err(internal)?;

        tracing::info!(post_id = %id, "Post deleted");
        self.publish(ContentEvent::post_deleted(&post, actor.subject.clone()))
            .await;
        Ok(())
    }

    /// First free slug derived from `title`: `base`, `base-2`, `base-3`...
    ///
    /// Returns `None` when the title has nothing to build a slug from.
    pub async fn suggest_slug(
        &self,
        title: &str,
        exclude: Option<Uuid>,
    ) -> Result<Option<String>, BlogError> {
        let max_len = self.config.limits.slug;
        let base = slugify(title, max_len);
        if base.is_empty() {
            return Ok(None);
        }

        for attempt in 1..=MAX_SLUG_ATTEMPTS {
            let candidate = with_suffix(&base, attempt, max_len);
            let taken = self
                .repos
                .posts
                .slug_exists(&candidate, exclude)
                .await
                .map_err(internal)?;
            if !taken {
                return Ok(Some(candidate));
            }
        }

        let short_id = Uuid::new_v4().simple().to_string();
        let suffix = &short_id[..8.min(max_len)];
        let room = max_len.saturating_sub(suffix.len() + 1);
        let head = slugify(&base, room);
        Ok(Some(if head.is_empty() {
            suffix.to_string()
        } else {
            format!("{}-{}", head, suffix)
        }))
    }

    /// Check whether `slug` is well-formed and free
    pub async fn check_slug(
        &self,
        slug: &str,
        exclude: Option<Uuid>,
    ) -> Result<SlugStatus, BlogError> {
        if let Err(e) = validate_slug(slug, self.config.limits.slug) {
            let reason = match e {
                BlogError::Validation { message } => message,
                other => other.to_string(),
            };
            return Ok(SlugStatus::Invalid { reason });
        }

        let taken = self
            .repos
            .posts
            .slug_exists(slug, exclude)
            .await
            .map_err(internal)?;
        Ok(if taken {
            SlugStatus::Taken
        } else {
            SlugStatus::Available
        })
    }

    pub(super) async fn resolve_details(&self, post: Post) -> Result<PostDetails, BlogError> {
        let category = match post.category_id {
            Some(id) => self
                .repos
                .categories
                .find_by_id(id)
                .await
                .map_err(internal)?,
            None => None,
        };
        let subcategory = match post.subcategory_id {
            Some(id) => self
                .repos
                .subcategories
                .find_by_id(id)
                .await
                .map_err(internal)?,
            None => None,
        };
        let tags = if post.tag_ids.is_empty() {
            Vec::new()
        } else {
            self.repos
                .tags
                .find_by_ids(&post.tag_ids)
                .await
                .map_err(internal)?
        };

        Ok(PostDetails {
            post,
            category,
            subcategory,
            tags,
        })
    }

    /// Normalize and validate a post before it is stored
    ///
    /// Drafts only need well-formed fields; a published post additionally
    /// needs title, slug, category, content and cover image.
    async fn prepare_post(
        &self,
        post: &mut Post,
        exclude: Option<Uuid>,
        generate_slug: bool,
        was_published: bool,
    ) -> Result<(), BlogError> {
        let limits = self.config.limits;

        post.title = post.title.trim().to_string();
        let title_len = post.title.chars().count();
        if title_len > limits.post_title {
            return Err(BlogError::validation(format!(
                "title must be at most {} characters (got {})",
                limits.post_title, title_len
            )));
        }

        post.slug = post
            .slug
            .take()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        if let Some(slug) = post.slug.as_deref() {
            validate_slug(slug, limits.slug)?;
        } else if generate_slug {
            post.slug = self.suggest_slug(&post.title, exclude).await?;
        }

        post.content_text = match &post.content {
            Some(doc) => {
                validate_content(doc)?;
                plain_text(doc)
            }
            None => String::new(),
        };

        post.cover_image_url = post
            .cover_image_url
            .take()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        if let Some(url) = &post.cover_image_url {
            validate_cover_image_url(url)?;
        }

        self.check_taxonomy(post).await?;

        if post.published {
            let mut missing = Vec::new();
            if post.title.is_empty() {
                missing.push("title");
            }
            if post.slug.is_none() {
                missing.push("slug");
            }
            if post.category_id.is_none() {
                missing.push("category");
            }
            if post.content_text.trim().is_empty() {
                missing.push("content");
            }
            if post.cover_image_url.is_none() {
                missing.push("coverImageUrl");
            }
            if !missing.is_empty() {
                return Err(BlogError::validation(format!(
                    "a published post requires: {}",
                    missing.join(", ")
                )));
            }
        }

        if let Some(slug) = &post.slug {
            let taken = self
                .repos
                .posts
                .slug_exists(slug, exclude)
                .await
                .map_err(internal)?;
            if taken {
                return Err(BlogError::conflict(format!(
                    "slug '{}' is already in use",
                    slug
                )));
            }
        }

        post.published_at = match (post.published, was_published) {
            (true, true) => post.published_at.or_else(|| Some(Utc::now())),
            (true, false) => Some(Utc::now()),
            (false, _) => None,
        };

        Ok(())
    }

    /// Category, subcategory and tags must exist and agree with each other
    async fn check_taxonomy(&self, post: &mut Post) -> Result<(), BlogError> {
        if let Some(category_id) = post.category_id {
            let exists = self
                .repos
                .categories
                .find_by_id(category_id)
                .await
                .map_err(internal)?
                .is_some();
            if !exists {
                return Err(BlogError::validation(format!(
                    "category {} does not exist",
                    category_id
                )));
            }
        }

        if let Some(subcategory_id) = post.subcategory_id {
            let Some(category_id) = post.category_id else {
                return Err(BlogError::validation(
                    "a subcategory requires a category",
                ));
            };
            let subcategory = self
                .repos
                .subcategories
                .find_by_id(subcategory_id)
                .await
                .map_err(internal)?
                .ok_or_else(|| {
                    BlogError::validation(format!(
                        "subcategory {} does not exist",
                        subcategory_id
                    ))
                })?;
            if subcategory.category_id != category_id {
                return Err(BlogError::validation(format!(
                    "subcategory '{}' does not belong to category {}",
                    subcategory.name, category_id
                )));
            }
        }

        let mut unique = Vec::with_capacity(post.tag_ids.len());
        for id in post.tag_ids.drain(..) {
            if !unique.contains(&id) {
                unique.push(id);
            }
        }
        post.tag_ids = unique;

        if !post.tag_ids.is_empty() {
            let found = self
                .repos
                .tags
                .find_by_ids(&post.tag_ids)
                .await
                .map_err(internal)?;
            let missing: Vec<String> = post
                .tag_ids
                .iter()
                .filter(|id| !found.iter().any(|t| t.id == **id))
                .map(|id| id.to_string())
                .collect();
            if !missing.is_empty() {
                return Err(BlogError::validation(format!(
                    "unknown tag id(s): {}",
                    missing.join(", ")
                )));
            }
        }

        Ok(())
    }
}
