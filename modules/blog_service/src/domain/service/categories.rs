use super::{internal, write_failed, Service};
use crate::contract::{
    Audit, AuthContext, BlogError, Category, CategoryPatch, CategoryQuery, NewCategory, Page,
    PageRequest,
};
use crate::domain::events::{ChangeKind, ContentEvent, TaxonomyKind};
use crate::domain::validation::normalize_name;
use uuid::Uuid;

impl Service {
    /// List categories, default first then by name
    pub async fn list_categories(
        &self,
        query: CategoryQuery,
        page: PageRequest,
    ) -> Result<Page<Category>, BlogError> {
        self.repos
            .categories
            .list(&query, page)
            .await
            .map_err(internal)
    }

    /// Every category, for navigation
    pub async fn all_categories(&self) -> Result<Vec<Category>, BlogError> {
        self.repos.categories.list_all().await.map_err(internal)
    }

    pub async fn get_category(&self, id: Uuid) -> Result<Category, BlogError> {
        self.repos
            .categories
            .find_by_id(id)
            .await
            .map_err(internal)?
            .ok_or_else(|| BlogError::not_found("category", id))
    }

    /// Create a category; `is_default` moves the default flag to it
    pub async fn create_category(
        &self,
        new: NewCategory,
        actor: &AuthContext,
    ) -> Result<Category, BlogError> {
        let name = normalize_name("name", &new.name, self.config.limits.category_name)?;
        self.ensure_category_name_free(&name, None).await?;

        let category = Category {
            id: Uuid::new_v4(),
            name,
            is_default: new.is_default,
            audit: Audit::created(actor),
        };
        let created = self
            .repos
            .categories
            .create(&category)
            .await
            .map_err(write_failed)?;

        tracing::info!(category_id = %created.id, name = %created.name, "Category created");
        self.publish(ContentEvent::taxonomy(
            TaxonomyKind::Category,
            created.id,
            ChangeKind::Created,
            actor.subject.clone(),
        ))
        .await;

        Ok(created)
    }

    /// Rename a category and/or make it the default
    pub async fn update_category(
        &self,
        id: Uuid,
        patch: CategoryPatch,
        actor: &AuthContext,
    ) -> Result<Category, BlogError> {
        let mut category = self.get_category(id).await?;

        if patch.is_default == Some(false) && category.is_default {
            return Err(BlogError::validation(
                "the default category cannot be unset; mark another category as default instead",
            ));
        }

        if let Some(name) = patch.name {
            let name = normalize_name("name", &name, self.config.limits.category_name)?;
            self.ensure_category_name_free(&name, Some(id)).await?;
            category.name = name;
        }

        let becomes_default = patch.is_default == Some(true) && !category.is_default;
        if becomes_default {
            category.is_default = true;
        }

        category.audit.touch(actor);
        let updated = self
            .repos
            .categories
            .update(&category)
            .await
            .map_err(write_failed)?;
        if becomes_default {
            tracing::info!(category_id = %id, "Default category changed");
        }

        self.publish(ContentEvent::taxonomy(
            TaxonomyKind::Category,
            id,
            ChangeKind::Updated,
            actor.subject.clone(),
        ))
        .await;

        Ok(updated)
    }

    /// Delete a non-default category, moving its posts to the default one
    ///
    /// Returns the number of reassigned posts.
    pub async fn delete_category(&self, id: Uuid, actor: &AuthContext) -> Result<u64, BlogError> {
        let category = self.get_category(id).await?;
        if category.is_default {
            return Err(BlogError::conflict(format!(
                "category '{}' is the default category and cannot be deleted",
                category.name
            )));
        }

        let default = self
            .repos
            .categories
            .find_default()
            .await
            .map_err(internal)?
            .ok_or_else(|| {
                BlogError::conflict("no default category exists to receive the posts")
            })?;

        let reassigned = self
            .repos
            .categories
            .delete_reassigning(id, default.id)
            .await
            .map_err(internal)?;

        tracing::info!(
            category_id = %id,
            default_category_id = %default.id,
            reassigned,
            "Category deleted"
        );
        self.publish(ContentEvent::category_deleted(
            id,
            default.id,
            reassigned,
            actor.subject.clone(),
        ))
        .await;

        Ok(reassigned)
    }

    /// Make sure a default category exists, creating the configured one
    pub async fn ensure_default_category(&self) -> Result<Category, BlogError> {
        if let Some(existing) = self
            .repos
            .categories
            .find_default()
            .await
            .map_err(internal)?
        {
            return Ok(existing);
        }

        let name = normalize_name(
            "default_category_name",
            &self.config.default_category_name,
            self.config.limits.category_name,
        )?;

        // Promote a same-named category instead of tripping the unique name rule
        if let Some(mut existing) = self
            .repos
            .categories
            .find_by_name(&name)
            .await
            .map_err(internal)?
        {
            self.repos
                .categories
                .set_default(existing.id)
                .await
                .map_err(internal)?;
            existing.is_default = true;
            tracing::info!(category_id = %existing.id, "Promoted existing category to default");
            return Ok(existing);
        }

        let category = Category {
            id: Uuid::new_v4(),
            name,
            is_default: true,
            audit: Audit::created(&AuthContext::system()),
        };
        let created = self
            .repos
            .categories
            .create(&category)
            .await
            .map_err(write_failed)?;
        tracing::info!(category_id = %created.id, name = %created.name, "Default category created");
        Ok(created)
    }

    async fn ensure_category_name_free(
        &self,
        name: &str,
        exclude: Option<Uuid>,
    ) -> Result<(), BlogError> {
        let existing = self
            .repos
            .categories
            .find_by_name(name)
            .await
            .map_err(internal)?;
        match existing {
            Some(other) if Some(other.id) != exclude => Err(BlogError::conflict(format!(
                "category '{}' already exists",
                other.name
            ))),
            _ => Ok(()),
        }
    }
}
