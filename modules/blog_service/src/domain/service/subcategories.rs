use super::{internal, write_failed, Service};
use crate::contract::{
    Audit, AuthContext, BlogError, NewSubcategory, Page, PageRequest, Subcategory,
    SubcategoryPatch, SubcategoryQuery,
};
use crate::domain::events::{ChangeKind, ContentEvent, TaxonomyKind};
use crate::domain::validation::normalize_name;
use uuid::Uuid;

impl Service {
    pub async fn list_subcategories(
        &self,
        query: SubcategoryQuery,
        page: PageRequest,
    ) -> Result<Page<Subcategory>, BlogError> {
        self.repos
            .subcategories
            .list(&query, page)
            .await
            .map_err(internal)
    }

    pub async fn get_subcategory(&self, id: Uuid) -> Result<Subcategory, BlogError> {
        self.repos
            .subcategories
            .find_by_id(id)
            .await
            .map_err(internal)?
            .ok_or_else(|| BlogError::not_found("subcategory", id))
    }

    pub async fn create_subcategory(
        &self,
        new: NewSubcategory,
        actor: &AuthContext,
    ) -> Result<Subcategory, BlogError> {
        let name = normalize_name("name", &new.name, self.config.limits.subcategory_name)?;
        self.ensure_parent_exists(new.category_id).await?;
        self.ensure_subcategory_name_free(new.category_id, &name, None)
            .await?;

        let subcategory = Subcategory {
            id: Uuid::new_v4(),
            name,
            category_id: new.category_id,
            audit: Audit::created(actor),
        };
        let created = self
            .repos
            .subcategories
            .create(&subcategory)
            .await
            .map_err(write_failed)?;

        self.publish(ContentEvent::taxonomy(
            TaxonomyKind::Subcategory,
            created.id,
            ChangeKind::Created,
            actor.subject.clone(),
        ))
        .await;

        Ok(created)
    }

    /// Rename a subcategory or move it under another category
    ///
    /// Moving is refused while posts still reference the subcategory, since
    /// they would end up with a subcategory outside their category.
    pub async fn update_subcategory(
        &self,
        id: Uuid,
        patch: SubcategoryPatch,
        actor: &AuthContext,
    ) -> Result<Subcategory, BlogError> {
        let mut subcategory = self.get_subcategory(id).await?;

        if let Some(category_id) = patch.category_id {
            if category_id != subcategory.category_id {
                self.ensure_parent_exists(category_id).await?;
                let in_use = self
                    .repos
                    .subcategories
                    .count_posts(id)
                    .await
                    .map_err(internal)?;
                if in_use > 0 {
                    return Err(BlogError::conflict(format!(
                        "subcategory '{}' is used by {} post(s) and cannot change category",
                        subcategory.name, in_use
                    )));
                }
                subcategory.category_id = category_id;
            }
        }

        if let Some(name) = patch.name {
            subcategory.name =
                normalize_name("name", &name, self.config.limits.subcategory_name)?;
        }

        self.ensure_subcategory_name_free(subcategory.category_id, &subcategory.name, Some(id))
            .await?;

        subcategory.audit.touch(actor);
        let updated = self
            .repos
            .subcategories
            .update(&subcategory)
            .await
            .map_err(write_failed)?;

        self.publish(ContentEvent::taxonomy(
            TaxonomyKind::Subcategory,
            id,
            ChangeKind::Updated,
            actor.subject.clone(),
        ))
        .await;

        Ok(updated)
    }

    /// Delete a subcategory no post refers to
    pub async fn delete_subcategory(&self, id: Uuid, actor: &AuthContext) -> Result<(), BlogError> {
        let subcategory = self.get_subcategory(id).await?;

        let in_use = self
            .repos
            .subcategories
            .count_posts(id)
            .await
            .map_err(internal)?;
        if in_use > 0 {
            return Err(BlogError::conflict(format!(
                "subcategory '{}' is used by {} post(s)",
                subcategory.name, in_use
            )));
        }

        self.repos
            .subcategories
            .delete(id)
            .await
            .map_err(internal)?;

        self.publish(ContentEvent::taxonomy(
            TaxonomyKind::Subcategory,
            id,
            ChangeKind::Deleted,
            actor.subject.clone(),
        ))
        .await;

        Ok(())
    }

    async fn ensure_parent_exists(&self, category_id: Uuid) -> Result<(), BlogError> {
        let parent = self
            .repos
            .categories
            .find_by_id(category_id)
            .await
            .map_err(internal)?;
        if parent.is_none() {
            return Err(BlogError::validation(format!(
                "category {} does not exist",
                category_id
            )));
        }
        Ok(())
    }

    async fn ensure_subcategory_name_free(
        &self,
        category_id: Uuid,
        name: &str,
        exclude: Option<Uuid>,
    ) -> Result<(), BlogError> {
        let existing = self
            .repos
            .subcategories
            .find_by_name(category_id, name)
            .await
            .map_err(internal)?;
        match existing {
            Some(other) if Some(other.id) != exclude => Err(BlogError::conflict(format!(
                "subcategory '{}' already exists in this category",
                other.name
            ))),
            _ => Ok(()),
        }
    }
}
