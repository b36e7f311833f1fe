use super::{internal, write_failed, Service};
use crate::contract::{
    Audit, AuthContext, BlogError, NewTag, Page, PageRequest, Tag, TagPatch, TagQuery,
};
use crate::domain::events::{ChangeKind, ContentEvent, TaxonomyKind};
use crate::domain::validation::normalize_name;
use uuid::Uuid;

impl Service {
    pub async fn list_tags(
        &self,
        query: TagQuery,
        page: PageRequest,
    ) -> Result<Page<Tag>, BlogError> {
        self.repos.tags.list(&query, page).await.map_err(internal)
    }

    pub async fn all_tags(&self) -> Result<Vec<Tag>, BlogError> {
        self.repos.tags.list_all().await.map_err(internal)
    }

    pub async fn get_tag(&self, id: Uuid) -> Result<Tag, BlogError> {
        self.repos
            .tags
            .find_by_id(id)
            .await
            .map_err(internal)?
            .ok_or_else(|| BlogError::not_found("tag", id))
    }

    pub async fn create_tag(&self, new: NewTag, actor: &AuthContext) -> Result<Tag, BlogError> {
        let name = normalize_name("name", &new.name, self.config.limits.tag_name)?;
        self.ensure_tag_name_free(&name, None).await?;

        let tag = Tag {
            id: Uuid::new_v4(),
            name,
            audit: Audit::created(actor),
        };
        let created = self.repos.tags.create(&tag).await.map_err(write_failed)?;

        self.publish(ContentEvent::taxonomy(
            TaxonomyKind::Tag,
            created.id,
            ChangeKind::Created,
            actor.subject.clone(),
        ))
        .await;

        Ok(created)
    }

    pub async fn update_tag(
        &self,
        id: Uuid,
        patch: TagPatch,
        actor: &AuthContext,
    ) -> Result<Tag, BlogError> {
        let mut tag = self.get_tag(id).await?;

        if let Some(name) = patch.name {
            let name = normalize_name("name", &name, self.config.limits.tag_name)?;
            self.ensure_tag_name_free(&name, Some(id)).await?;
            tag.name = name;
        }

        tag.audit.touch(actor);
        let updated = self.repos.tags.update(&tag).await.map_err(write_failed)?;

        self.publish(ContentEvent::taxonomy(
            TaxonomyKind::Tag,
            id,
            ChangeKind::Updated,
            actor.subject.clone(),
        ))
        .await;

        Ok(updated)
    }

    /// Delete a tag; posts simply lose it
    pub async fn delete_tag(&self, id: Uuid, actor: &AuthContext) -> Result<(), BlogError> {
        self.get_tag(id).await?;
        self.repos.tags.delete(id).await.map_err(internal)?;

        self.publish(ContentEvent::taxonomy(
            TaxonomyKind::Tag,
            id,
            ChangeKind::Deleted,
            actor.subject.clone(),
        ))
        .await;

        Ok(())
    }

    async fn ensure_tag_name_free(
        &self,
        name: &str,
        exclude: Option<Uuid>,
    ) -> Result<(), BlogError> {
        let existing = self.repos.tags.find_by_name(name).await.map_err(internal)?;
        match existing {
            Some(other) if Some(other.id) != exclude => Err(BlogError::conflict(format!(
                "tag '{}' already exists",
                other.name
            ))),
            _ => Ok(()),
        }
    }
}
