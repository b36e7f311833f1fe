//! Common test utilities: in-memory repositories and service builders

#![allow(dead_code)]

use async_trait::async_trait;
use blog_service::config::Config;
use blog_service::contract::*;
use blog_service::domain::repository::{
    CategoryRepository, PostRepository, SubcategoryRepository, TagRepository, UniqueViolation,
};
use blog_service::domain::{ContentEvent, EventPublisher, Repositories, Service};
use parking_lot::RwLock;
use serde_json::{json, Value};
use std::sync::Arc;
use uuid::Uuid;

// ===== In-memory store =====

#[derive(Default)]
struct State {
    categories: Vec<Category>,
    subcategories: Vec<Subcategory>,
    tags: Vec<Tag>,
    /// Insertion order; newest last
    posts: Vec<Post>,
    /// Name lookups miss, as when another writer inserts right after the check
    stale_name_lookups: bool,
}

/// One shared store implementing every repository trait, so cross-table
/// operations (category delete, tag delete) behave like the database.
#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<RwLock<State>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn repositories(&self) -> Repositories {
        Repositories {
            categories: Arc::new(self.clone()),
            subcategories: Arc::new(self.clone()),
            tags: Arc::new(self.clone()),
            posts: Arc::new(self.clone()),
        }
    }

    pub fn post(&self, id: Uuid) -> Option<Post> {
        self.state.read().posts.iter().find(|p| p.id == id).cloned()
    }

    pub fn category_count(&self) -> usize {
        self.state.read().categories.len()
    }

    pub fn default_categories(&self) -> Vec<Category> {
        self.state
            .read()
            .categories
            .iter()
            .filter(|c| c.is_default)
            .cloned()
            .collect()
    }

    pub fn subcategory_exists(&self, id: Uuid) -> bool {
        self.state.read().subcategories.iter().any(|s| s.id == id)
    }

    /// Make `find_by_name` miss so only the store's unique check remains
    pub fn stale_name_lookups(&self) {
        self.state.write().stale_name_lookups = true;
    }
}

fn same_name(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

fn taken(what: &str) -> anyhow::Error {
    UniqueViolation {
        what: what.to_string(),
    }
    .into()
}

fn paginate<T: Clone>(items: Vec<T>, page: PageRequest) -> Page<T> {
    let total = items.len() as u64;
    let items = items
        .into_iter()
        .skip(page.offset() as usize)
        .take(page.per_page as usize)
        .collect();
    Page::new(items, total, page)
}

fn matches(haystack: &str, search: &Option<String>) -> bool {
    match search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        Some(needle) => haystack.to_lowercase().contains(&needle.to_lowercase()),
        None => true,
    }
}

fn sorted_categories(state: &State) -> Vec<Category> {
    let mut all = state.categories.clone();
    all.sort_by(|a, b| b.is_default.cmp(&a.is_default).then(a.name.cmp(&b.name)));
    all
}

#[async_trait]
impl CategoryRepository for MemoryStore {
    async fn create(&self, category: &Category) -> anyhow::Result<Category> {
        let mut state = self.state.write();
        if state
            .categories
            .iter()
            .any(|c| same_name(&c.name, &category.name))
        {
            return Err(taken("category name"));
        }
        if category.is_default {
            for other in state.categories.iter_mut() {
                other.is_default = false;
            }
        }
        state.categories.push(category.clone());
        Ok(category.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Category>> {
        Ok(self.state.read().categories.iter().find(|c| c.id == id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> anyhow::Result<Option<Category>> {
        let state = self.state.read();
        if state.stale_name_lookups {
            return Ok(None);
        }
        Ok(state
            .categories
            .iter()
            .find(|c| same_name(&c.name, name))
            .cloned())
    }

    async fn find_default(&self) -> anyhow::Result<Option<Category>> {
        Ok(self.state.read().categories.iter().find(|c| c.is_default).cloned())
    }

    async fn list(
        &self,
        query: &CategoryQuery,
        page: PageRequest,
    ) -> anyhow::Result<Page<Category>> {
        let state = self.state.read();
        let items = sorted_categories(&state)
            .into_iter()
            .filter(|c| matches(&c.name, &query.search))
            .collect();
        Ok(paginate(items, page))
    }

    async fn list_all(&self) -> anyhow::Result<Vec<Category>> {
        Ok(sorted_categories(&self.state.read()))
    }

    async fn update(&self, category: &Category) -> anyhow::Result<Category> {
        let mut state = self.state.write();
        if state
            .categories
            .iter()
            .any(|c| c.id != category.id && same_name(&c.name, &category.name))
        {
            return Err(taken("category name"));
        }
        if !state.categories.iter().any(|c| c.id == category.id) {
            anyhow::bail!("category vanished");
        }
        for stored in state.categories.iter_mut() {
            if stored.id == category.id {
                stored.name = category.name.clone();
                stored.is_default |= category.is_default;
                stored.audit.updated_at = category.audit.updated_at;
                stored.audit.updated_by = category.audit.updated_by.clone();
            } else if category.is_default {
                stored.is_default = false;
            }
        }
        let stored = state
            .categories
            .iter()
            .find(|c| c.id == category.id)
            .ok_or_else(|| anyhow::anyhow!("category vanished"))?;
        Ok(stored.clone())
    }

    async fn set_default(&self, id: Uuid) -> anyhow::Result<()> {
        let mut state = self.state.write();
        for category in state.categories.iter_mut() {
            category.is_default = category.id == id;
        }
        Ok(())
    }

    async fn delete_reassigning(&self, id: Uuid, default_id: Uuid) -> anyhow::Result<u64> {
        let mut state = self.state.write();
        let mut moved = 0;
        for post in state.posts.iter_mut() {
            if post.category_id == Some(id) {
                post.category_id = Some(default_id);
                post.subcategory_id = None;
                moved += 1;
            }
        }
        state.subcategories.retain(|s| s.category_id != id);
        state.categories.retain(|c| c.id != id);
        Ok(moved)
    }
}

#[async_trait]
impl SubcategoryRepository for MemoryStore {
    async fn create(&self, subcategory: &Subcategory) -> anyhow::Result<Subcategory> {
        self.state.write().subcategories.push(subcategory.clone());
        Ok(subcategory.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Subcategory>> {
        Ok(self
            .state
            .read()
            .subcategories
            .iter()
            .find(|s| s.id == id)
            .cloned())
    }

    async fn find_by_name(
        &self,
        category_id: Uuid,
        name: &str,
    ) -> anyhow::Result<Option<Subcategory>> {
        Ok(self
            .state
            .read()
            .subcategories
            .iter()
            .find(|s| s.category_id == category_id && same_name(&s.name, name))
            .cloned())
    }

    async fn list(
        &self,
        query: &SubcategoryQuery,
        page: PageRequest,
    ) -> anyhow::Result<Page<Subcategory>> {
        let mut items: Vec<Subcategory> = self
            .state
            .read()
            .subcategories
            .iter()
            .filter(|s| query.category_id.is_none_or(|id| s.category_id == id))
            .filter(|s| matches(&s.name, &query.search))
            .cloned()
            .collect();
        items.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(paginate(items, page))
    }

    async fn update(&self, subcategory: &Subcategory) -> anyhow::Result<Subcategory> {
        let mut state = self.state.write();
        let stored = state
            .subcategories
            .iter_mut()
            .find(|s| s.id == subcategory.id)
            .ok_or_else(|| anyhow::anyhow!("subcategory vanished"))?;
        *stored = subcategory.clone();
        Ok(stored.clone())
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<()> {
        self.state.write().subcategories.retain(|s| s.id != id);
        Ok(())
    }

    async fn count_posts(&self, id: Uuid) -> anyhow::Result<u64> {
        Ok(self
            .state
            .read()
            .posts
            .iter()
            .filter(|p| p.subcategory_id == Some(id))
            .count() as u64)
    }
}

#[async_trait]
impl TagRepository for MemoryStore {
    async fn create(&self, tag: &Tag) -> anyhow::Result<Tag> {
        let mut state = self.state.write();
        if state.tags.iter().any(|t| same_name(&t.name, &tag.name)) {
            return Err(taken("tag name"));
        }
        state.tags.push(tag.clone());
        Ok(tag.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Tag>> {
        Ok(self.state.read().tags.iter().find(|t| t.id == id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> anyhow::Result<Option<Tag>> {
        let state = self.state.read();
        if state.stale_name_lookups {
            return Ok(None);
        }
        Ok(state.tags.iter().find(|t| same_name(&t.name, name)).cloned())
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> anyhow::Result<Vec<Tag>> {
        let mut found: Vec<Tag> = self
            .state
            .read()
            .tags
            .iter()
            .filter(|t| ids.contains(&t.id))
            .cloned()
            .collect();
        found.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(found)
    }

    async fn list(&self, query: &TagQuery, page: PageRequest) -> anyhow::Result<Page<Tag>> {
        let mut items: Vec<Tag> = self
            .state
            .read()
            .tags
            .iter()
            .filter(|t| matches(&t.name, &query.search))
            .cloned()
            .collect();
        items.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(paginate(items, page))
    }

    async fn list_all(&self) -> anyhow::Result<Vec<Tag>> {
        let mut items = self.state.read().tags.clone();
        items.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(items)
    }

    async fn update(&self, tag: &Tag) -> anyhow::Result<Tag> {
        let mut state = self.state.write();
        let stored = state
            .tags
            .iter_mut()
            .find(|t| t.id == tag.id)
            .ok_or_else(|| anyhow::anyhow!("tag vanished"))?;
        *stored = tag.clone();
        Ok(stored.clone())
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<()> {
        let mut state = self.state.write();
        state.tags.retain(|t| t.id != id);
        for post in state.posts.iter_mut() {
            post.tag_ids.retain(|t| *t != id);
        }
        Ok(())
    }
}

#[async_trait]
impl PostRepository for MemoryStore {
    async fn create(&self, post: &Post) -> anyhow::Result<Post> {
        self.state.write().posts.push(post.clone());
        Ok(post.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Post>> {
        Ok(self.post(id))
    }

    async fn find_by_slug(&self, slug: &str) -> anyhow::Result<Option<Post>> {
        Ok(self
            .state
            .read()
            .posts
            .iter()
            .find(|p| p.slug.as_deref() == Some(slug))
            .cloned())
    }

    async fn slug_exists(&self, slug: &str, exclude: Option<Uuid>) -> anyhow::Result<bool> {
        Ok(self
            .state
            .read()
            .posts
            .iter()
            .any(|p| p.slug.as_deref() == Some(slug) && Some(p.id) != exclude))
    }

    async fn list(&self, query: &PostQuery, page: PageRequest) -> anyhow::Result<Page<Post>> {
        let items: Vec<Post> = self
            .state
            .read()
            .posts
            .iter()
            .rev()
            .filter(|p| query.published.is_none_or(|v| p.published == v))
            .filter(|p| query.category_id.is_none_or(|id| p.category_id == Some(id)))
            .filter(|p| {
                query
                    .subcategory_id
                    .is_none_or(|id| p.subcategory_id == Some(id))
            })
            .filter(|p| query.tag_id.is_none_or(|id| p.tag_ids.contains(&id)))
            .filter(|p| {
                matches(&p.title, &query.search) || matches(&p.content_text, &query.search)
            })
            .cloned()
            .collect();
        Ok(paginate(items, page))
    }

    async fn update(&self, post: &Post) -> anyhow::Result<Post> {
        let mut state = self.state.write();
        let stored = state
            .posts
            .iter_mut()
            .find(|p| p.id == post.id)
            .ok_or_else(|| anyhow::anyhow!("post vanished"))?;
        *stored = post.clone();
        Ok(stored.clone())
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<()> {
        self.state.write().posts.retain(|p| p.id != id);
        Ok(())
    }
}

// ===== Event capture =====

/// Publisher that keeps every event for assertions
#[derive(Default)]
pub struct RecordingPublisher {
    events: RwLock<Vec<ContentEvent>>,
}

impl RecordingPublisher {
    pub fn events(&self) -> Vec<ContentEvent> {
        self.events.read().clone()
    }
}

#[async_trait]
impl EventPublisher for RecordingPublisher {
    async fn publish(&self, event: ContentEvent) -> anyhow::Result<()> {
        self.events.write().push(event);
        Ok(())
    }
}

/// Publisher that always fails
pub struct FailingPublisher;

#[async_trait]
impl EventPublisher for FailingPublisher {
    async fn publish(&self, _event: ContentEvent) -> anyhow::Result<()> {
        anyhow::bail!("broker unavailable")
    }
}

// ===== Harness =====

pub struct TestContext {
    pub service: Arc<Service>,
    pub store: MemoryStore,
    pub events: Arc<RecordingPublisher>,
    pub default_category: Category,
    pub actor: AuthContext,
}

impl TestContext {
    pub async fn new() -> Self {
        Self::with_config(Config::default()).await
    }

    pub async fn with_config(config: Config) -> Self {
        let store = MemoryStore::new();
        let events = Arc::new(RecordingPublisher::default());
        let service = Arc::new(Service::new(
            store.repositories(),
            events.clone(),
            config,
        ));
        let default_category = service
            .ensure_default_category()
            .await
            .expect("default category");

        Self {
            service,
            store,
            events,
            default_category,
            actor: AuthContext::user("editor-1", vec!["editor".to_string()]),
        }
    }

    pub async fn category(&self, name: &str) -> Category {
        self.service
            .create_category(
                NewCategory {
                    name: name.to_string(),
                    is_default: false,
                },
                &self.actor,
            )
            .await
            .expect("create category")
    }

    pub async fn subcategory(&self, category_id: Uuid, name: &str) -> Subcategory {
        self.service
            .create_subcategory(
                NewSubcategory {
                    name: name.to_string(),
                    category_id,
                },
                &self.actor,
            )
            .await
            .expect("create subcategory")
    }

    pub async fn tag(&self, name: &str) -> Tag {
        self.service
            .create_tag(
                NewTag {
                    name: name.to_string(),
                },
                &self.actor,
            )
            .await
            .expect("create tag")
    }

    pub async fn draft(&self, title: &str) -> Post {
        self.service
            .create_post(
                NewPost {
                    title: title.to_string(),
                    ..Default::default()
                },
                &self.actor,
            )
            .await
            .expect("create draft")
    }

    /// Post that satisfies every publishing requirement
    pub async fn published(&self, title: &str, category_id: Uuid) -> Post {
        self.service
            .create_post(publishable(title, category_id), &self.actor)
            .await
            .expect("create published post")
    }
}

/// Editor document with one heading and one paragraph
pub fn doc(heading: &str, body: &str) -> Value {
    json!({
        "type": "doc",
        "content": [
            {
                "type": "heading",
                "attrs": { "level": 2 },
                "content": [{ "type": "text", "text": heading }]
            },
            {
                "type": "paragraph",
                "content": [{ "type": "text", "text": body }]
            }
        ]
    })
}

pub fn publishable(title: &str, category_id: Uuid) -> NewPost {
    NewPost {
        title: title.to_string(),
        content: Some(doc("Intro", &format!("{} body text", title))),
        cover_image_url: Some("https://cdn.example.com/cover.png".to_string()),
        published: true,
        category_id: Some(category_id),
        ..Default::default()
    }
}
