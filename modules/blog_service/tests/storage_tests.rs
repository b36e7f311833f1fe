//! SeaORM repositories against an in-memory SQLite database

mod common;

use blog_service::config::Config;
use blog_service::contract::*;
use blog_service::domain::repository::{TagRepository, UniqueViolation};
use blog_service::domain::Service;
use blog_service::infra::storage::migrations::Migrator;
use blog_service::infra::storage::SeaOrmTagRepository;
use blog_service::BlogServiceModule;
use common::publishable;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::{MigrationName, MigratorTrait};
use std::collections::HashSet;
use std::sync::Arc;
use uuid::Uuid;

async fn connect() -> Arc<DatabaseConnection> {
    // One connection, or every pooled connection gets its own empty database
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);
    let db = Database::connect(options).await.unwrap();
    BlogServiceModule::migrate(&db).await.unwrap();
    Arc::new(db)
}

async fn service() -> (Arc<Service>, AuthContext) {
    let mut config = Config::default();
    config.auth.enabled = false;
    let module = BlogServiceModule::init(config, connect().await)
        .await
        .unwrap();
    (module.service(), AuthContext::user("editor-1", vec![]))
}

#[tokio::test]
async fn test_migrations_are_idempotent() {
    let db = connect().await;
    BlogServiceModule::migrate(&db).await.unwrap();
}

#[test]
fn test_migration_names_are_distinct() {
    let names: HashSet<String> = Migrator::migrations()
        .iter()
        .map(|m| m.name().to_string())
        .collect();
    assert_eq!(names.len(), Migrator::migrations().len());
    assert!(names.contains("m20250301_000001_create_categories"));
    assert!(names.contains("m20250301_000005_create_post_tags"));
}

#[tokio::test]
async fn test_default_category_persists() {
    let db = connect().await;
    let mut config = Config::default();
    config.auth.enabled = false;

    let first = BlogServiceModule::init(config.clone(), db.clone())
        .await
        .unwrap();
    let default = first.service().ensure_default_category().await.unwrap();

    // A restart against the same database reuses the row
    let second = BlogServiceModule::init(config, db).await.unwrap();
    let categories = second.service().all_categories().await.unwrap();
    assert_eq!(categories.len(), 1);
    assert_eq!(categories[0].id, default.id);
    assert!(categories[0].is_default);
}

#[tokio::test]
async fn test_case_insensitive_names_and_search() {
    let (service, actor) = service().await;
    service
        .create_category(
            NewCategory {
                name: "Engineering".to_string(),
                is_default: false,
            },
            &actor,
        )
        .await
        .unwrap();

    let dup = service
        .create_category(
            NewCategory {
                name: "engineering".to_string(),
                is_default: false,
            },
            &actor,
        )
        .await
        .unwrap_err();
    assert!(matches!(dup, BlogError::Conflict { .. }));

    let found = service
        .list_categories(
            CategoryQuery {
                search: Some("NEER".to_string()),
            },
            PageRequest::default(),
        )
        .await
        .unwrap();
    assert_eq!(found.total, 1);

    // LIKE wildcards are matched literally
    let none = service
        .list_categories(
            CategoryQuery {
                search: Some("%".to_string()),
            },
            PageRequest::default(),
        )
        .await
        .unwrap();
    assert_eq!(none.total, 0);

    let all = service
        .list_categories(CategoryQuery::default(), PageRequest::default())
        .await
        .unwrap();
    assert!(all.items[0].is_default);
}

#[tokio::test]
async fn test_non_ascii_names_collide_ignoring_case() {
    let (service, actor) = service().await;
    service
        .create_tag(
            NewTag {
                name: "Жизнь".to_string(),
            },
            &actor,
        )
        .await
        .unwrap();
    let dup_tag = service
        .create_tag(
            NewTag {
                name: "жизнь".to_string(),
            },
            &actor,
        )
        .await
        .unwrap_err();
    assert!(matches!(dup_tag, BlogError::Conflict { .. }), "got {:?}", dup_tag);

    service
        .create_category(
            NewCategory {
                name: "Éte".to_string(),
                is_default: false,
            },
            &actor,
        )
        .await
        .unwrap();
    let dup_category = service
        .create_category(
            NewCategory {
                name: "éte".to_string(),
                is_default: false,
            },
            &actor,
        )
        .await
        .unwrap_err();
    assert!(matches!(dup_category, BlogError::Conflict { .. }));

    let found = service
        .list_tags(
            TagQuery {
                search: Some("ЖИЗ".to_string()),
            },
            PageRequest::default(),
        )
        .await
        .unwrap();
    assert_eq!(found.total, 1);
    assert_eq!(found.items[0].name, "Жизнь");
}

#[tokio::test]
async fn test_unique_index_rejects_case_variant_insert() {
    let db = connect().await;
    let repo = SeaOrmTagRepository::new(db);
    let tag = |name: &str| Tag {
        id: Uuid::new_v4(),
        name: name.to_string(),
        audit: Audit::created(&AuthContext::system()),
    };

    repo.create(&tag("Été")).await.unwrap();
    let err = repo.create(&tag("ÉTÉ")).await.unwrap_err();
    assert!(err.downcast_ref::<UniqueViolation>().is_some(), "got {:?}", err);
}

#[tokio::test]
async fn test_rename_and_default_switch_in_one_update() {
    let (service, actor) = service().await;
    let old_default = service.ensure_default_category().await.unwrap();
    let news = service
        .create_category(
            NewCategory {
                name: "News".to_string(),
                is_default: false,
            },
            &actor,
        )
        .await
        .unwrap();

    let updated = service
        .update_category(
            news.id,
            CategoryPatch {
                name: Some("Headlines".to_string()),
                is_default: Some(true),
            },
            &actor,
        )
        .await
        .unwrap();
    assert_eq!(updated.name, "Headlines");
    assert!(updated.is_default);

    let categories = service.all_categories().await.unwrap();
    let defaults: Vec<_> = categories.iter().filter(|c| c.is_default).collect();
    assert_eq!(defaults.len(), 1);
    assert_eq!(defaults[0].id, news.id);
    assert!(!service.get_category(old_default.id).await.unwrap().is_default);

    // A rename that collides leaves the default where it was
    let err = service
        .update_category(
            old_default.id,
            CategoryPatch {
                name: Some("headlines".to_string()),
                is_default: Some(true),
            },
            &actor,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, BlogError::Conflict { .. }));
    assert!(service.get_category(news.id).await.unwrap().is_default);
}

#[tokio::test]
async fn test_switching_default_keeps_single_flag() {
    let (service, actor) = service().await;
    let news = service
        .create_category(
            NewCategory {
                name: "News".to_string(),
                is_default: true,
            },
            &actor,
        )
        .await
        .unwrap();

    let categories = service.all_categories().await.unwrap();
    let defaults: Vec<_> = categories.iter().filter(|c| c.is_default).collect();
    assert_eq!(defaults.len(), 1);
    assert_eq!(defaults[0].id, news.id);
}

#[tokio::test]
async fn test_post_round_trip_with_tags() {
    let (service, actor) = service().await;
    let default = service.ensure_default_category().await.unwrap();
    let first = service
        .create_tag(NewTag { name: "zeta".to_string() }, &actor)
        .await
        .unwrap();
    let second = service
        .create_tag(NewTag { name: "alpha".to_string() }, &actor)
        .await
        .unwrap();

    let mut new = publishable("Stored post", default.id);
    new.tag_ids = vec![first.id, second.id];
    let created = service.create_post(new, &actor).await.unwrap();

    let loaded = service.get_post(created.id).await.unwrap();
    assert_eq!(loaded.tag_ids, vec![first.id, second.id]);
    assert_eq!(loaded.slug.as_deref(), Some("stored-post"));
    assert_eq!(loaded.content, created.content);
    assert_eq!(loaded.content_text, "Intro\nStored post body text");
    assert!(loaded.published_at.is_some());

    let reordered = service
        .update_post(
            created.id,
            PostPatch {
                tag_ids: Some(vec![second.id]),
                ..Default::default()
            },
            &actor,
        )
        .await
        .unwrap();
    assert_eq!(reordered.tag_ids, vec![second.id]);
    assert_eq!(
        service.get_post(created.id).await.unwrap().audit.created_at,
        created.audit.created_at
    );

    let by_tag = service
        .list_posts(
            PostQuery {
                tag_id: Some(first.id),
                ..Default::default()
            },
            PageRequest::default(),
        )
        .await
        .unwrap();
    assert_eq!(by_tag.total, 0);

    let still_tagged = service
        .list_posts(
            PostQuery {
                tag_id: Some(second.id),
                ..Default::default()
            },
            PageRequest::default(),
        )
        .await
        .unwrap();
    assert_eq!(still_tagged.total, 1);
    assert_eq!(still_tagged.items[0].id, created.id);

    let by_text = service
        .list_published_posts(
            PostQuery {
                search: Some("BODY TEXT".to_string()),
                ..Default::default()
            },
            PageRequest::default(),
        )
        .await
        .unwrap();
    assert_eq!(by_text.total, 1);

    let public = service.get_published_post("stored-post").await.unwrap();
    assert_eq!(public.details.tags.len(), 1);
    assert_eq!(public.toc.len(), 1);
}

#[tokio::test]
async fn test_slug_uniqueness_in_database() {
    let (service, actor) = service().await;
    let post = service
        .create_post(
            NewPost {
                title: "Unique".to_string(),
                ..Default::default()
            },
            &actor,
        )
        .await
        .unwrap();

    assert_eq!(
        service.check_slug("unique", None).await.unwrap(),
        SlugStatus::Taken
    );
    assert_eq!(
        service.check_slug("unique", Some(post.id)).await.unwrap(),
        SlugStatus::Available
    );
    assert_eq!(
        service.suggest_slug("Unique", None).await.unwrap().as_deref(),
        Some("unique-2")
    );
}

#[tokio::test]
async fn test_delete_category_moves_posts_in_one_step() {
    let (service, actor) = service().await;
    let default = service.ensure_default_category().await.unwrap();
    let rust = service
        .create_category(
            NewCategory {
                name: "Rust".to_string(),
                is_default: false,
            },
            &actor,
        )
        .await
        .unwrap();
    let sub = service
        .create_subcategory(
            NewSubcategory {
                name: "Async".to_string(),
                category_id: rust.id,
            },
            &actor,
        )
        .await
        .unwrap();

    let mut new = publishable("Moved", rust.id);
    new.subcategory_id = Some(sub.id);
    let post = service.create_post(new, &actor).await.unwrap();

    let blocked = service.delete_subcategory(sub.id, &actor).await.unwrap_err();
    assert!(matches!(blocked, BlogError::Conflict { .. }));

    let moved = service.delete_category(rust.id, &actor).await.unwrap();
    assert_eq!(moved, 1);

    let reloaded = service.get_post(post.id).await.unwrap();
    assert_eq!(reloaded.category_id, Some(default.id));
    assert_eq!(reloaded.subcategory_id, None);
    assert!(matches!(
        service.get_subcategory(sub.id).await,
        Err(BlogError::NotFound { .. })
    ));
}

#[tokio::test]
async fn test_delete_tag_and_post_clean_up_links() {
    let (service, actor) = service().await;
    let default = service.ensure_default_category().await.unwrap();
    let tag = service
        .create_tag(NewTag { name: "gone".to_string() }, &actor)
        .await
        .unwrap();
    let mut new = publishable("Linked", default.id);
    new.tag_ids = vec![tag.id];
    let post = service.create_post(new, &actor).await.unwrap();

    service.delete_tag(tag.id, &actor).await.unwrap();
    assert!(service.get_post(post.id).await.unwrap().tag_ids.is_empty());

    service.delete_post(post.id, &actor).await.unwrap();
    assert!(matches!(
        service.get_post(post.id).await,
        Err(BlogError::NotFound { .. })
    ));
}
