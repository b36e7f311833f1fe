//! Category service tests

mod common;

use blog_service::config::Config;
use blog_service::contract::*;
use blog_service::domain::events::ContentEvent;
use blog_service::domain::Service;
use common::{FailingPublisher, MemoryStore, TestContext};
use std::sync::Arc;

#[tokio::test]
async fn test_default_category_created_once() {
    let ctx = TestContext::new().await;
    assert_eq!(ctx.default_category.name, "Uncategorized");
    assert!(ctx.default_category.is_default);

    // A second start-up finds the existing default
    let again = ctx.service.ensure_default_category().await.unwrap();
    assert_eq!(again.id, ctx.default_category.id);
    assert_eq!(ctx.store.category_count(), 1);
}

#[tokio::test]
async fn test_default_category_promotes_same_named_category() {
    let store = MemoryStore::new();
    let service = Service::new(
        store.repositories(),
        Arc::new(blog_service::domain::NoOpEventPublisher),
        Config::default(),
    );
    let existing = service
        .create_category(
            NewCategory {
                name: "uncategorized".to_string(),
                is_default: false,
            },
            &AuthContext::system(),
        )
        .await
        .unwrap();

    let default = service.ensure_default_category().await.unwrap();
    assert_eq!(default.id, existing.id);
    assert_eq!(store.category_count(), 1);
    assert_eq!(store.default_categories().len(), 1);
}

#[tokio::test]
async fn test_create_category_trims_and_stamps_audit() {
    let ctx = TestContext::new().await;
    let category = ctx.category("  Engineering  ").await;

    assert_eq!(category.name, "Engineering");
    assert!(!category.is_default);
    assert_eq!(category.audit.created_by.as_deref(), Some("editor-1"));
    assert_eq!(category.audit.updated_by.as_deref(), Some("editor-1"));
}

#[tokio::test]
async fn test_duplicate_category_name_is_case_insensitive() {
    let ctx = TestContext::new().await;
    ctx.category("Engineering").await;

    let err = ctx
        .service
        .create_category(
            NewCategory {
                name: "ENGINEERING".to_string(),
                is_default: false,
            },
            &ctx.actor,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, BlogError::Conflict { .. }), "got {:?}", err);
}

#[tokio::test]
async fn test_category_name_limits() {
    let ctx = TestContext::new().await;

    let blank = ctx
        .service
        .create_category(NewCategory::default(), &ctx.actor)
        .await
        .unwrap_err();
    assert!(matches!(blank, BlogError::Validation { .. }));

    let too_long = ctx
        .service
        .create_category(
            NewCategory {
                name: "x".repeat(51),
                is_default: false,
            },
            &ctx.actor,
        )
        .await
        .unwrap_err();
    assert!(matches!(too_long, BlogError::Validation { .. }));

    let exact = ctx
        .service
        .create_category(
            NewCategory {
                name: "x".repeat(50),
                is_default: false,
            },
            &ctx.actor,
        )
        .await;
    assert!(exact.is_ok());
}

#[tokio::test]
async fn test_rename_keeps_own_name_free() {
    let ctx = TestContext::new().await;
    let category = ctx.category("Design").await;

    // Changing only the case of its own name is not a conflict
    let renamed = ctx
        .service
        .update_category(
            category.id,
            CategoryPatch {
                name: Some("DESIGN".to_string()),
                is_default: None,
            },
            &ctx.actor,
        )
        .await
        .unwrap();
    assert_eq!(renamed.name, "DESIGN");

    ctx.category("Product").await;
    let err = ctx
        .service
        .update_category(
            category.id,
            CategoryPatch {
                name: Some("product".to_string()),
                is_default: None,
            },
            &ctx.actor,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, BlogError::Conflict { .. }));
}

#[tokio::test]
async fn test_switch_default_category() {
    let ctx = TestContext::new().await;
    let news = ctx.category("News").await;

    let updated = ctx
        .service
        .update_category(
            news.id,
            CategoryPatch {
                name: None,
                is_default: Some(true),
            },
            &ctx.actor,
        )
        .await
        .unwrap();
    assert!(updated.is_default);

    let defaults = ctx.store.default_categories();
    assert_eq!(defaults.len(), 1);
    assert_eq!(defaults[0].id, news.id);
}

#[tokio::test]
async fn test_create_as_default_moves_flag() {
    let ctx = TestContext::new().await;
    let created = ctx
        .service
        .create_category(
            NewCategory {
                name: "General".to_string(),
                is_default: true,
            },
            &ctx.actor,
        )
        .await
        .unwrap();

    assert!(created.is_default);
    let defaults = ctx.store.default_categories();
    assert_eq!(defaults.len(), 1);
    assert_eq!(defaults[0].id, created.id);
}

#[tokio::test]
async fn test_rename_and_make_default_together() {
    let ctx = TestContext::new().await;
    let news = ctx.category("News").await;

    let updated = ctx
        .service
        .update_category(
            news.id,
            CategoryPatch {
                name: Some("Headlines".to_string()),
                is_default: Some(true),
            },
            &ctx.actor,
        )
        .await
        .unwrap();
    assert_eq!(updated.name, "Headlines");
    assert!(updated.is_default);

    let defaults = ctx.store.default_categories();
    assert_eq!(defaults.len(), 1);
    assert_eq!(defaults[0].name, "Headlines");
}

#[tokio::test]
async fn test_name_taken_between_check_and_insert_is_a_conflict() {
    let ctx = TestContext::new().await;
    ctx.category("Engineering").await;
    ctx.store.stale_name_lookups();

    let err = ctx
        .service
        .create_category(
            NewCategory {
                name: "engineering".to_string(),
                is_default: true,
            },
            &ctx.actor,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, BlogError::Conflict { .. }), "got {:?}", err);

    // The failed insert did not take the default flag
    let defaults = ctx.store.default_categories();
    assert_eq!(defaults.len(), 1);
    assert_eq!(defaults[0].id, ctx.default_category.id);
}

#[tokio::test]
async fn test_unsetting_default_is_rejected() {
    let ctx = TestContext::new().await;
    let err = ctx
        .service
        .update_category(
            ctx.default_category.id,
            CategoryPatch {
                name: None,
                is_default: Some(false),
            },
            &ctx.actor,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, BlogError::Validation { .. }));
}

#[tokio::test]
async fn test_delete_default_category_is_rejected() {
    let ctx = TestContext::new().await;
    let err = ctx
        .service
        .delete_category(ctx.default_category.id, &ctx.actor)
        .await
        .unwrap_err();
    assert!(matches!(err, BlogError::Conflict { .. }));
    assert_eq!(ctx.store.category_count(), 1);
}

#[tokio::test]
async fn test_delete_category_reassigns_posts_to_default() {
    let ctx = TestContext::new().await;
    let rust = ctx.category("Rust").await;
    let async_sub = ctx.subcategory(rust.id, "Async").await;

    let mut new = common::publishable("Tokio tips", rust.id);
    new.subcategory_id = Some(async_sub.id);
    let first = ctx.service.create_post(new, &ctx.actor).await.unwrap();
    let second = ctx.published("Borrowck", rust.id).await;
    let elsewhere = ctx.published("Unrelated", ctx.default_category.id).await;

    let moved = ctx.service.delete_category(rust.id, &ctx.actor).await.unwrap();
    assert_eq!(moved, 2);

    for id in [first.id, second.id] {
        let post = ctx.store.post(id).unwrap();
        assert_eq!(post.category_id, Some(ctx.default_category.id));
        assert_eq!(post.subcategory_id, None);
    }
    assert_eq!(
        ctx.store.post(elsewhere.id).unwrap().category_id,
        Some(ctx.default_category.id)
    );
    assert!(!ctx.store.subcategory_exists(async_sub.id));

    let err = ctx.service.get_category(rust.id).await.unwrap_err();
    assert!(matches!(err, BlogError::NotFound { .. }));

    let deleted = ctx
        .events
        .events()
        .into_iter()
        .find_map(|e| match e {
            ContentEvent::CategoryDeleted(event) => Some(event),
            _ => None,
        })
        .expect("category deleted event");
    assert_eq!(deleted.category_id, rust.id);
    assert_eq!(deleted.reassigned_to, ctx.default_category.id);
    assert_eq!(deleted.reassigned_posts, 2);
}

#[tokio::test]
async fn test_list_categories_default_first_with_search() {
    let ctx = TestContext::new().await;
    ctx.category("Zebra").await;
    ctx.category("Alpha").await;
    ctx.category("Alphabet soup").await;

    let all = ctx
        .service
        .list_categories(CategoryQuery::default(), PageRequest::new(1, 10))
        .await
        .unwrap();
    let names: Vec<&str> = all.items.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["Uncategorized", "Alpha", "Alphabet soup", "Zebra"]);

    let found = ctx
        .service
        .list_categories(
            CategoryQuery {
                search: Some("ALPHA".to_string()),
            },
            PageRequest::new(1, 1),
        )
        .await
        .unwrap();
    assert_eq!(found.total, 2);
    assert_eq!(found.items.len(), 1);
    assert_eq!(found.total_pages(), 2);
}

#[tokio::test]
async fn test_publish_failure_does_not_fail_mutation() {
    let store = MemoryStore::new();
    let service = Service::new(
        store.repositories(),
        Arc::new(FailingPublisher),
        Config::default(),
    );
    service.ensure_default_category().await.unwrap();

    let created = service
        .create_category(
            NewCategory {
                name: "Still works".to_string(),
                is_default: false,
            },
            &AuthContext::system(),
        )
        .await;
    assert!(created.is_ok());
}

#[tokio::test]
async fn test_page_request_is_clamped() {
    let ctx = TestContext::new().await;
    let page = ctx.service.page_request(Some(0), Some(10_000));
    assert_eq!(page, PageRequest::new(1, 100));

    let page = ctx.service.page_request(None, None);
    assert_eq!(page, PageRequest::new(1, 10));
}
