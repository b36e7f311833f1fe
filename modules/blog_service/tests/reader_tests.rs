//! Public reader tests, through the service and the native client

mod common;

use blog_service::config::Config;
use blog_service::contract::*;
use blog_service::BlogServiceModule;
use common::{MemoryStore, RecordingPublisher, TestContext};
use serde_json::json;
use std::sync::Arc;

#[tokio::test]
async fn test_drafts_are_invisible() {
    let ctx = TestContext::new().await;
    let draft = ctx.draft("Secret plans").await;
    let live = ctx.published("Launch", ctx.default_category.id).await;

    let page = ctx
        .service
        .list_published_posts(
            PostQuery {
                published: Some(false),
                ..Default::default()
            },
            PageRequest::default(),
        )
        .await
        .unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].id, live.id);

    let slug = draft.slug.unwrap();
    let err = ctx.service.get_published_post(&slug).await.unwrap_err();
    assert!(matches!(err, BlogError::NotFound { .. }));
}

#[tokio::test]
async fn test_unpublished_post_disappears() {
    let ctx = TestContext::new().await;
    let post = ctx.published("Brief", ctx.default_category.id).await;
    let slug = post.slug.clone().unwrap();
    assert!(ctx.service.get_published_post(&slug).await.is_ok());

    ctx.service
        .update_post(
            post.id,
            PostPatch {
                published: Some(false),
                ..Default::default()
            },
            &ctx.actor,
        )
        .await
        .unwrap();
    assert!(matches!(
        ctx.service.get_published_post(&slug).await,
        Err(BlogError::NotFound { .. })
    ));
}

#[tokio::test]
async fn test_published_post_has_details_and_toc() {
    let ctx = TestContext::new().await;
    let rust = ctx.category("Rust").await;
    let sub = ctx.subcategory(rust.id, "Async").await;
    let tag = ctx.tag("tokio").await;

    let mut new = common::publishable("Deep dive", rust.id);
    new.subcategory_id = Some(sub.id);
    new.tag_ids = vec![tag.id];
    new.content = Some(json!({
        "type": "doc",
        "content": [
            { "type": "heading", "attrs": { "level": 2 },
              "content": [{ "type": "text", "text": "Setup" }] },
            { "type": "paragraph", "content": [{ "type": "text", "text": "Install it." }] },
            { "type": "heading", "attrs": { "level": 3 },
              "content": [{ "type": "text", "text": "Setup" }] }
        ]
    }));
    ctx.service.create_post(new, &ctx.actor).await.unwrap();

    let published = ctx.service.get_published_post("deep-dive").await.unwrap();
    assert_eq!(published.details.post.title, "Deep dive");
    assert_eq!(published.details.category.map(|c| c.name).as_deref(), Some("Rust"));
    assert_eq!(
        published.details.subcategory.map(|s| s.name).as_deref(),
        Some("Async")
    );
    assert_eq!(published.details.tags.len(), 1);

    let anchors: Vec<(u8, &str)> = published
        .toc
        .iter()
        .map(|e| (e.level, e.anchor.as_str()))
        .collect();
    assert_eq!(anchors, [(2, "setup"), (3, "setup-1")]);
}

#[tokio::test]
async fn test_published_list_filters_by_category() {
    let ctx = TestContext::new().await;
    let rust = ctx.category("Rust").await;
    ctx.published("One", rust.id).await;
    ctx.published("Two", rust.id).await;
    ctx.published("Three", ctx.default_category.id).await;

    let page = ctx
        .service
        .list_published_posts(
            PostQuery {
                category_id: Some(rust.id),
                ..Default::default()
            },
            PageRequest::new(1, 1),
        )
        .await
        .unwrap();
    assert_eq!(page.total, 2);
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].title, "Two");
}

#[tokio::test]
async fn test_native_client_through_module() {
    let store = MemoryStore::new();
    let mut config = Config::default();
    config.auth.enabled = false;

    let module = BlogServiceModule::with_repositories(
        config,
        store.repositories(),
        Arc::new(RecordingPublisher::default()),
    )
    .await
    .unwrap();

    let service = module.service();
    let actor = AuthContext::system();
    let default = service.ensure_default_category().await.unwrap();
    service
        .create_tag(
            NewTag {
                name: "news".to_string(),
            },
            &actor,
        )
        .await
        .unwrap();
    service
        .create_post(common::publishable("Hello readers", default.id), &actor)
        .await
        .unwrap();
    service
        .create_post(
            NewPost {
                title: "Not yet".to_string(),
                ..Default::default()
            },
            &actor,
        )
        .await
        .unwrap();

    let client = module.client();
    let page = client
        .list_published_posts(PostQuery::default(), PageRequest::default())
        .await
        .unwrap();
    assert_eq!(page.total, 1);

    let post = client.get_published_post("hello-readers").await.unwrap();
    assert_eq!(post.details.post.title, "Hello readers");
    assert!(matches!(
        client.get_published_post("not-yet").await,
        Err(BlogError::NotFound { .. })
    ));

    let categories = client.list_categories().await.unwrap();
    assert_eq!(categories.len(), 1);
    assert!(categories[0].is_default);
    assert_eq!(client.list_tags().await.unwrap().len(), 1);
}
