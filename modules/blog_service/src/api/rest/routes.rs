//! Route registration

use super::{auth, handlers, openapi::ApiDoc};
use crate::domain::Service;
use axum::{middleware, routing::get, Extension, Json, Router};
use std::sync::Arc;
use utoipa::OpenApi;

/// Full HTTP surface: health, OpenAPI document, admin and public routes
pub fn router(service: Arc<Service>, verifier: Arc<auth::TokenVerifier>) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/openapi.json", get(openapi_json))
        .merge(admin_routes(verifier))
        .merge(public_routes())
        // Add service as extension for handlers
        .layer(Extension(service))
}

/// `/api/admin` routes, all behind bearer token verification
fn admin_routes(verifier: Arc<auth::TokenVerifier>) -> Router {
    Router::new()
        // Categories
        .route(
            "/api/admin/categories",
            get(handlers::list_categories).post(handlers::create_category),
        )
        .route(
            "/api/admin/categories/{id}",
            get(handlers::get_category)
                .patch(handlers::update_category)
                .delete(handlers::delete_category),
        )
        // Subcategories
        .route(
            "/api/admin/subcategories",
            get(handlers::list_subcategories).post(handlers::create_subcategory),
        )
        .route(
            "/api/admin/subcategories/{id}",
            get(handlers::get_subcategory)
                .patch(handlers::update_subcategory)
                .delete(handlers::delete_subcategory),
        )
        // Tags
        .route(
            "/api/admin/tags",
            get(handlers::list_tags).post(handlers::create_tag),
        )
        .route(
            "/api/admin/tags/{id}",
            get(handlers::get_tag)
                .patch(handlers::update_tag)
                .delete(handlers::delete_tag),
        )
        // Posts
        .route(
            "/api/admin/posts",
            get(handlers::list_posts).post(handlers::create_post),
        )
        .route(
            "/api/admin/posts/slug-suggestion",
            get(handlers::suggest_slug),
        )
        .route("/api/admin/posts/slug-check", get(handlers::check_slug))
        .route(
            "/api/admin/posts/{id}",
            get(handlers::get_post)
                .patch(handlers::update_post)
                .delete(handlers::delete_post),
        )
        .route_layer(middleware::from_fn_with_state(
            verifier,
            auth::require_auth,
        ))
}

/// Read-only `/api/blog` routes for the public site
fn public_routes() -> Router {
    Router::new()
        .route("/api/blog/posts", get(handlers::list_published_posts))
        .route("/api/blog/posts/{slug}", get(handlers::get_published_post))
        .route("/api/blog/categories", get(handlers::public_categories))
        .route("/api/blog/tags", get(handlers::public_tags))
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
