//! HTTP request handlers - thin layer that delegates to domain service

use super::{
    dto::*,
    error::{map_domain_error, Problem},
};
use crate::contract::{AuthContext, CategoryQuery, SubcategoryQuery, TagQuery};
use crate::domain::Service;
use axum::{
    extract::{Path, Query},
    http::StatusCode,
    Extension, Json,
};
use std::sync::Arc;
use uuid::Uuid;

// ===== Health =====

/// Liveness check
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses((status = 200, description = "Service is up", body = HealthResponse))
)]
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

// ===== Category Handlers =====

/// List categories, default first
#[utoipa::path(
    get,
    path = "/api/admin/categories",
    tag = "categories",
    params(ListQuery),
    responses(
        (status = 200, body = CategoryListResponse),
        (status = 401, body = Problem)
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_categories(
    Extension(service): Extension<Arc<Service>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<CategoryListResponse>, Problem> {
    let page = service.page_request(query.page, query.per_page);
    let categories = service
        .list_categories(CategoryQuery { search: query.search }, page)
        .await
        .map_err(map_domain_error)?;

    Ok(Json(categories.into()))
}

/// Get a category
#[utoipa::path(
    get,
    path = "/api/admin/categories/{id}",
    tag = "categories",
    params(("id" = Uuid, Path, description = "Category id")),
    responses(
        (status = 200, body = CategoryDto),
        (status = 404, body = Problem)
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_category(
    Extension(service): Extension<Arc<Service>>,
    Path(id): Path<Uuid>,
) -> Result<Json<CategoryDto>, Problem> {
    let category = service.get_category(id).await.map_err(map_domain_error)?;
    Ok(Json(category.into()))
}

/// Create a category
#[utoipa::path(
    post,
    path = "/api/admin/categories",
    tag = "categories",
    request_body = CreateCategoryRequest,
    responses(
        (status = 201, body = CategoryDto),
        (status = 400, body = Problem),
        (status = 409, description = "Name already used", body = Problem)
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_category(
    Extension(service): Extension<Arc<Service>>,
    Extension(actor): Extension<AuthContext>,
    Json(req): Json<CreateCategoryRequest>,
) -> Result<(StatusCode, Json<CategoryDto>), Problem> {
    let category = service
        .create_category(req.into(), &actor)
        .await
        .map_err(map_domain_error)?;

    Ok((StatusCode::CREATED, Json(category.into())))
}

/// Rename a category or make it the default
#[utoipa::path(
    patch,
    path = "/api/admin/categories/{id}",
    tag = "categories",
    params(("id" = Uuid, Path, description = "Category id")),
    request_body = UpdateCategoryRequest,
    responses(
        (status = 200, body = CategoryDto),
        (status = 400, body = Problem),
        (status = 404, body = Problem),
        (status = 409, body = Problem)
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_category(
    Extension(service): Extension<Arc<Service>>,
    Extension(actor): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateCategoryRequest>,
) -> Result<Json<CategoryDto>, Problem> {
    let category = service
        .update_category(id, req.into(), &actor)
        .await
        .map_err(map_domain_error)?;

    Ok(Json(category.into()))
}

/// Delete a category, moving its posts to the default category
#[utoipa::path(
    delete,
    path = "/api/admin/categories/{id}",
    tag = "categories",
    params(("id" = Uuid, Path, description = "Category id")),
    responses(
        (status = 200, body = CategoryDeleteResponse),
        (status = 404, body = Problem),
        (status = 409, description = "Default category", body = Problem)
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_category(
    Extension(service): Extension<Arc<Service>>,
    Extension(actor): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> Result<Json<CategoryDeleteResponse>, Problem> {
    let reassigned_posts = service
        .delete_category(id, &actor)
        .await
        .map_err(map_domain_error)?;

    Ok(Json(CategoryDeleteResponse { reassigned_posts }))
}

// ===== Subcategory Handlers =====

/// List subcategories
#[utoipa::path(
    get,
    path = "/api/admin/subcategories",
    tag = "subcategories",
    params(ListSubcategoriesQuery),
    responses((status = 200, body = SubcategoryListResponse)),
    security(("bearer_auth" = []))
)]
pub async fn list_subcategories(
    Extension(service): Extension<Arc<Service>>,
    Query(query): Query<ListSubcategoriesQuery>,
) -> Result<Json<SubcategoryListResponse>, Problem> {
    let page = service.page_request(query.page, query.per_page);
    let filter = SubcategoryQuery {
        search: query.search,
        category_id: query.category_id,
    };
    let subcategories = service
        .list_subcategories(filter, page)
        .await
        .map_err(map_domain_error)?;

    Ok(Json(subcategories.into()))
}

/// Get a subcategory
#[utoipa::path(
    get,
    path = "/api/admin/subcategories/{id}",
    tag = "subcategories",
    params(("id" = Uuid, Path, description = "Subcategory id")),
    responses(
        (status = 200, body = SubcategoryDto),
        (status = 404, body = Problem)
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_subcategory(
    Extension(service): Extension<Arc<Service>>,
    Path(id): Path<Uuid>,
) -> Result<Json<SubcategoryDto>, Problem> {
    let subcategory = service
        .get_subcategory(id)
        .await
        .map_err(map_domain_error)?;
    Ok(Json(subcategory.into()))
}

/// Create a subcategory under a category
#[utoipa::path(
    post,
    path = "/api/admin/subcategories",
    tag = "subcategories",
    request_body = CreateSubcategoryRequest,
    responses(
        (status = 201, body = SubcategoryDto),
        (status = 400, body = Problem),
        (status = 409, body = Problem)
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_subcategory(
    Extension(service): Extension<Arc<Service>>,
    Extension(actor): Extension<AuthContext>,
    Json(req): Json<CreateSubcategoryRequest>,
) -> Result<(StatusCode, Json<SubcategoryDto>), Problem> {
    let subcategory = service
        .create_subcategory(req.into(), &actor)
        .await
        .map_err(map_domain_error)?;

    Ok((StatusCode::CREATED, Json(subcategory.into())))
}

/// Rename or move a subcategory
#[utoipa::path(
    patch,
    path = "/api/admin/subcategories/{id}",
    tag = "subcategories",
    params(("id" = Uuid, Path, description = "Subcategory id")),
    request_body = UpdateSubcategoryRequest,
    responses(
        (status = 200, body = SubcategoryDto),
        (status = 400, body = Problem),
        (status = 404, body = Problem),
        (status = 409, body = Problem)
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_subcategory(
    Extension(service): Extension<Arc<Service>>,
    Extension(actor): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateSubcategoryRequest>,
) -> Result<Json<SubcategoryDto>, Problem> {
    let subcategory = service
        .update_subcategory(id, req.into(), &actor)
        .await
        .map_err(map_domain_error)?;

    Ok(Json(subcategory.into()))
}

/// Delete an unused subcategory
#[utoipa::path(
    delete,
    path = "/api/admin/subcategories/{id}",
    tag = "subcategories",
    params(("id" = Uuid, Path, description = "Subcategory id")),
    responses(
        (status = 204),
        (status = 404, body = Problem),
        (status = 409, description = "Still used by posts", body = Problem)
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_subcategory(
    Extension(service): Extension<Arc<Service>>,
    Extension(actor): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, Problem> {
    service
        .delete_subcategory(id, &actor)
        .await
        .map_err(map_domain_error)?;

    Ok(StatusCode::NO_CONTENT)
}

// ===== Tag Handlers =====

/// List tags
#[utoipa::path(
    get,
    path = "/api/admin/tags",
    tag = "tags",
    params(ListQuery),
    responses((status = 200, body = TagListResponse)),
    security(("bearer_auth" = []))
)]
pub async fn list_tags(
    Extension(service): Extension<Arc<Service>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<TagListResponse>, Problem> {
    let page = service.page_request(query.page, query.per_page);
    let tags = service
        .list_tags(TagQuery { search: query.search }, page)
        .await
        .map_err(map_domain_error)?;

    Ok(Json(tags.into()))
}

/// Get a tag
#[utoipa::path(
    get,
    path = "/api/admin/tags/{id}",
    tag = "tags",
    params(("id" = Uuid, Path, description = "Tag id")),
    responses(
        (status = 200, body = TagDto),
        (status = 404, body = Problem)
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_tag(
    Extension(service): Extension<Arc<Service>>,
    Path(id): Path<Uuid>,
) -> Result<Json<TagDto>, Problem> {
    let tag = service.get_tag(id).await.map_err(map_domain_error)?;
    Ok(Json(tag.into()))
}

/// Create a tag
#[utoipa::path(
    post,
    path = "/api/admin/tags",
    tag = "tags",
    request_body = CreateTagRequest,
    responses(
        (status = 201, body = TagDto),
        (status = 400, body = Problem),
        (status = 409, body = Problem)
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_tag(
    Extension(service): Extension<Arc<Service>>,
    Extension(actor): Extension<AuthContext>,
    Json(req): Json<CreateTagRequest>,
) -> Result<(StatusCode, Json<TagDto>), Problem> {
    let tag = service
        .create_tag(req.into(), &actor)
        .await
        .map_err(map_domain_error)?;

    Ok((StatusCode::CREATED, Json(tag.into())))
}

/// Rename a tag
#[utoipa::path(
    patch,
    path = "/api/admin/tags/{id}",
    tag = "tags",
    params(("id" = Uuid, Path, description = "Tag id")),
    request_body = UpdateTagRequest,
    responses(
        (status = 200, body = TagDto),
        (status = 400, body = Problem),
        (status = 404, body = Problem),
        (status = 409, body = Problem)
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_tag(
    Extension(service): Extension<Arc<Service>>,
    Extension(actor): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateTagRequest>,
) -> Result<Json<TagDto>, Problem> {
    let tag = service
        .update_tag(id, req.into(), &actor)
        .await
        .map_err(map_domain_error)?;

    Ok(Json(tag.into()))
}

/// Delete a tag and detach it from posts
#[utoipa::path(
    delete,
    path = "/api/admin/tags/{id}",
    tag = "tags",
    params(("id" = Uuid, Path, description = "Tag id")),
    responses(
        (status = 204),
        (status = 404, body = Problem)
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_tag(
    Extension(service): Extension<Arc<Service>>,
    Extension(actor): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, Problem> {
    service
        .delete_tag(id, &actor)
        .await
        .map_err(map_domain_error)?;

    Ok(StatusCode::NO_CONTENT)
}

// ===== Post Handlers =====

/// List posts, newest first
#[utoipa::path(
    get,
    path = "/api/admin/posts",
    tag = "posts",
    params(ListPostsQuery),
    responses((status = 200, body = PostListResponse)),
    security(("bearer_auth" = []))
)]
pub async fn list_posts(
    Extension(service): Extension<Arc<Service>>,
    Query(query): Query<ListPostsQuery>,
) -> Result<Json<PostListResponse>, Problem> {
    let page = service.page_request(query.page, query.per_page);
    let posts = service
        .list_posts(query.into(), page)
        .await
        .map_err(map_domain_error)?;

    Ok(Json(posts.into()))
}

/// Get a post with its taxonomy
#[utoipa::path(
    get,
    path = "/api/admin/posts/{id}",
    tag = "posts",
    params(("id" = Uuid, Path, description = "Post id")),
    responses(
        (status = 200, body = PostDetailsDto),
        (status = 404, body = Problem)
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_post(
    Extension(service): Extension<Arc<Service>>,
    Path(id): Path<Uuid>,
) -> Result<Json<PostDetailsDto>, Problem> {
    let details = service
        .get_post_details(id)
        .await
        .map_err(map_domain_error)?;
    Ok(Json(details.into()))
}

/// Create a draft or published post
#[utoipa::path(
    post,
    path = "/api/admin/posts",
    tag = "posts",
    request_body = CreatePostRequest,
    responses(
        (status = 201, body = PostDto),
        (status = 400, body = Problem),
        (status = 409, description = "Slug already used", body = Problem)
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_post(
    Extension(service): Extension<Arc<Service>>,
    Extension(actor): Extension<AuthContext>,
    Json(req): Json<CreatePostRequest>,
) -> Result<(StatusCode, Json<PostDto>), Problem> {
    let post = service
        .create_post(req.into(), &actor)
        .await
        .map_err(map_domain_error)?;

    Ok((StatusCode::CREATED, Json(post.into())))
}

/// Partially update a post
#[utoipa::path(
    patch,
    path = "/api/admin/posts/{id}",
    tag = "posts",
    params(("id" = Uuid, Path, description = "Post id")),
    request_body = UpdatePostRequest,
    responses(
        (status = 200, body = PostDto),
        (status = 400, body = Problem),
        (status = 404, body = Problem),
        (status = 409, body = Problem)
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_post(
    Extension(service): Extension<Arc<Service>>,
    Extension(actor): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdatePostRequest>,
) -> Result<Json<PostDto>, Problem> {
    let post = service
        .update_post(id, req.into(), &actor)
        .await
        .map_err(map_domain_error)?;

    Ok(Json(post.into()))
}

/// Delete a post
#[utoipa::path(
    delete,
    path = "/api/admin/posts/{id}",
    tag = "posts",
    params(("id" = Uuid, Path, description = "Post id")),
    responses(
        (status = 204),
        (status = 404, body = Problem)
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_post(
    Extension(service): Extension<Arc<Service>>,
    Extension(actor): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, Problem> {
    service
        .delete_post(id, &actor)
        .await
        .map_err(map_domain_error)?;

    Ok(StatusCode::NO_CONTENT)
}

/// Suggest a free slug for a title
#[utoipa::path(
    get,
    path = "/api/admin/posts/slug-suggestion",
    tag = "posts",
    params(SlugSuggestionQuery),
    responses((status = 200, body = SlugSuggestionResponse)),
    security(("bearer_auth" = []))
)]
pub async fn suggest_slug(
    Extension(service): Extension<Arc<Service>>,
    Query(query): Query<SlugSuggestionQuery>,
) -> Result<Json<SlugSuggestionResponse>, Problem> {
    let slug = service
        .suggest_slug(&query.title, query.exclude_id)
        .await
        .map_err(map_domain_error)?;

    Ok(Json(SlugSuggestionResponse { slug }))
}

/// Check whether a slug is well-formed and free
#[utoipa::path(
    get,
    path = "/api/admin/posts/slug-check",
    tag = "posts",
    params(SlugCheckQuery),
    responses((status = 200, body = SlugCheckResponse)),
    security(("bearer_auth" = []))
)]
pub async fn check_slug(
    Extension(service): Extension<Arc<Service>>,
    Query(query): Query<SlugCheckQuery>,
) -> Result<Json<SlugCheckResponse>, Problem> {
    let status = service
        .check_slug(&query.slug, query.exclude_id)
        .await
        .map_err(map_domain_error)?;

    Ok(Json(SlugCheckResponse::new(query.slug, status)))
}

// ===== Public Reader Handlers =====

/// Published posts, newest first
#[utoipa::path(
    get,
    path = "/api/blog/posts",
    tag = "blog",
    params(PublicPostsQuery),
    responses((status = 200, body = PostSummaryListResponse))
)]
pub async fn list_published_posts(
    Extension(service): Extension<Arc<Service>>,
    Query(query): Query<PublicPostsQuery>,
) -> Result<Json<PostSummaryListResponse>, Problem> {
    let page = service.page_request(query.page, query.per_page);
    let excerpt_length = service.config().excerpt_length;
    let posts = service
        .list_published_posts(query.into(), page)
        .await
        .map_err(map_domain_error)?;

    Ok(Json(
        posts
            .map(|post| PostSummaryDto::from_post(post, excerpt_length))
            .into(),
    ))
}

/// Published post by slug
#[utoipa::path(
    get,
    path = "/api/blog/posts/{slug}",
    tag = "blog",
    params(("slug" = String, Path, description = "Post slug")),
    responses(
        (status = 200, body = PublishedPostDto),
        (status = 404, body = Problem)
    )
)]
pub async fn get_published_post(
    Extension(service): Extension<Arc<Service>>,
    Path(slug): Path<String>,
) -> Result<Json<PublishedPostDto>, Problem> {
    let post = service
        .get_published_post(&slug)
        .await
        .map_err(map_domain_error)?;
    Ok(Json(post.into()))
}

/// All categories for navigation
#[utoipa::path(
    get,
    path = "/api/blog/categories",
    tag = "blog",
    responses((status = 200, body = Vec<CategoryDto>))
)]
pub async fn public_categories(
    Extension(service): Extension<Arc<Service>>,
) -> Result<Json<Vec<CategoryDto>>, Problem> {
    let categories = service.all_categories().await.map_err(map_domain_error)?;
    Ok(Json(categories.into_iter().map(Into::into).collect()))
}

/// All tags for navigation
#[utoipa::path(
    get,
    path = "/api/blog/tags",
    tag = "blog",
    responses((status = 200, body = Vec<TagDto>))
)]
pub async fn public_tags(
    Extension(service): Extension<Arc<Service>>,
) -> Result<Json<Vec<TagDto>>, Problem> {
    let tags = service.all_tags().await.map_err(map_domain_error)?;
    Ok(Json(tags.into_iter().map(Into::into).collect()))
}
