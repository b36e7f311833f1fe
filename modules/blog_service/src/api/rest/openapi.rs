//! OpenAPI document for the REST API

use super::{dto::*, error::Problem, handlers};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

#[derive(OpenApi)]
#[openapi(
    info(title = "Blog Service API", description = "Blog posts and their taxonomy"),
    paths(
        handlers::health,
        handlers::list_categories,
        handlers::get_category,
        handlers::create_category,
        handlers::update_category,
        handlers::delete_category,
        handlers::list_subcategories,
        handlers::get_subcategory,
        handlers::create_subcategory,
        handlers::update_subcategory,
        handlers::delete_subcategory,
        handlers::list_tags,
        handlers::get_tag,
        handlers::create_tag,
        handlers::update_tag,
        handlers::delete_tag,
        handlers::list_posts,
        handlers::get_post,
        handlers::create_post,
        handlers::update_post,
        handlers::delete_post,
        handlers::suggest_slug,
        handlers::check_slug,
        handlers::list_published_posts,
        handlers::get_published_post,
        handlers::public_categories,
        handlers::public_tags,
    ),
    components(schemas(
        Problem,
        HealthResponse,
        CategoryDto,
        CreateCategoryRequest,
        UpdateCategoryRequest,
        CategoryDeleteResponse,
        CategoryListResponse,
        SubcategoryDto,
        CreateSubcategoryRequest,
        UpdateSubcategoryRequest,
        SubcategoryListResponse,
        TagDto,
        CreateTagRequest,
        UpdateTagRequest,
        TagListResponse,
        PostDto,
        PostDetailsDto,
        CreatePostRequest,
        UpdatePostRequest,
        PostListResponse,
        SlugSuggestionResponse,
        SlugAvailability,
        SlugCheckResponse,
        PostSummaryDto,
        PostSummaryListResponse,
        TocEntryDto,
        PublishedPostDto,
    )),
    modifiers(&BearerAuth),
    tags(
        (name = "health"),
        (name = "categories", description = "Post categories"),
        (name = "subcategories", description = "Categories nested under a category"),
        (name = "tags", description = "Flat post labels"),
        (name = "posts", description = "Post authoring"),
        (name = "blog", description = "Published content for readers"),
    )
)]
pub struct ApiDoc;

/// Registers the `bearer_auth` scheme referenced by admin paths
struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_admin_and_public_paths() {
        let doc = ApiDoc::openapi();
        let paths = &doc.paths.paths;
        assert!(paths.contains_key("/api/admin/posts/{id}"));
        assert!(paths.contains_key("/api/admin/posts/slug-check"));
        assert!(paths.contains_key("/api/blog/posts/{slug}"));

        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("bearer_auth"));
    }
}
