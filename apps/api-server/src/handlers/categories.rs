//! Category feed handler.

use actix_web::{HttpResponse, web};

use fabula_core::ports::CategoryRepository;
use fabula_core::services::FeedScope;
use fabula_shared::dto::{CategoryPostsResponse, CategoryResponse};

use crate::handlers::{PageQuery, page_response};
use crate::middleware::auth::OptionalIdentity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// GET /api/categories/{slug}/posts
///
/// An unpublished category 404s here no matter what it contains; the
/// resolver enforces that before any posts are considered.
pub async fn posts(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let slug = path.into_inner();

    let scope = FeedScope {
        category_slug: Some(slug.clone()),
        author_id: None,
    };
    let page = state
        .resolver
        .resolve(identity.viewer(), &scope, &query.to_request())
        .await?;

    // The resolver has already established the category exists and is
    // published; this fetch is for display data only.
    let category = state
        .categories
        .find_by_slug(&slug)
        .await?
        .ok_or_else(|| AppError::NotFound("category".to_string()))?;

    Ok(HttpResponse::Ok().json(CategoryPostsResponse {
        category: CategoryResponse {
            slug: category.slug,
            title: category.title,
            description: category.description,
        },
        posts: page_response(page),
    }))
}
