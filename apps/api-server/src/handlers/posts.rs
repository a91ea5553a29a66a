//! Post handlers - feed, detail, authoring.

use actix_web::{HttpResponse, web};
use chrono::{DateTime, Utc};
use uuid::Uuid;

use fabula_core::ports::BaseRepository;
use fabula_core::services::{FeedEntry, FeedScope, PostDraft};
use fabula_shared::dto::{CategoryResponse, CommentResponse, PostDetailResponse, PostRequest};

use crate::handlers::{PageQuery, page_response, post_response};
use crate::middleware::auth::{Identity, OptionalIdentity};
use crate::middleware::error::{AppError, AppResult, map_denial};
use crate::state::AppState;

/// GET /api/posts - the public feed, with the viewer's own hidden posts
/// mixed in when authenticated.
pub async fn list(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let page = state
        .resolver
        .resolve(identity.viewer(), &FeedScope::default(), &query.to_request())
        .await?;

    Ok(HttpResponse::Ok().json(page_response(page)))
}

/// GET /api/posts/{post_id}
pub async fn detail(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let post_id = path.into_inner();

    let entry = state
        .resolver
        .resolve_post(identity.viewer(), post_id)
        .await?;
    let thread = state.comments.list(post_id).await?;

    let author_username = state
        .accounts
        .find_by_id(entry.post.author_id)
        .await?
        .map(|a| a.username)
        .unwrap_or_default();

    let category = match entry.post.category_id {
        Some(id) => state.categories.find_by_id(id).await?.map(|c| CategoryResponse {
            slug: c.slug,
            title: c.title,
            description: c.description,
        }),
        None => None,
    };

    let location_name = match entry.post.location_id {
        Some(id) => state
            .locations
            .find_by_id(id)
            .await?
            .filter(|l| l.is_published)
            .map(|l| l.name),
        None => None,
    };

    let comments = thread
        .into_iter()
        .map(|c| CommentResponse {
            id: c.id,
            text: c.text,
            author_id: c.author_id,
            post_id: c.post_id,
            created_at: c.created_at,
        })
        .collect();

    Ok(HttpResponse::Ok().json(PostDetailResponse {
        post: post_response(entry),
        author_username,
        category,
        location_name,
        comments,
    }))
}

/// POST /api/posts
pub async fn create(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<PostRequest>,
) -> AppResult<HttpResponse> {
    let draft = parse_draft(body.into_inner())?;

    let post = state.authoring.create(identity.viewer(), draft).await?;

    tracing::debug!(post_id = %post.id, author = %identity.username, "Post created");

    Ok(HttpResponse::Created().json(post_response(FeedEntry {
        post,
        comment_count: 0,
    })))
}

/// PUT /api/posts/{post_id}
pub async fn update(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<PostRequest>,
) -> AppResult<HttpResponse> {
    let post_id = path.into_inner();
    let draft = parse_draft(body.into_inner())?;

    let post = state
        .authoring
        .update(identity.viewer(), post_id, draft)
        .await
        .map_err(|e| map_denial(e, state.policy, &post_path(post_id)))?;

    let comment_count = state
        .resolver
        .resolve_post(identity.viewer(), post_id)
        .await
        .map(|entry| entry.comment_count)
        .unwrap_or(0);

    Ok(HttpResponse::Ok().json(post_response(FeedEntry {
        post,
        comment_count,
    })))
}

/// DELETE /api/posts/{post_id}
pub async fn delete(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let post_id = path.into_inner();

    state
        .authoring
        .delete(identity.viewer(), post_id)
        .await
        .map_err(|e| map_denial(e, state.policy, &post_path(post_id)))?;

    Ok(HttpResponse::NoContent().finish())
}

pub(crate) fn post_path(post_id: Uuid) -> String {
    format!("/api/posts/{post_id}")
}

fn parse_draft(req: PostRequest) -> Result<PostDraft, AppError> {
    let pub_date = DateTime::parse_from_rfc3339(&req.pub_date)
        .map_err(|_| AppError::BadRequest("pub_date must be an RFC 3339 timestamp".to_string()))?
        .with_timezone(&Utc);

    Ok(PostDraft {
        title: req.title,
        text: req.text,
        image_ref: req.image_ref,
        pub_date,
        is_published: req.is_published,
        category_id: req.category_id,
        location_id: req.location_id,
    })
}
