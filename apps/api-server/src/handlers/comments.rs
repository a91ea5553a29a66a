//! Comment thread handlers.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use fabula_core::domain::Comment;
use fabula_shared::dto::{CommentRequest, CommentResponse};

use crate::handlers::posts::post_path;
use crate::middleware::auth::Identity;
use crate::middleware::error::{AppResult, map_denial};
use crate::state::AppState;

/// POST /api/posts/{post_id}/comments
pub async fn add(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<CommentRequest>,
) -> AppResult<HttpResponse> {
    let post_id = path.into_inner();

    let comment = state
        .comments
        .add(identity.viewer(), post_id, &body.text)
        .await?;

    Ok(HttpResponse::Created().json(comment_response(comment)))
}

/// PUT /api/posts/{post_id}/comments/{comment_id}
pub async fn edit(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<(Uuid, Uuid)>,
    body: web::Json<CommentRequest>,
) -> AppResult<HttpResponse> {
    let (post_id, comment_id) = path.into_inner();

    let comment = state
        .comments
        .edit(identity.viewer(), comment_id, &body.text)
        .await
        .map_err(|e| map_denial(e, state.policy, &post_path(post_id)))?;

    Ok(HttpResponse::Ok().json(comment_response(comment)))
}

/// DELETE /api/posts/{post_id}/comments/{comment_id}
pub async fn delete(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<(Uuid, Uuid)>,
) -> AppResult<HttpResponse> {
    let (post_id, comment_id) = path.into_inner();

    state
        .comments
        .delete(identity.viewer(), comment_id)
        .await
        .map_err(|e| map_denial(e, state.policy, &post_path(post_id)))?;

    Ok(HttpResponse::NoContent().finish())
}

fn comment_response(comment: Comment) -> CommentResponse {
    CommentResponse {
        id: comment.id,
        text: comment.text,
        author_id: comment.author_id,
        post_id: comment.post_id,
        created_at: comment.created_at,
    }
}
