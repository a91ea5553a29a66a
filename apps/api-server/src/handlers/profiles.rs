//! Profile handlers.

use actix_web::{HttpResponse, web};

use fabula_core::services::ProfileChanges;
use fabula_shared::dto::{ProfileResponse, ProfileUpdateRequest};

use crate::handlers::{PageQuery, account_response, page_response};
use crate::middleware::auth::{Identity, OptionalIdentity};
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /api/profiles/{username}
pub async fn show(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let username = path.into_inner();

    let profile = state
        .profiles
        .profile(identity.viewer(), &username, &query.to_request())
        .await?;

    Ok(HttpResponse::Ok().json(ProfileResponse {
        account: account_response(profile.account),
        posts: page_response(profile.posts),
        is_owner: profile.is_owner,
    }))
}

/// PUT /api/profiles/me
///
/// The target is always the caller's own account.
pub async fn update(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<ProfileUpdateRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let account = state
        .profiles
        .update_profile(
            identity.viewer(),
            ProfileChanges {
                first_name: req.first_name,
                last_name: req.last_name,
                email: req.email,
            },
        )
        .await?;

    Ok(HttpResponse::Ok().json(account_response(account)))
}
