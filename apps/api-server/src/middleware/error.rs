//! Error handling middleware - RFC 7807 responses and denial mapping.

use actix_web::{HttpResponse, ResponseError, http::StatusCode, http::header};
use std::fmt;

use fabula_core::error::{DomainError, RepoError};
use fabula_core::services::{AuthorizationPolicy, DenialMode};
use fabula_shared::ErrorResponse;

pub type AppResult<T> = Result<T, AppError>;

/// Application-level error type that converts to RFC 7807 responses.
#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    BadRequest(String),
    Unauthorized,
    Forbidden,
    Conflict(String),
    Internal(String),
    /// 303 with a Location header - the redirect denial mode.
    SeeOther(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::Unauthorized => write!(f, "Unauthorized"),
            AppError::Forbidden => write!(f, "Forbidden"),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
            AppError::SeeOther(location) => write!(f, "See other: {}", location),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::SeeOther(_) => StatusCode::SEE_OTHER,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error = match self {
            AppError::NotFound(detail) => ErrorResponse::not_found(detail),
            AppError::BadRequest(detail) => ErrorResponse::bad_request(detail),
            AppError::Unauthorized => ErrorResponse::unauthorized(),
            AppError::Forbidden => ErrorResponse::forbidden(),
            AppError::Conflict(detail) => ErrorResponse::new(409, "Conflict").with_detail(detail),
            AppError::Internal(detail) => {
                // Log internal errors
                tracing::error!("Internal error: {}", detail);
                ErrorResponse::internal_error()
            }
            AppError::SeeOther(location) => {
                return HttpResponse::SeeOther()
                    .insert_header((header::LOCATION, location.clone()))
                    .finish();
            }
        };

        HttpResponse::build(self.status_code()).json(error)
    }
}

// Conversion from domain errors
impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound { entity } => AppError::NotFound(entity.to_string()),
            DomainError::Validation(msg) => AppError::BadRequest(msg),
            DomainError::DeniedUnauthenticated => AppError::Unauthorized,
            DomainError::DeniedNotOwner => AppError::Forbidden,
            DomainError::Repo(e) => e.into(),
        }
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound => AppError::NotFound("entity".to_string()),
            RepoError::Constraint(msg) => AppError::Conflict(msg),
            RepoError::Connection(msg) | RepoError::Query(msg) => AppError::Internal(msg),
        }
    }
}

/// Map an ownership denial according to the configured denial mode.
///
/// `Redirect` sends the caller back to `detail_path`; every other error
/// takes the normal conversion.
pub fn map_denial(err: DomainError, policy: AuthorizationPolicy, detail_path: &str) -> AppError {
    match (&err, policy.denial_mode) {
        (DomainError::DeniedNotOwner, DenialMode::Redirect) => {
            AppError::SeeOther(detail_path.to_string())
        }
        _ => err.into(),
    }
}
