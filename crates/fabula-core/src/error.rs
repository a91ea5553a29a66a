//! Domain-level error types.

use thiserror::Error;

/// Domain errors - business logic failures.
///
/// `NotFound` covers both genuinely absent entities and entities hidden
/// from the viewer; callers cannot tell the two apart.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("{entity} not found")]
    NotFound { entity: &'static str },

    #[error("Authentication required")]
    DeniedUnauthenticated,

    #[error("Only the author may do this")]
    DeniedNotOwner,

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error(transparent)]
    Repo(#[from] RepoError),
}

impl DomainError {
    pub fn not_found(entity: &'static str) -> Self {
        DomainError::NotFound { entity }
    }
}

/// Repository-level errors.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Database connection failed: {0}")]
    Connection(String),

    #[error("Query execution failed: {0}")]
    Query(String),

    #[error("Entity not found")]
    NotFound,

    #[error("Constraint violation: {0}")]
    Constraint(String),
}
