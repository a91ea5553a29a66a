use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Account, Category, Comment, Location, Post};
use crate::error::RepoError;

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Save an entity (create or update).
    async fn save(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// Account repository with username lookup.
#[async_trait]
pub trait AccountRepository: BaseRepository<Account, Uuid> {
    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, RepoError>;
}

/// Category repository with slug lookup.
#[async_trait]
pub trait CategoryRepository: BaseRepository<Category, Uuid> {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, RepoError>;
}

/// Location repository.
#[async_trait]
pub trait LocationRepository: BaseRepository<Location, Uuid> {}

/// Candidate-set restriction for post listings.
///
/// Filters narrow the candidate set only; visibility rules are applied
/// by the resolver on top of whatever this returns.
#[derive(Debug, Clone, Copy, Default)]
pub struct PostFilter {
    pub author_id: Option<Uuid>,
    pub category_id: Option<Uuid>,
}

/// Post repository.
///
/// Deleting a post must also delete its comments, in the same atomic
/// operation.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, Uuid> {
    async fn list(&self, filter: &PostFilter) -> Result<Vec<Post>, RepoError>;
}

/// Comment repository.
#[async_trait]
pub trait CommentRepository: BaseRepository<Comment, Uuid> {
    async fn list_for_post(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError>;

    /// Live comment count for one post, recomputed per call.
    async fn count_for_post(&self, post_id: Uuid) -> Result<u64, RepoError>;
}
