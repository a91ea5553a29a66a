use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use fabula_core::domain::{Account, Category, Comment, Location, Post};
use fabula_core::error::RepoError;
use fabula_core::ports::{
    AccountRepository, BaseRepository, CategoryRepository, CommentRepository, LocationRepository,
    PostFilter, PostRepository,
};

#[derive(Default)]
struct Tables {
    accounts: HashMap<Uuid, Account>,
    categories: HashMap<Uuid, Category>,
    locations: HashMap<Uuid, Location>,
    posts: HashMap<Uuid, Post>,
    comments: HashMap<Uuid, Comment>,
}

/// In-memory store implementing every repository port over one set of
/// tables behind an async RwLock.
///
/// Clones share the same tables. Data is lost on process restart.
/// Unique columns and the post-to-comment cascade behave like the
/// relational schema.
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BaseRepository<Account, Uuid> for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, RepoError> {
        Ok(self.tables.read().await.accounts.get(&id).cloned())
    }

    async fn save(&self, account: Account) -> Result<Account, RepoError> {
        let mut tables = self.tables.write().await;
        let taken = tables
            .accounts
            .values()
            .any(|a| a.username == account.username && a.id != account.id);
        if taken {
            return Err(RepoError::Constraint(format!(
                "username '{}' already taken",
                account.username
            )));
        }
        tables.accounts.insert(account.id, account.clone());
        Ok(account)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        tables
            .accounts
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl AccountRepository for MemoryStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .accounts
            .values()
            .find(|a| a.username == username)
            .cloned())
    }
}

#[async_trait]
impl BaseRepository<Category, Uuid> for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Category>, RepoError> {
        Ok(self.tables.read().await.categories.get(&id).cloned())
    }

    async fn save(&self, category: Category) -> Result<Category, RepoError> {
        let mut tables = self.tables.write().await;
        let taken = tables
            .categories
            .values()
            .any(|c| c.slug == category.slug && c.id != category.id);
        if taken {
            return Err(RepoError::Constraint(format!(
                "slug '{}' already taken",
                category.slug
            )));
        }
        tables.categories.insert(category.id, category.clone());
        Ok(category)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        tables
            .categories
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl CategoryRepository for MemoryStore {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .categories
            .values()
            .find(|c| c.slug == slug)
            .cloned())
    }
}

#[async_trait]
impl BaseRepository<Location, Uuid> for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Location>, RepoError> {
        Ok(self.tables.read().await.locations.get(&id).cloned())
    }

    async fn save(&self, location: Location) -> Result<Location, RepoError> {
        let mut tables = self.tables.write().await;
        tables.locations.insert(location.id, location.clone());
        Ok(location)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        tables
            .locations
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl LocationRepository for MemoryStore {}

#[async_trait]
impl BaseRepository<Post, Uuid> for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        Ok(self.tables.read().await.posts.get(&id).cloned())
    }

    async fn save(&self, post: Post) -> Result<Post, RepoError> {
        let mut tables = self.tables.write().await;
        tables.posts.insert(post.id, post.clone());
        Ok(post)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        // Post and comments go in one atomic step, like the FK cascade.
        let mut tables = self.tables.write().await;
        if tables.posts.remove(&id).is_none() {
            return Err(RepoError::NotFound);
        }
        tables.comments.retain(|_, c| c.post_id != id);
        Ok(())
    }
}

#[async_trait]
impl PostRepository for MemoryStore {
    async fn list(&self, filter: &PostFilter) -> Result<Vec<Post>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .posts
            .values()
            .filter(|p| filter.author_id.is_none_or(|a| p.author_id == a))
            .filter(|p| filter.category_id.is_none_or(|c| p.category_id == Some(c)))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl BaseRepository<Comment, Uuid> for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Comment>, RepoError> {
        Ok(self.tables.read().await.comments.get(&id).cloned())
    }

    async fn save(&self, comment: Comment) -> Result<Comment, RepoError> {
        let mut tables = self.tables.write().await;
        if !tables.posts.contains_key(&comment.post_id) {
            return Err(RepoError::Constraint(
                "comment references a missing post".to_string(),
            ));
        }
        tables.comments.insert(comment.id, comment.clone());
        Ok(comment)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        tables
            .comments
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl CommentRepository for MemoryStore {
    async fn list_for_post(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .comments
            .values()
            .filter(|c| c.post_id == post_id)
            .cloned()
            .collect())
    }

    async fn count_for_post(&self, post_id: Uuid) -> Result<u64, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .comments
            .values()
            .filter(|c| c.post_id == post_id)
            .count() as u64)
    }
}
