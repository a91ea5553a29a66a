//! Application state - shared across all handlers.

use std::sync::Arc;

use fabula_core::ports::{
    AccountRepository, CategoryRepository, CommentRepository, LocationRepository, PostRepository,
};
use fabula_core::services::{
    AuthorizationPolicy, CommentThread, OwnershipAuthorizer, PostAuthoring, ProfileAggregator,
    VisibilityResolver,
};
use fabula_infra::MemoryStore;

use crate::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub accounts: Arc<dyn AccountRepository>,
    pub categories: Arc<dyn CategoryRepository>,
    pub locations: Arc<dyn LocationRepository>,
    pub resolver: VisibilityResolver,
    pub comments: CommentThread,
    pub profiles: ProfileAggregator,
    pub authoring: PostAuthoring,
    pub policy: AuthorizationPolicy,
}

/// The repository set behind the services - Postgres when configured,
/// the in-memory store otherwise.
struct Repos {
    accounts: Arc<dyn AccountRepository>,
    categories: Arc<dyn CategoryRepository>,
    locations: Arc<dyn LocationRepository>,
    posts: Arc<dyn PostRepository>,
    comments: Arc<dyn CommentRepository>,
}

impl Repos {
    fn memory() -> Self {
        let store = MemoryStore::new();
        Self {
            accounts: Arc::new(store.clone()),
            categories: Arc::new(store.clone()),
            locations: Arc::new(store.clone()),
            posts: Arc::new(store.clone()),
            comments: Arc::new(store),
        }
    }

    #[cfg(feature = "postgres")]
    fn postgres(db: fabula_infra::database::DbConn) -> Self {
        use fabula_infra::{
            PostgresAccountRepository, PostgresCategoryRepository, PostgresCommentRepository,
            PostgresLocationRepository, PostgresPostRepository,
        };

        Self {
            accounts: Arc::new(PostgresAccountRepository::new(db.clone())),
            categories: Arc::new(PostgresCategoryRepository::new(db.clone())),
            locations: Arc::new(PostgresLocationRepository::new(db.clone())),
            posts: Arc::new(PostgresPostRepository::new(db.clone())),
            comments: Arc::new(PostgresCommentRepository::new(db)),
        }
    }
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> Self {
        #[cfg(feature = "postgres")]
        let repos = match &config.database {
            Some(db_config) => match fabula_infra::database::connect(db_config).await {
                Ok(conn) => Repos::postgres(conn),
                Err(e) => {
                    tracing::error!(
                        "Failed to connect to database: {}. Using the in-memory store.",
                        e
                    );
                    Repos::memory()
                }
            },
            None => {
                tracing::warn!("DATABASE_URL not set. Running with the in-memory store.");
                Repos::memory()
            }
        };

        #[cfg(not(feature = "postgres"))]
        let repos = {
            tracing::info!("Running without postgres feature - using the in-memory store");
            Repos::memory()
        };

        let authorizer = OwnershipAuthorizer::new(config.policy);
        let resolver = VisibilityResolver::new(
            repos.posts.clone(),
            repos.categories.clone(),
            repos.comments.clone(),
            config.policy,
        );
        let comments =
            CommentThread::new(repos.posts.clone(), repos.comments.clone(), authorizer);
        let profiles = ProfileAggregator::new(repos.accounts.clone(), resolver.clone());
        let authoring = PostAuthoring::new(repos.posts.clone(), authorizer);

        tracing::info!("Application state initialized");

        Self {
            accounts: repos.accounts,
            categories: repos.categories,
            locations: repos.locations,
            resolver,
            comments,
            profiles,
            authoring,
            policy: config.policy,
        }
    }
}
