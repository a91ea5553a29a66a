//! Post visibility resolution.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::domain::{Post, Viewer};
use crate::error::{DomainError, RepoError};
use crate::pagination::{Page, PageRequest};
use crate::ports::{CategoryRepository, CommentRepository, PostFilter, PostRepository};
use crate::services::AuthorizationPolicy;

/// Whether a post is visible to everyone.
///
/// An unset category counts as published; `category_published` is the
/// state of the post's category when one is set.
pub fn is_publicly_visible(post: &Post, category_published: bool, now: DateTime<Utc>) -> bool {
    post.is_published && category_published && post.pub_date <= now
}

/// Optional restriction of a feed to one category and/or one author.
#[derive(Debug, Clone, Default)]
pub struct FeedScope {
    pub category_slug: Option<String>,
    pub author_id: Option<Uuid>,
}

/// A visible post annotated with its live comment count.
#[derive(Debug, Clone, Serialize)]
pub struct FeedEntry {
    pub post: Post,
    pub comment_count: u64,
}

/// Newest first by publish date, ties broken by id ascending.
///
/// Listings must come back in the same order on every call with
/// unchanged data, so ties are never left to storage order.
fn feed_order(a: &Post, b: &Post) -> Ordering {
    b.pub_date.cmp(&a.pub_date).then_with(|| a.id.cmp(&b.id))
}

/// Resolves which posts a viewer may see, in feed order.
#[derive(Clone)]
pub struct VisibilityResolver {
    posts: Arc<dyn PostRepository>,
    categories: Arc<dyn CategoryRepository>,
    comments: Arc<dyn CommentRepository>,
    policy: AuthorizationPolicy,
}

impl VisibilityResolver {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        categories: Arc<dyn CategoryRepository>,
        comments: Arc<dyn CommentRepository>,
        policy: AuthorizationPolicy,
    ) -> Self {
        Self {
            posts,
            categories,
            comments,
            policy,
        }
    }

    /// Resolve the feed for `viewer` under `scope`.
    ///
    /// Filtering and comment-count annotation run over the full candidate
    /// set; the page is sliced last.
    pub async fn resolve(
        &self,
        viewer: Viewer,
        scope: &FeedScope,
        page: &PageRequest,
    ) -> Result<Page<FeedEntry>, DomainError> {
        page.validate()?;

        let mut filter = PostFilter {
            author_id: scope.author_id,
            category_id: None,
        };

        if let Some(slug) = &scope.category_slug {
            // An unpublished category is indistinguishable from a missing
            // one, no matter what its posts look like.
            let category = self
                .categories
                .find_by_slug(slug)
                .await?
                .filter(|c| c.is_published)
                .ok_or(DomainError::not_found("category"))?;
            filter.category_id = Some(category.id);
        }

        let candidates = self.posts.list(&filter).await?;
        let now = Utc::now();

        let mut category_states: HashMap<Uuid, bool> = HashMap::new();
        let mut entries = Vec::new();
        for post in candidates {
            let category_published = self.category_published(&post, &mut category_states).await?;
            if !self.visible_to(viewer, &post, category_published, now) {
                continue;
            }
            let comment_count = self.comments.count_for_post(post.id).await?;
            entries.push(FeedEntry {
                post,
                comment_count,
            });
        }

        entries.sort_by(|a, b| feed_order(&a.post, &b.post));

        Ok(Page::slice(entries, page))
    }

    /// Resolve one post for its detail view.
    ///
    /// Absent and hidden are the same `NotFound` to the caller.
    pub async fn resolve_post(
        &self,
        viewer: Viewer,
        post_id: Uuid,
    ) -> Result<FeedEntry, DomainError> {
        let post = self
            .posts
            .find_by_id(post_id)
            .await?
            .ok_or(DomainError::not_found("post"))?;

        let mut category_states = HashMap::new();
        let category_published = self.category_published(&post, &mut category_states).await?;

        if !self.visible_to(viewer, &post, category_published, Utc::now()) {
            return Err(DomainError::not_found("post"));
        }

        let comment_count = self.comments.count_for_post(post.id).await?;
        Ok(FeedEntry {
            post,
            comment_count,
        })
    }

    fn visible_to(
        &self,
        viewer: Viewer,
        post: &Post,
        category_published: bool,
        now: DateTime<Utc>,
    ) -> bool {
        if viewer.owns(post.author_id) {
            return true;
        }
        if self.policy.staff_override && viewer.is_staff() {
            return true;
        }
        is_publicly_visible(post, category_published, now)
    }

    async fn category_published(
        &self,
        post: &Post,
        states: &mut HashMap<Uuid, bool>,
    ) -> Result<bool, RepoError> {
        let Some(category_id) = post.category_id else {
            return Ok(true);
        };
        if let Some(&published) = states.get(&category_id) {
            return Ok(published);
        }
        // A dangling category reference hides the post rather than
        // rendering it uncategorized.
        let published = self
            .categories
            .find_by_id(category_id)
            .await?
            .map(|c| c.is_published)
            .unwrap_or(false);
        states.insert(category_id, published);
        Ok(published)
    }
}
