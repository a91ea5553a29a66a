//! Post authoring - create, update, delete.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{Post, Viewer};
use crate::error::DomainError;
use crate::ports::PostRepository;
use crate::services::{Action, OwnershipAuthorizer};

/// Editable fields of a post. The author is never part of a draft.
#[derive(Debug, Clone)]
pub struct PostDraft {
    pub title: String,
    pub text: String,
    pub image_ref: Option<String>,
    pub pub_date: DateTime<Utc>,
    pub is_published: bool,
    pub category_id: Option<Uuid>,
    pub location_id: Option<Uuid>,
}

/// Creates and mutates posts, with every mutation gated by the
/// ownership authorizer before it runs.
#[derive(Clone)]
pub struct PostAuthoring {
    posts: Arc<dyn PostRepository>,
    authorizer: OwnershipAuthorizer,
}

impl PostAuthoring {
    pub fn new(posts: Arc<dyn PostRepository>, authorizer: OwnershipAuthorizer) -> Self {
        Self { posts, authorizer }
    }

    /// Create a post owned by the viewer. The author is set here, once,
    /// and no later operation touches it.
    pub async fn create(&self, viewer: Viewer, draft: PostDraft) -> Result<Post, DomainError> {
        let author_id = viewer
            .account_id()
            .ok_or(DomainError::DeniedUnauthenticated)?;
        validate_draft(&draft)?;

        let mut post = Post::new(author_id, draft.title, draft.text, draft.pub_date);
        post.image_ref = draft.image_ref;
        post.is_published = draft.is_published;
        post.category_id = draft.category_id;
        post.location_id = draft.location_id;

        Ok(self.posts.save(post).await?)
    }

    /// Apply a draft to an existing post; author only.
    pub async fn update(
        &self,
        viewer: Viewer,
        post_id: Uuid,
        draft: PostDraft,
    ) -> Result<Post, DomainError> {
        let mut post = self
            .posts
            .find_by_id(post_id)
            .await?
            .ok_or(DomainError::not_found("post"))?;

        self.authorizer.require(viewer, &post, Action::Edit)?;
        validate_draft(&draft)?;

        post.title = draft.title;
        post.text = draft.text;
        post.image_ref = draft.image_ref;
        post.pub_date = draft.pub_date;
        post.is_published = draft.is_published;
        post.category_id = draft.category_id;
        post.location_id = draft.location_id;

        Ok(self.posts.save(post).await?)
    }

    /// Delete a post and, through the store, its comments. A second
    /// delete of the same id is `NotFound`.
    pub async fn delete(&self, viewer: Viewer, post_id: Uuid) -> Result<(), DomainError> {
        let post = self
            .posts
            .find_by_id(post_id)
            .await?
            .ok_or(DomainError::not_found("post"))?;

        self.authorizer.require(viewer, &post, Action::Delete)?;

        self.posts.delete(post.id).await?;
        Ok(())
    }
}

fn validate_draft(draft: &PostDraft) -> Result<(), DomainError> {
    if draft.title.trim().is_empty() {
        return Err(DomainError::Validation(
            "title must not be empty".to_string(),
        ));
    }
    if draft.text.trim().is_empty() {
        return Err(DomainError::Validation(
            "text must not be empty".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> PostDraft {
        PostDraft {
            title: "title".into(),
            text: "text".into(),
            image_ref: None,
            pub_date: Utc::now(),
            is_published: true,
            category_id: None,
            location_id: None,
        }
    }

    #[test]
    fn blank_title_or_text_fails_validation() {
        let mut d = draft();
        d.title = "  ".into();
        assert!(validate_draft(&d).is_err());

        let mut d = draft();
        d.text = "".into();
        assert!(validate_draft(&d).is_err());

        assert!(validate_draft(&draft()).is_ok());
    }
}
