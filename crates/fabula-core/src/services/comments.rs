//! Comment thread management.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{Comment, Viewer};
use crate::error::DomainError;
use crate::ports::{CommentRepository, PostRepository};
use crate::services::{Action, OwnershipAuthorizer};

/// Lists and mutates the flat comment thread under a post.
///
/// Commenting is gated only on post existence and authentication, not on
/// post visibility - intentional, matching every reviewed iteration of
/// the product.
#[derive(Clone)]
pub struct CommentThread {
    posts: Arc<dyn PostRepository>,
    comments: Arc<dyn CommentRepository>,
    authorizer: OwnershipAuthorizer,
}

impl CommentThread {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        comments: Arc<dyn CommentRepository>,
        authorizer: OwnershipAuthorizer,
    ) -> Self {
        Self {
            posts,
            comments,
            authorizer,
        }
    }

    /// Comments for a post in conversational order: oldest first,
    /// ties broken by id ascending.
    pub async fn list(&self, post_id: Uuid) -> Result<Vec<Comment>, DomainError> {
        self.require_post(post_id).await?;

        let mut comments = self.comments.list_for_post(post_id).await?;
        comments.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(comments)
    }

    /// Append a comment owned by the viewer.
    pub async fn add(
        &self,
        viewer: Viewer,
        post_id: Uuid,
        text: &str,
    ) -> Result<Comment, DomainError> {
        let author_id = viewer
            .account_id()
            .ok_or(DomainError::DeniedUnauthenticated)?;
        self.require_post(post_id).await?;
        validate_text(text)?;

        let comment = Comment::new(author_id, post_id, text.to_string());
        Ok(self.comments.save(comment).await?)
    }

    /// Replace a comment's text; author only.
    pub async fn edit(
        &self,
        viewer: Viewer,
        comment_id: Uuid,
        text: &str,
    ) -> Result<Comment, DomainError> {
        let mut comment = self
            .comments
            .find_by_id(comment_id)
            .await?
            .ok_or(DomainError::not_found("comment"))?;

        self.authorizer.require(viewer, &comment, Action::Edit)?;
        validate_text(text)?;

        comment.text = text.to_string();
        Ok(self.comments.save(comment).await?)
    }

    /// Delete a comment; author only. A second delete of the same id is
    /// `NotFound`, not success.
    pub async fn delete(&self, viewer: Viewer, comment_id: Uuid) -> Result<(), DomainError> {
        let comment = self
            .comments
            .find_by_id(comment_id)
            .await?
            .ok_or(DomainError::not_found("comment"))?;

        self.authorizer.require(viewer, &comment, Action::Delete)?;

        self.comments.delete(comment.id).await?;
        Ok(())
    }

    async fn require_post(&self, post_id: Uuid) -> Result<(), DomainError> {
        self.posts
            .find_by_id(post_id)
            .await?
            .map(|_| ())
            .ok_or(DomainError::not_found("post"))
    }
}

fn validate_text(text: &str) -> Result<(), DomainError> {
    if text.trim().is_empty() {
        return Err(DomainError::Validation(
            "comment text must not be empty".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whitespace_only_text_is_rejected() {
        assert!(validate_text("").is_err());
        assert!(validate_text("   \n\t").is_err());
        assert!(validate_text("hello").is_ok());
    }
}
