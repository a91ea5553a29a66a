//! Author profile pages and own-profile editing.

use std::sync::Arc;

use serde::Deserialize;

use crate::domain::{Account, Viewer};
use crate::error::DomainError;
use crate::pagination::{Page, PageRequest};
use crate::ports::AccountRepository;
use crate::services::{FeedEntry, FeedScope, VisibilityResolver};

/// A resolved profile page.
#[derive(Debug, Clone)]
pub struct ProfilePage {
    pub account: Account,
    pub posts: Page<FeedEntry>,
    pub is_owner: bool,
}

/// The three fields an account may edit on itself.
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileChanges {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

/// Composes the visibility resolver scoped to one author.
#[derive(Clone)]
pub struct ProfileAggregator {
    accounts: Arc<dyn AccountRepository>,
    resolver: VisibilityResolver,
}

impl ProfileAggregator {
    pub fn new(accounts: Arc<dyn AccountRepository>, resolver: VisibilityResolver) -> Self {
        Self { accounts, resolver }
    }

    /// Resolve the profile of `username` as seen by `viewer`.
    ///
    /// The owner-view override falls out of the resolver's ownership
    /// short-circuit: scoping the feed to the target author means the
    /// owner gets every publication state and everyone else gets only
    /// the public subset.
    pub async fn profile(
        &self,
        viewer: Viewer,
        username: &str,
        page: &PageRequest,
    ) -> Result<ProfilePage, DomainError> {
        let account = self
            .accounts
            .find_by_username(username)
            .await?
            .ok_or(DomainError::not_found("profile"))?;

        let scope = FeedScope {
            category_slug: None,
            author_id: Some(account.id),
        };
        let posts = self.resolver.resolve(viewer, &scope, page).await?;
        let is_owner = viewer.owns(account.id);

        Ok(ProfilePage {
            account,
            posts,
            is_owner,
        })
    }

    /// Apply profile changes to the viewer's own account.
    ///
    /// The target is always the viewer; username, password hash, and the
    /// staff flag are not reachable from here.
    pub async fn update_profile(
        &self,
        viewer: Viewer,
        changes: ProfileChanges,
    ) -> Result<Account, DomainError> {
        let account_id = viewer
            .account_id()
            .ok_or(DomainError::DeniedUnauthenticated)?;

        let mut account = self
            .accounts
            .find_by_id(account_id)
            .await?
            .ok_or(DomainError::not_found("profile"))?;

        if changes.email.trim().is_empty() || !changes.email.contains('@') {
            return Err(DomainError::Validation(
                "a valid email address is required".to_string(),
            ));
        }

        account.first_name = changes.first_name;
        account.last_name = changes.last_name;
        account.email = changes.email;

        Ok(self.accounts.save(account).await?)
    }
}
