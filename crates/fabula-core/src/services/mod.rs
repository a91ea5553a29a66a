//! Core services - visibility, ownership, comments, profiles, authoring.
//!
//! Each operation is an explicit call on one of these services with the
//! viewer passed in; no behavior is inherited and no handler re-derives
//! the rules on its own.

mod authorize;
mod comments;
mod posts;
mod profile;
mod visibility;

pub use authorize::{Action, AuthorizationPolicy, Decision, DenialMode, OwnershipAuthorizer};
pub use comments::CommentThread;
pub use posts::{PostAuthoring, PostDraft};
pub use profile::{ProfileAggregator, ProfileChanges, ProfilePage};
pub use visibility::{FeedEntry, FeedScope, VisibilityResolver, is_publicly_visible};
