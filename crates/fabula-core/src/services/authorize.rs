//! Ownership authorization for mutating operations.

use serde::{Deserialize, Serialize};

use crate::domain::{Owned, Viewer};
use crate::error::DomainError;

/// Mutating action on an owned entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Edit,
    Delete,
}

/// Outcome of an authorization check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allowed,
    DeniedUnauthenticated,
    DeniedNotOwner,
}

impl Decision {
    /// Map a denial to its domain error; `Allowed` passes through.
    pub fn into_result(self) -> Result<(), DomainError> {
        match self {
            Decision::Allowed => Ok(()),
            Decision::DeniedUnauthenticated => Err(DomainError::DeniedUnauthenticated),
            Decision::DeniedNotOwner => Err(DomainError::DeniedNotOwner),
        }
    }
}

/// How the transport layer should render a denial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DenialMode {
    /// Redirect to the entity's detail page.
    Redirect,
    /// Hard 403.
    Forbidden,
}

/// Authorization policy, resolved once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthorizationPolicy {
    /// Whether staff accounts bypass ownership checks (and see hidden posts).
    pub staff_override: bool,
    /// How denials are rendered by the transport layer.
    pub denial_mode: DenialMode,
}

impl Default for AuthorizationPolicy {
    fn default() -> Self {
        Self {
            staff_override: false,
            denial_mode: DenialMode::Forbidden,
        }
    }
}

/// Decides whether a viewer may mutate an owned entity.
///
/// The decision is computed before the operation runs; nothing mutating
/// executes on any outcome other than `Allowed`. The authorizer is
/// transport-agnostic - mapping a denial to a response is the caller's job,
/// steered by [`AuthorizationPolicy::denial_mode`].
#[derive(Debug, Clone, Copy)]
pub struct OwnershipAuthorizer {
    policy: AuthorizationPolicy,
}

impl OwnershipAuthorizer {
    pub fn new(policy: AuthorizationPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> AuthorizationPolicy {
        self.policy
    }

    pub fn authorize(&self, viewer: Viewer, entity: &dyn Owned, _action: Action) -> Decision {
        let Some(account_id) = viewer.account_id() else {
            return Decision::DeniedUnauthenticated;
        };

        if account_id == entity.author_id() {
            return Decision::Allowed;
        }

        if self.policy.staff_override && viewer.is_staff() {
            return Decision::Allowed;
        }

        Decision::DeniedNotOwner
    }

    /// Authorize or fail with the matching domain error.
    pub fn require(
        &self,
        viewer: Viewer,
        entity: &dyn Owned,
        action: Action,
    ) -> Result<(), DomainError> {
        self.authorize(viewer, entity, action).into_result()
    }
}

impl Default for OwnershipAuthorizer {
    fn default() -> Self {
        Self::new(AuthorizationPolicy::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Post;
    use chrono::Utc;
    use uuid::Uuid;

    fn post_by(author: Uuid) -> Post {
        Post::new(author, "title".into(), "text".into(), Utc::now())
    }

    #[test]
    fn anonymous_viewer_is_denied_unauthenticated() {
        let authorizer = OwnershipAuthorizer::default();
        let post = post_by(Uuid::new_v4());

        let decision = authorizer.authorize(Viewer::Anonymous, &post, Action::Delete);

        assert_eq!(decision, Decision::DeniedUnauthenticated);
    }

    #[test]
    fn author_is_allowed() {
        let authorizer = OwnershipAuthorizer::default();
        let author = Uuid::new_v4();
        let post = post_by(author);
        let viewer = Viewer::Authenticated {
            id: author,
            is_staff: false,
        };

        assert_eq!(
            authorizer.authorize(viewer, &post, Action::Edit),
            Decision::Allowed
        );
    }

    #[test]
    fn non_owner_is_denied_even_when_staff_by_default() {
        let authorizer = OwnershipAuthorizer::default();
        let post = post_by(Uuid::new_v4());
        let staff = Viewer::Authenticated {
            id: Uuid::new_v4(),
            is_staff: true,
        };

        assert_eq!(
            authorizer.authorize(staff, &post, Action::Edit),
            Decision::DeniedNotOwner
        );
    }

    #[test]
    fn staff_override_allows_staff_but_not_regular_accounts() {
        let authorizer = OwnershipAuthorizer::new(AuthorizationPolicy {
            staff_override: true,
            denial_mode: DenialMode::Forbidden,
        });
        let post = post_by(Uuid::new_v4());

        let staff = Viewer::Authenticated {
            id: Uuid::new_v4(),
            is_staff: true,
        };
        let regular = Viewer::Authenticated {
            id: Uuid::new_v4(),
            is_staff: false,
        };

        assert_eq!(
            authorizer.authorize(staff, &post, Action::Delete),
            Decision::Allowed
        );
        assert_eq!(
            authorizer.authorize(regular, &post, Action::Delete),
            Decision::DeniedNotOwner
        );
    }

    #[test]
    fn denials_map_to_domain_errors() {
        assert!(matches!(
            Decision::DeniedUnauthenticated.into_result(),
            Err(DomainError::DeniedUnauthenticated)
        ));
        assert!(matches!(
            Decision::DeniedNotOwner.into_result(),
            Err(DomainError::DeniedNotOwner)
        ));
        assert!(Decision::Allowed.into_result().is_ok());
    }
}
