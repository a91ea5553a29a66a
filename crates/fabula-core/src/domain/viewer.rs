use uuid::Uuid;

/// The acting identity for an operation.
///
/// Every core call takes the viewer explicitly; there is no ambient
/// "current user" anywhere in this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Viewer {
    Anonymous,
    Authenticated { id: Uuid, is_staff: bool },
}

impl Viewer {
    pub fn account_id(&self) -> Option<Uuid> {
        match self {
            Viewer::Anonymous => None,
            Viewer::Authenticated { id, .. } => Some(*id),
        }
    }

    pub fn is_staff(&self) -> bool {
        matches!(self, Viewer::Authenticated { is_staff: true, .. })
    }

    /// Whether this viewer is the account identified by `author_id`.
    pub fn owns(&self, author_id: Uuid) -> bool {
        self.account_id() == Some(author_id)
    }
}
