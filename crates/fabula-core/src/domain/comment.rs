use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Comment entity - a reply attached to one post.
///
/// Author and post are immutable; a comment cannot outlive its post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub text: String,
    pub author_id: Uuid,
    pub post_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl Comment {
    pub fn new(author_id: Uuid, post_id: Uuid, text: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            text,
            author_id,
            post_id,
            created_at: Utc::now(),
        }
    }
}
