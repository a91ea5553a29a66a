use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Post entity - a content item with a scheduled publish time.
///
/// `author_id` is set exactly once, at creation, and never reassigned.
/// A post with `pub_date` in the future stays hidden from everyone but
/// its author until the date passes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub text: String,
    pub image_ref: Option<String>,
    pub pub_date: DateTime<Utc>,
    pub is_published: bool,
    pub author_id: Uuid,
    pub category_id: Option<Uuid>,
    pub location_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl Post {
    /// Create a new post owned by `author_id`.
    ///
    /// Starts unpublished and untagged; authoring sets the optional
    /// fields before the first save.
    pub fn new(author_id: Uuid, title: String, text: String, pub_date: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title,
            text,
            image_ref: None,
            pub_date,
            is_published: false,
            author_id,
            category_id: None,
            location_id: None,
            created_at: Utc::now(),
        }
    }
}
