use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Category entity - administrator-controlled classification for posts.
///
/// An unpublished category hides every post inside it from non-owners,
/// and its listing page behaves as if the category did not exist.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub description: String,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
}

impl Category {
    pub fn new(slug: String, title: String, description: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            slug,
            title,
            description,
            is_published: true,
            created_at: Utc::now(),
        }
    }
}
