//! Post model
//!
//! This module provides:
//! - `Post` entity representing a stored blog post
//! - `PostStatus` enum for publication states
//! - `NewPost` / `PostChanges` write payloads for the repository layer
//! - `PostMeta` projection used by the ownership check

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Post entity
///
/// Rows live in the externally managed `posts` table; this service only
/// writes them through the sanitization gate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    /// Unique identifier
    pub id: Uuid,
    /// Owning user. Set once at creation, never transferred.
    pub user_id: Uuid,
    /// Plain-text title (no markup survives sanitization)
    pub title: String,
    /// Restricted-HTML body, absent when the post has no content
    pub content: Option<String>,
    /// URL-safe slug; uniqueness is enforced by the store
    pub slug: String,
    /// Publication status
    pub status: PostStatus,
    /// Denormalized `status == published` flag kept by the write path
    pub published: bool,
    /// Plain-text tag tokens
    pub tags: Option<Vec<String>>,
    /// View count, maintained elsewhere
    #[serde(default)]
    pub view_count: i64,
    /// Set on the first transition to published, never cleared
    pub published_at: Option<DateTime<Utc>>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

/// Post publication status
///
/// The only modeled transition is `draft -> published`, a one-way latch:
/// `published_at` is set on the first transition and never cleared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    /// Draft - not visible to public
    #[default]
    Draft,
    /// Published - visible to public
    Published,
}

impl PostStatus {
    /// Convert status to database string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            PostStatus::Draft => "draft",
            PostStatus::Published => "published",
        }
    }

    /// Parse status from database string representation
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "draft" => Some(PostStatus::Draft),
            "published" => Some(PostStatus::Published),
            _ => None,
        }
    }
}

impl std::fmt::Display for PostStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Insert payload for a new post
///
/// All text fields are already sanitized by the time this is built; the
/// repository layer never re-checks them.
#[derive(Debug, Clone)]
pub struct NewPost {
    /// Owning user
    pub user_id: Uuid,
    /// Sanitized plain-text title
    pub title: String,
    /// Sanitized restricted-HTML content
    pub content: Option<String>,
    /// Normalized slug
    pub slug: String,
    /// Requested status (defaults to draft)
    pub status: PostStatus,
    /// `status == published`
    pub published: bool,
    /// Sanitized tag tokens
    pub tags: Option<Vec<String>>,
    /// Set when the post is created already published
    pub published_at: Option<DateTime<Utc>>,
}

/// Partial update payload
///
/// `None` means "leave the column untouched"; only fields explicitly present
/// in the request make it in here. `content` carries a second `Option` so a
/// request can clear the body back to null.
#[derive(Debug, Clone)]
pub struct PostChanges {
    pub title: Option<String>,
    pub content: Option<Option<String>>,
    pub slug: Option<String>,
    pub status: Option<PostStatus>,
    pub published: Option<bool>,
    pub published_at: Option<DateTime<Utc>>,
    pub tags: Option<Vec<String>>,
    /// Always written, even when no other field changed
    pub updated_at: DateTime<Utc>,
}

impl PostChanges {
    /// Create an empty change set stamped with the given update time
    pub fn new(updated_at: DateTime<Utc>) -> Self {
        Self {
            title: None,
            content: None,
            slug: None,
            status: None,
            published: None,
            published_at: None,
            tags: None,
            updated_at,
        }
    }
}

/// Projection loaded before mutating a post: enough to enforce ownership and
/// the `published_at` latch without fetching the whole row.
#[derive(Debug, Clone, Copy)]
pub struct PostMeta {
    pub user_id: Uuid,
    pub published_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        assert_eq!(PostStatus::from_str("draft"), Some(PostStatus::Draft));
        assert_eq!(PostStatus::from_str("published"), Some(PostStatus::Published));
        assert_eq!(PostStatus::from_str("Published"), Some(PostStatus::Published));
        assert_eq!(PostStatus::from_str("archived"), None);
        assert_eq!(PostStatus::Draft.as_str(), "draft");
        assert_eq!(PostStatus::Published.to_string(), "published");
    }

    #[test]
    fn test_status_default_is_draft() {
        assert_eq!(PostStatus::default(), PostStatus::Draft);
    }

    #[test]
    fn test_status_serde_lowercase() {
        let json = serde_json::to_string(&PostStatus::Published).unwrap();
        assert_eq!(json, "\"published\"");
        let back: PostStatus = serde_json::from_str("\"draft\"").unwrap();
        assert_eq!(back, PostStatus::Draft);
    }
}
