//! Shared API response types
//!
//! Wire shapes match the documented contract: successes carry
//! `{"success": true, ...}`, failures carry `{"error": "<message>"}`.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::Post;

/// Full post payload returned by the create endpoint
#[derive(Debug, Serialize, Deserialize)]
pub struct PostResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub content: Option<String>,
    pub slug: String,
    pub status: String,
    pub published: bool,
    pub tags: Option<Vec<String>>,
    pub view_count: i64,
    pub published_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Post> for PostResponse {
    fn from(post: Post) -> Self {
        Self {
            id: post.id,
            user_id: post.user_id,
            title: post.title,
            content: post.content,
            slug: post.slug,
            status: post.status.to_string(),
            published: post.published,
            tags: post.tags,
            view_count: post.view_count,
            published_at: post.published_at.map(|dt| dt.to_rfc3339()),
            created_at: post.created_at.to_rfc3339(),
            updated_at: post.updated_at.to_rfc3339(),
        }
    }
}

/// Response for a successful create
#[derive(Debug, Serialize, Deserialize)]
pub struct CreatePostResponse {
    pub success: bool,
    pub post: PostResponse,
}

/// Response for a successful update
#[derive(Debug, Serialize, Deserialize)]
pub struct UpdatePostResponse {
    pub success: bool,
}

/// Error response body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
