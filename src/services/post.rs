//! Post write service
//!
//! Implements the sanitization-and-authorization gate for post writes:
//! - required-field validation on create
//! - allow-list sanitization of title, content, and tags
//! - slug normalization
//! - ownership enforcement before any mutation on the update path
//! - the `published_at` one-way latch
//! - category relinking, with a compensating delete on the create path so a
//!   failed link insert never leaves an orphan post behind
//!
//! Every call into the store is awaited sequentially; a request is a short
//! linear chain with no fan-out and no retries.

use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use crate::db::repositories::{PostCategoryRepository, PostRepository};
use crate::models::{NewPost, Post, PostChanges, PostStatus};
use crate::services::sanitize::{normalize_slug, Sanitizer};

/// Error types for post write operations
#[derive(Debug, thiserror::Error)]
pub enum PostServiceError {
    /// Missing or invalid request fields
    #[error("{0}")]
    BadRequest(String),

    /// Caller does not own the target post
    #[error("Forbidden: You can only update your own posts")]
    NotOwner,

    /// Target post does not exist
    #[error("Post not found")]
    NotFound,

    /// The data store rejected a write; the store's message passes through
    #[error("{0}")]
    Upstream(String),

    /// Anything else
    #[error("{0}")]
    Internal(#[from] anyhow::Error),
}

/// Input for creating a post
///
/// Fields arrive untrusted and unsanitized; missing required fields are
/// rejected here rather than at deserialization so the error response keeps
/// the documented shape.
#[derive(Debug, Clone, Default)]
pub struct CreatePostInput {
    pub title: String,
    pub content: Option<String>,
    pub slug: String,
    pub status: Option<PostStatus>,
    pub tags: Option<Vec<String>>,
    pub category_ids: Option<Vec<Uuid>>,
}

/// Input for updating a post
///
/// Partial semantics: `None` fields are left untouched. An empty `content`
/// string clears the body to null; an empty `category_ids` list removes
/// every association.
#[derive(Debug, Clone, Default)]
pub struct UpdatePostInput {
    pub id: Option<Uuid>,
    pub title: Option<String>,
    pub content: Option<String>,
    pub slug: Option<String>,
    pub status: Option<PostStatus>,
    pub tags: Option<Vec<String>>,
    pub category_ids: Option<Vec<Uuid>>,
}

/// Post write service
pub struct PostService {
    posts: Arc<dyn PostRepository>,
    links: Arc<dyn PostCategoryRepository>,
    sanitizer: Sanitizer,
}

impl PostService {
    /// Create a new post service
    pub fn new(posts: Arc<dyn PostRepository>, links: Arc<dyn PostCategoryRepository>) -> Self {
        Self {
            posts,
            links,
            sanitizer: Sanitizer::new(),
        }
    }

    /// Create a post owned by `author_id`.
    ///
    /// All-or-nothing from the caller's perspective: if category linking
    /// fails after the insert, the just-created post is deleted and the
    /// link error is reported.
    ///
    /// # Errors
    /// - `BadRequest` if title or slug is missing or empty
    /// - `Upstream` if the store rejects the insert or the link insert
    pub async fn create(
        &self,
        author_id: Uuid,
        input: CreatePostInput,
    ) -> Result<Post, PostServiceError> {
        if input.title.trim().is_empty() || input.slug.trim().is_empty() {
            return Err(PostServiceError::BadRequest(
                "Title and slug are required".to_string(),
            ));
        }

        let status = input.status.unwrap_or_default();
        let published = status == PostStatus::Published;

        let new_post = NewPost {
            user_id: author_id,
            title: self.sanitizer.clean_plain(&input.title),
            content: input
                .content
                .filter(|content| !content.is_empty())
                .map(|content| self.sanitizer.clean_rich(&content)),
            slug: normalize_slug(&input.slug),
            status,
            published,
            tags: input.tags.map(|tags| self.sanitizer.clean_tags(&tags)),
            published_at: published.then(Utc::now),
        };

        let post = self
            .posts
            .insert(&new_post)
            .await
            .map_err(|e| PostServiceError::Upstream(e.to_string()))?;

        if let Some(category_ids) = input.category_ids.filter(|ids| !ids.is_empty()) {
            if let Err(link_err) = self.links.insert_many(post.id, &category_ids).await {
                // Compensating action: no orphan post may survive a failed link
                if let Err(delete_err) = self.posts.delete(post.id).await {
                    tracing::error!(
                        post_id = %post.id,
                        error = %delete_err,
                        "failed to delete post after category link failure"
                    );
                }
                return Err(PostServiceError::Upstream(link_err.to_string()));
            }
        }

        Ok(post)
    }

    /// Update a post owned by `caller_id`.
    ///
    /// The ownership check runs before any field is touched. When
    /// `category_ids` is present the association set is replaced wholesale:
    /// delete everything, then insert the new set (skipped when empty). No
    /// compensating rollback exists on this path; a link failure after the
    /// field update leaves the fields updated.
    ///
    /// # Errors
    /// - `BadRequest` if the post id is missing
    /// - `NotFound` if the post does not exist
    /// - `NotOwner` if the stored owner differs from the caller
    /// - `Upstream` if the store rejects the update or relink
    pub async fn update(
        &self,
        caller_id: Uuid,
        input: UpdatePostInput,
    ) -> Result<(), PostServiceError> {
        let id = input
            .id
            .ok_or_else(|| PostServiceError::BadRequest("Post ID is required".to_string()))?;

        let meta = self
            .posts
            .get_meta(id)
            .await
            .map_err(|e| {
                tracing::warn!(post_id = %id, error = %e, "failed to load post for ownership check");
                PostServiceError::NotFound
            })?
            .ok_or(PostServiceError::NotFound)?;

        if meta.user_id != caller_id {
            return Err(PostServiceError::NotOwner);
        }

        let mut changes = PostChanges::new(Utc::now());

        if let Some(title) = input.title {
            changes.title = Some(self.sanitizer.clean_plain(&title));
        }
        if let Some(content) = input.content {
            changes.content = Some(if content.is_empty() {
                None
            } else {
                Some(self.sanitizer.clean_rich(&content))
            });
        }
        if let Some(slug) = input.slug {
            changes.slug = Some(normalize_slug(&slug));
        }
        if let Some(status) = input.status {
            changes.status = Some(status);
            changes.published = Some(status == PostStatus::Published);
            // One-way latch: set on the first transition to published only
            if status == PostStatus::Published && meta.published_at.is_none() {
                changes.published_at = Some(changes.updated_at);
            }
        }
        if let Some(tags) = input.tags {
            changes.tags = Some(self.sanitizer.clean_tags(&tags));
        }

        self.posts
            .update(id, &changes)
            .await
            .map_err(|e| PostServiceError::Upstream(e.to_string()))?;

        if let Some(category_ids) = input.category_ids {
            self.links
                .delete_for_post(id)
                .await
                .map_err(|e| PostServiceError::Upstream(e.to_string()))?;

            if !category_ids.is_empty() {
                self.links
                    .insert_many(id, &category_ids)
                    .await
                    .map_err(|e| PostServiceError::Upstream(e.to_string()))?;
            }
        }

        Ok(())
    }
}
