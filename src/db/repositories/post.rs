//! Post repository
//!
//! Database operations for the `posts` table. Updates carry partial change
//! sets, so the UPDATE statement is assembled dynamically: only columns
//! explicitly present in the change set are written.
//!
//! Write errors are returned unwrapped; the driver's message reaches the
//! client verbatim.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, QueryBuilder, Row};
use std::sync::Arc;
use uuid::Uuid;

use crate::models::{NewPost, Post, PostChanges, PostMeta, PostStatus};

/// Post repository trait
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Insert a new post and return the stored row
    async fn insert(&self, post: &NewPost) -> Result<Post>;

    /// Load the ownership/latch projection for a post
    async fn get_meta(&self, id: Uuid) -> Result<Option<PostMeta>>;

    /// Apply a partial change set to a post
    async fn update(&self, id: Uuid, changes: &PostChanges) -> Result<()>;

    /// Delete a post (used as the create-path compensating action)
    async fn delete(&self, id: Uuid) -> Result<()>;
}

/// sqlx-based post repository
pub struct PgPostRepository {
    pool: PgPool,
}

impl PgPostRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: PgPool) -> Arc<dyn PostRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl PostRepository for PgPostRepository {
    async fn insert(&self, post: &NewPost) -> Result<Post> {
        let row = sqlx::query(
            r#"
            INSERT INTO posts (user_id, title, content, slug, status, published, tags, published_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, user_id, title, content, slug, status, published, tags,
                      view_count, published_at, created_at, updated_at
            "#,
        )
        .bind(post.user_id)
        .bind(&post.title)
        .bind(&post.content)
        .bind(&post.slug)
        .bind(post.status.as_str())
        .bind(post.published)
        .bind(&post.tags)
        .bind(post.published_at)
        .fetch_one(&self.pool)
        .await?;

        map_post(&row)
    }

    async fn get_meta(&self, id: Uuid) -> Result<Option<PostMeta>> {
        let row = sqlx::query("SELECT user_id, published_at FROM posts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to load post")?;

        Ok(row
            .map(|row| -> Result<PostMeta> {
                Ok(PostMeta {
                    user_id: row.try_get("user_id")?,
                    published_at: row.try_get("published_at")?,
                })
            })
            .transpose()?)
    }

    async fn update(&self, id: Uuid, changes: &PostChanges) -> Result<()> {
        let mut query: QueryBuilder<sqlx::Postgres> =
            QueryBuilder::new("UPDATE posts SET updated_at = ");
        query.push_bind(changes.updated_at);

        if let Some(ref title) = changes.title {
            query.push(", title = ").push_bind(title.clone());
        }
        if let Some(ref content) = changes.content {
            query.push(", content = ").push_bind(content.clone());
        }
        if let Some(ref slug) = changes.slug {
            query.push(", slug = ").push_bind(slug.clone());
        }
        if let Some(status) = changes.status {
            query.push(", status = ").push_bind(status.as_str());
        }
        if let Some(published) = changes.published {
            query.push(", published = ").push_bind(published);
        }
        if let Some(published_at) = changes.published_at {
            query.push(", published_at = ").push_bind(published_at);
        }
        if let Some(ref tags) = changes.tags {
            query.push(", tags = ").push_bind(tags.clone());
        }

        query.push(" WHERE id = ").push_bind(id);

        query.build().execute(&self.pool).await?;

        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

/// Map a database row to a `Post`
fn map_post(row: &PgRow) -> Result<Post> {
    let status: String = row.try_get("status")?;
    let status = PostStatus::from_str(&status)
        .ok_or_else(|| anyhow!("Unknown post status in database: {}", status))?;

    Ok(Post {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        title: row.try_get("title")?,
        content: row.try_get("content")?,
        slug: row.try_get("slug")?,
        status,
        published: row.try_get("published")?,
        tags: row.try_get("tags")?,
        view_count: row.try_get("view_count")?,
        published_at: row.try_get("published_at")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}
