//! Post-category association repository
//!
//! The `post_categories` join table is only ever replaced wholesale
//! (delete-all-then-insert); it is never patched incrementally. No
//! transaction wraps the two steps at this layer.

use anyhow::Result;
use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

/// Post-category association repository trait
#[async_trait]
pub trait PostCategoryRepository: Send + Sync {
    /// Insert association rows linking a post to each given category
    async fn insert_many(&self, post_id: Uuid, category_ids: &[Uuid]) -> Result<()>;

    /// Remove every association for a post
    async fn delete_for_post(&self, post_id: Uuid) -> Result<()>;
}

/// sqlx-based association repository
pub struct PgPostCategoryRepository {
    pool: PgPool,
}

impl PgPostCategoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: PgPool) -> Arc<dyn PostCategoryRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl PostCategoryRepository for PgPostCategoryRepository {
    async fn insert_many(&self, post_id: Uuid, category_ids: &[Uuid]) -> Result<()> {
        sqlx::query(
            "INSERT INTO post_categories (post_id, category_id) SELECT $1, unnest($2::uuid[])",
        )
        .bind(post_id)
        .bind(category_ids)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete_for_post(&self, post_id: Uuid) -> Result<()> {
        sqlx::query("DELETE FROM post_categories WHERE post_id = $1")
            .bind(post_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
