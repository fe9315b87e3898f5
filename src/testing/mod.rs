//! Test support
//!
//! In-memory implementations of the repository and identity traits, used by
//! the unit and handler test suites. They live behind the same seams as the
//! production `Pg*` / HTTP implementations, so tests exercise the real
//! service and handler code paths without a database or identity service.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use uuid::Uuid;

use crate::db::repositories::{PostCategoryRepository, PostRepository};
use crate::models::{NewPost, Post, PostChanges, PostMeta, PostStatus};
use crate::services::identity::IdentityVerifier;

/// In-memory post store
#[derive(Default)]
pub struct MemoryPostRepository {
    posts: Mutex<HashMap<Uuid, Post>>,
    writes: AtomicUsize,
    fail_message: Mutex<Option<String>>,
}

impl MemoryPostRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an existing post, bypassing the write counter
    pub fn seed(&self, post: Post) {
        self.posts.lock().unwrap().insert(post.id, post);
    }

    /// Fetch a stored post by id
    pub fn get(&self, id: Uuid) -> Option<Post> {
        self.posts.lock().unwrap().get(&id).cloned()
    }

    /// Number of stored posts
    pub fn len(&self) -> usize {
        self.posts.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of insert/update/delete calls made against this store
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Make every subsequent write fail with exactly this message
    pub fn fail_writes(&self, message: impl Into<String>) {
        *self.fail_message.lock().unwrap() = Some(message.into());
    }

    fn check_write_failure(&self) -> Result<()> {
        match self.fail_message.lock().unwrap().as_deref() {
            Some(message) => Err(anyhow!("{message}")),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl PostRepository for MemoryPostRepository {
    async fn insert(&self, post: &NewPost) -> Result<Post> {
        self.check_write_failure()?;
        self.writes.fetch_add(1, Ordering::SeqCst);
        let now = Utc::now();
        let stored = Post {
            id: Uuid::new_v4(),
            user_id: post.user_id,
            title: post.title.clone(),
            content: post.content.clone(),
            slug: post.slug.clone(),
            status: post.status,
            published: post.published,
            tags: post.tags.clone(),
            view_count: 0,
            published_at: post.published_at,
            created_at: now,
            updated_at: now,
        };
        self.posts.lock().unwrap().insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn get_meta(&self, id: Uuid) -> Result<Option<PostMeta>> {
        Ok(self.posts.lock().unwrap().get(&id).map(|post| PostMeta {
            user_id: post.user_id,
            published_at: post.published_at,
        }))
    }

    async fn update(&self, id: Uuid, changes: &PostChanges) -> Result<()> {
        self.check_write_failure()?;
        self.writes.fetch_add(1, Ordering::SeqCst);
        let mut posts = self.posts.lock().unwrap();
        // Updating a missing row affects zero rows; not an error
        if let Some(post) = posts.get_mut(&id) {
            post.updated_at = changes.updated_at;
            if let Some(ref title) = changes.title {
                post.title = title.clone();
            }
            if let Some(ref content) = changes.content {
                post.content = content.clone();
            }
            if let Some(ref slug) = changes.slug {
                post.slug = slug.clone();
            }
            if let Some(status) = changes.status {
                post.status = status;
            }
            if let Some(published) = changes.published {
                post.published = published;
            }
            if let Some(published_at) = changes.published_at {
                post.published_at = Some(published_at);
            }
            if let Some(ref tags) = changes.tags {
                post.tags = Some(tags.clone());
            }
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        self.check_write_failure()?;
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.posts.lock().unwrap().remove(&id);
        Ok(())
    }
}

/// In-memory post-category association store with failure injection
#[derive(Default)]
pub struct MemoryPostCategoryRepository {
    links: Mutex<Vec<(Uuid, Uuid)>>,
    fail_inserts: AtomicBool,
}

impl MemoryPostCategoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `insert_many` fail
    pub fn fail_inserts(&self) {
        self.fail_inserts.store(true, Ordering::SeqCst);
    }

    /// Category ids currently linked to a post
    pub fn links_for(&self, post_id: Uuid) -> Vec<Uuid> {
        self.links
            .lock()
            .unwrap()
            .iter()
            .filter(|(post, _)| *post == post_id)
            .map(|(_, category)| *category)
            .collect()
    }
}

#[async_trait]
impl PostCategoryRepository for MemoryPostCategoryRepository {
    async fn insert_many(&self, post_id: Uuid, category_ids: &[Uuid]) -> Result<()> {
        if self.fail_inserts.load(Ordering::SeqCst) {
            return Err(anyhow!("category link insert failed"));
        }
        let mut links = self.links.lock().unwrap();
        for category_id in category_ids {
            links.push((post_id, *category_id));
        }
        Ok(())
    }

    async fn delete_for_post(&self, post_id: Uuid) -> Result<()> {
        self.links.lock().unwrap().retain(|(post, _)| *post != post_id);
        Ok(())
    }
}

/// Identity verifier that accepts exactly one token
pub struct StaticTokenVerifier {
    token: String,
    user_id: Uuid,
}

impl StaticTokenVerifier {
    pub fn new(token: impl Into<String>, user_id: Uuid) -> Self {
        Self {
            token: token.into(),
            user_id,
        }
    }
}

#[async_trait]
impl IdentityVerifier for StaticTokenVerifier {
    async fn verify(&self, token: &str) -> Result<Option<Uuid>> {
        if token == self.token {
            Ok(Some(self.user_id))
        } else {
            Ok(None)
        }
    }
}

/// Build a draft post owned by the given user, for seeding stores
pub fn sample_post(owner: Uuid) -> Post {
    let now = Utc::now();
    Post {
        id: Uuid::new_v4(),
        user_id: owner,
        title: "Sample".to_string(),
        content: Some("<p>body</p>".to_string()),
        slug: "sample".to_string(),
        status: PostStatus::Draft,
        published: false,
        tags: None,
        view_count: 0,
        published_at: None,
        created_at: now,
        updated_at: now,
    }
}
