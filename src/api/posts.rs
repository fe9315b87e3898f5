//! Post write endpoints
//!
//! Handles HTTP requests for the two gated write operations:
//! - POST /posts-create - Create a new post
//! - POST /posts-update - Partially update an owned post
//!
//! Required fields are modeled as optional here and validated in the
//! service, so a missing title or slug produces the documented
//! `{"error": ...}` body instead of a deserialization failure.

use axum::{extract::State, Extension, Json};
use serde::Deserialize;
use uuid::Uuid;

use crate::api::middleware::{ApiError, ApiJson, AppState, AuthenticatedUser};
use crate::api::responses::{CreatePostResponse, UpdatePostResponse};
use crate::models::PostStatus;
use crate::services::post::{CreatePostInput, UpdatePostInput};

/// Request body for POST /posts-create
#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub status: Option<PostStatus>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub category_ids: Option<Vec<Uuid>>,
}

impl From<CreatePostRequest> for CreatePostInput {
    fn from(req: CreatePostRequest) -> Self {
        Self {
            title: req.title.unwrap_or_default(),
            content: req.content,
            slug: req.slug.unwrap_or_default(),
            status: req.status,
            tags: req.tags,
            category_ids: req.category_ids,
        }
    }
}

/// Request body for POST /posts-update
#[derive(Debug, Deserialize)]
pub struct UpdatePostRequest {
    #[serde(default)]
    pub id: Option<Uuid>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub status: Option<PostStatus>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub category_ids: Option<Vec<Uuid>>,
}

impl From<UpdatePostRequest> for UpdatePostInput {
    fn from(req: UpdatePostRequest) -> Self {
        Self {
            id: req.id,
            title: req.title,
            content: req.content,
            slug: req.slug,
            status: req.status,
            tags: req.tags,
            category_ids: req.category_ids,
        }
    }
}

/// POST /posts-create - Create a new post owned by the caller
pub async fn create_post_handler(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(user_id)): Extension<AuthenticatedUser>,
    ApiJson(request): ApiJson<CreatePostRequest>,
) -> Result<Json<CreatePostResponse>, ApiError> {
    let post = state.post_service.create(user_id, request.into()).await?;

    Ok(Json(CreatePostResponse {
        success: true,
        post: post.into(),
    }))
}

/// POST /posts-update - Partially update a post owned by the caller
pub async fn update_post_handler(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(user_id)): Extension<AuthenticatedUser>,
    ApiJson(request): ApiJson<UpdatePostRequest>,
) -> Result<Json<UpdatePostResponse>, ApiError> {
    state.post_service.update(user_id, request.into()).await?;

    Ok(Json(UpdatePostResponse { success: true }))
}
