//! API middleware
//!
//! Contains the shared application state, the wire-level error type, and the
//! authentication middleware that gates every write endpoint.

use axum::{
    extract::{rejection::JsonRejection, FromRequest, Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::api::responses::ErrorBody;
use crate::services::identity::IdentityVerifier;
use crate::services::post::{PostService, PostServiceError};

/// Application state containing shared services
///
/// Handlers receive their collaborators through this state rather than
/// constructing clients at load time; tests swap in in-memory
/// implementations behind the same trait objects.
#[derive(Clone)]
pub struct AppState {
    pub post_service: Arc<PostService>,
    pub identity: Arc<dyn IdentityVerifier>,
}

/// Authenticated user extracted from the request
#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedUser(pub Uuid);

/// Error response for API errors
///
/// Serialized as `{"error": "<message>"}` with the matching status code.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

/// Json extractor whose rejection keeps the `{"error": ...}` wire shape
///
/// The default `Json` rejection answers malformed bodies with plain text;
/// routing it through `ApiError` keeps every failure on the documented
/// contract.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl From<PostServiceError> for ApiError {
    fn from(err: PostServiceError) -> Self {
        match err {
            PostServiceError::BadRequest(_) => Self::bad_request(err.to_string()),
            PostServiceError::NotOwner => Self::forbidden(err.to_string()),
            PostServiceError::NotFound => Self::not_found(err.to_string()),
            // Store write failures surface as 400 with the store's message
            PostServiceError::Upstream(message) => Self::bad_request(message),
            PostServiceError::Internal(e) => Self::internal(e.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorBody {
                error: self.message,
            }),
        )
            .into_response()
    }
}

/// Extract the bearer token from the Authorization header
fn extract_bearer_token(request: &Request) -> Option<String> {
    let auth_header = request.headers().get(header::AUTHORIZATION)?;
    let auth_str = auth_header.to_str().ok()?;
    auth_str.strip_prefix("Bearer ").map(|token| token.to_string())
}

/// Authentication middleware
///
/// Resolves the bearer token against the identity service and stashes the
/// resulting user id in request extensions. A failed verification is
/// terminal for the request; nothing is retried.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer_token(&request)
        .ok_or_else(|| ApiError::unauthorized("Missing authorization header"))?;

    let user_id = match state.identity.verify(&token).await {
        Ok(Some(user_id)) => user_id,
        Ok(None) => return Err(ApiError::unauthorized("Unauthorized")),
        Err(e) => {
            tracing::warn!(error = %e, "identity verification failed");
            return Err(ApiError::unauthorized("Unauthorized"));
        }
    };

    request.extensions_mut().insert(AuthenticatedUser(user_id));
    Ok(next.run(request).await)
}
