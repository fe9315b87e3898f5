//! Business logic services

pub mod identity;
pub mod post;
pub mod sanitize;

pub use identity::{HttpIdentityVerifier, IdentityVerifier};
pub use post::{CreatePostInput, PostService, PostServiceError, UpdatePostInput};
pub use sanitize::{normalize_slug, Sanitizer};
