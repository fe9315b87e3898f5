//! Data access repositories
//!
//! Each repository is a trait defining the data-access interface, plus a
//! `Pg*` implementation backed by sqlx. Services depend on the traits only,
//! so tests can substitute in-memory implementations.

pub mod post;
pub mod post_category;

pub use post::{PgPostRepository, PostRepository};
pub use post_category::{PgPostCategoryRepository, PostCategoryRepository};
