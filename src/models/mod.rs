//! Domain models

pub mod post;

pub use post::{NewPost, Post, PostChanges, PostMeta, PostStatus};
