//! Postgate - sanitizing write gate for blog posts
//!
//! The only component allowed to create or mutate posts on behalf of users:
//! bearer tokens are verified against an external identity service, text
//! fields pass through allow-list HTML sanitization and slug normalization,
//! ownership is enforced before any mutation, and category associations are
//! relinked with a compensating delete on the create path.

pub mod api;
pub mod config;
pub mod db;
pub mod models;
pub mod services;
pub mod testing;
