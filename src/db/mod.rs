//! Database layer
//!
//! The relational schema itself (tables, constraints, row-level security) is
//! owned by the backing platform; this layer only holds the connection pool
//! and the repositories that write through it.

pub mod pool;
pub mod repositories;

pub use pool::create_pool;
