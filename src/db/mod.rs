//! Relational storage for users, events and registrations.
//!
//! Backed by libsql, either in memory or as a local SQLite file. Handlers only
//! see the [`DatabaseClient`] trait.

pub mod traits;
pub mod turso;

// Re-exports
pub use traits::{DatabaseClient, DatabaseProvider, User};
pub use turso::TursoClient;
