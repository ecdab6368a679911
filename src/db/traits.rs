//! Database abstraction traits
//!
//! This module provides the `DatabaseClient` trait that abstracts over the
//! storage behind the API (in-memory SQLite or a local SQLite file via libsql).
//!
//! # Example
//!
//! ```rust,ignore
//! use booking::db::DatabaseProvider;
//!
//! // Use in-memory database (default for development/testing)
//! let db = DatabaseProvider::Memory.create_client().await?;
//!
//! // Use file-based SQLite
//! let db = DatabaseProvider::SQLite { path: "data/booking.db".into() }.create_client().await?;
//! ```

use crate::types::{Event, EventRequest, Registration, Result};
use async_trait::async_trait;
use std::sync::Arc;

/// Database provider configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DatabaseProvider {
    /// In-memory SQLite database (ephemeral, lost on restart)
    #[default]
    Memory,
    /// File-based SQLite database
    SQLite {
        /// Path to the SQLite database file
        path: String,
    },
}

impl DatabaseProvider {
    /// Pick a provider from a configured database URL.
    ///
    /// `:memory:` and the empty string select the in-memory database; anything
    /// else is treated as a file path (an optional `file:` prefix is stripped).
    pub fn from_url(url: &str) -> Self {
        let url = url.trim();
        if url.is_empty() || url == ":memory:" {
            return DatabaseProvider::Memory;
        }

        let path = url.strip_prefix("file:").unwrap_or(url);
        DatabaseProvider::SQLite {
            path: path.to_string(),
        }
    }

    /// Create a database client from this provider configuration
    pub async fn create_client(&self) -> Result<Arc<dyn DatabaseClient>> {
        match self {
            DatabaseProvider::Memory => {
                let client = super::turso::TursoClient::new_memory().await?;
                Ok(Arc::new(client))
            }
            DatabaseProvider::SQLite { path } => {
                let client = super::turso::TursoClient::new_local(path).await?;
                Ok(Arc::new(client))
            }
        }
    }
}

/// Stored user credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub email: String,
    /// Self-describing password digest (PHC string)
    pub password_hash: String,
}

/// Abstract trait for database operations
///
/// Implementations own the schema; the auth core only ever sees digests it
/// produced itself or reads back through `get_user_by_email`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DatabaseClient: Send + Sync {
    // ============== User Operations ==============

    /// Create a new user and return its id.
    ///
    /// Fails with `AppError::Conflict` if the email is already registered.
    async fn create_user(&self, email: &str, password_hash: &str) -> Result<i64>;

    /// Get a user by email
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;

    // ============== Event Operations ==============

    /// List every event, oldest id first
    async fn list_events(&self) -> Result<Vec<Event>>;

    /// Get a single event
    async fn get_event(&self, id: i64) -> Result<Option<Event>>;

    /// Create an event owned by `user_id`
    async fn create_event(&self, user_id: i64, event: &EventRequest) -> Result<Event>;

    /// Replace the editable fields of an event
    async fn update_event(&self, id: i64, event: &EventRequest) -> Result<()>;

    /// Delete an event together with its registrations
    async fn delete_event(&self, id: i64) -> Result<()>;

    // ============== Registration Operations ==============

    /// Register a user for an event
    async fn register_for_event(&self, event_id: i64, user_id: i64) -> Result<Registration>;

    /// Cancel a registration; returns whether one existed
    async fn cancel_registration(&self, event_id: i64, user_id: i64) -> Result<bool>;
}
