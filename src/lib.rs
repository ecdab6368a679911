//! # booking-server
//!
//! An event booking REST API. Users sign up and log in; anyone can browse
//! events, while creating, editing, deleting and registering for events
//! requires a bearer token.
//!
//! ## Overview
//!
//! The crate can be used in two ways:
//!
//! 1. **As a standalone server** - Run the `booking-server` binary
//! 2. **As a library** - Build the router with [`create_app`] and mount it
//!    in your own axum application
//!
//! ### Basic Example
//!
//! ```rust,ignore
//! use booking::{auth::{PasswordHasher, TokenService}, db::DatabaseProvider, AppState};
//! use std::sync::Arc;
//!
//! let state = AppState {
//!     db: DatabaseProvider::Memory.create_client().await?,
//!     password_hasher: Arc::new(PasswordHasher::new()?),
//!     token_service: Arc::new(TokenService::new(&secret)?),
//! };
//! let app = booking::create_app(state);
//! ```
//!
//! ## Modules
//!
//! - [`api`] - REST API handlers and routes
//! - [`auth`] - Password hashing, tokens and the request gate
//! - [`db`] - libsql storage
//! - [`types`] - Request/response types and error handling
//! - [`utils`] - Configuration

#![warn(rustdoc::missing_crate_level_docs)]

/// HTTP API handlers and routes.
pub mod api;
/// Password hashing, token service and authentication middleware.
pub mod auth;
/// Database clients.
pub mod db;
/// Core types (requests, responses, errors).
pub mod types;
/// Configuration utilities.
pub mod utils;

// Re-export commonly used types
pub use auth::{PasswordHasher, TokenService};
pub use db::{DatabaseClient, DatabaseProvider};
pub use types::{AppError, Result};
pub use utils::toml_config::{BookingConfig, ConfigError};

use axum::{routing::get, Json, Router};
use std::sync::Arc;
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};
use utoipa::OpenApi;

/// Largest request body accepted, in bytes.
const MAX_BODY_BYTES: usize = 64 * 1024;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Storage for users, events and registrations
    pub db: Arc<dyn DatabaseClient>,
    /// Argon2id password hasher
    pub password_hasher: Arc<PasswordHasher>,
    /// Token issuance and verification
    pub token_service: Arc<TokenService>,
}

/// Builds the complete HTTP application around `state`.
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route(
            "/api-docs/openapi.json",
            get(|| async { Json(api::ApiDoc::openapi()) }),
        )
        .merge(api::routes::create_router(state.token_service.clone()))
        .with_state(state)
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
}
