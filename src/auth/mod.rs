//! Credential and session management
//!
//! # Module Structure
//!
//! - [`auth::password`](crate::auth::password) - Argon2id password hashing and verification
//! - [`auth::jwt`](crate::auth::jwt) - HS256 token issuance and verification
//! - [`auth::middleware`](crate::auth::middleware) - Axum gate and identity extractor for protected routes
//!
//! # Security Features
//!
//! - **Password Hashing**: Argon2id with a fresh random salt per digest; digests are
//!   PHC strings that embed salt and cost
//! - **Tokens**: HS256 signed, two hour validity, subject is the numeric user id
//! - **Uniform rejection**: every token failure maps to the same 401 response
//!
//! # Usage
//!
//! ```ignore
//! use booking::auth::{jwt::TokenService, middleware::require_auth};
//!
//! let tokens = Arc::new(TokenService::new(&config.jwt_secret()?)?);
//! let protected = Router::new()
//!     .route("/events", post(create_event))
//!     .layer(middleware::from_fn_with_state(tokens, require_auth));
//! ```
//!
//! Handlers behind the gate take [`AuthenticatedUser`](middleware::AuthenticatedUser)
//! as an extractor to learn who is calling.

/// HS256 token issuance and verification.
pub mod jwt;
/// Request gate and identity extractor for protected routes.
pub mod middleware;
/// Argon2id password hashing.
pub mod password;

pub use jwt::{Claims, TokenError, TokenService};
pub use middleware::{require_auth, AuthenticatedUser};
pub use password::{HashError, PasswordHasher};
