//! API request handlers.
//!
//! This module contains all HTTP request handlers organized by functionality.

/// Authentication handlers (signup, login).
pub mod auth;
/// Event listing and owner-only event management.
pub mod events;
/// Event registration handlers.
pub mod registrations;
