//! HTTP API Handlers and Routes
//!
//! This module provides the REST API layer, built on the Axum web framework.
//!
//! # API Endpoints
//!
//! ## Authentication
//! - `POST /signup` - Create a user
//! - `POST /login` - Exchange credentials for a bearer token
//!
//! ## Events
//! - `GET /events` - List events
//! - `GET /events/{id}` - Get one event
//! - `POST /events` - Create an event (auth)
//! - `PUT /events/{id}` - Update an event (auth, owner only)
//! - `DELETE /events/{id}` - Delete an event (auth, owner only)
//!
//! ## Registrations
//! - `POST /events/{id}/register` - Register for an event (auth)
//! - `DELETE /events/{id}/register` - Cancel a registration (auth)
//!
//! # Authentication
//!
//! Write endpoints require a valid token in the `Authorization` header:
//! ```text
//! Authorization: Bearer <token>
//! ```

/// Body extractors.
pub mod extract;
/// Request and response handlers for all API endpoints.
pub mod handlers;
/// Router configuration and route definitions.
pub mod routes;

use crate::types::{
    Event, EventRequest, EventResponse, LoginRequest, LoginResponse, MessageResponse,
    Registration, RegistrationResponse, SignupRequest, SignupResponse, UserSummary,
};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};

/// OpenAPI document served at `/api-docs/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::auth::signup,
        handlers::auth::login,
        handlers::events::list_events,
        handlers::events::get_event,
        handlers::events::create_event,
        handlers::events::update_event,
        handlers::events::delete_event,
        handlers::registrations::register_for_event,
        handlers::registrations::cancel_registration,
    ),
    components(schemas(
        SignupRequest,
        SignupResponse,
        LoginRequest,
        LoginResponse,
        UserSummary,
        Event,
        EventRequest,
        EventResponse,
        Registration,
        RegistrationResponse,
        MessageResponse,
    )),
    modifiers(&BearerAuth),
    tags(
        (name = "auth", description = "Signup and login"),
        (name = "events", description = "Event management"),
        (name = "registrations", description = "Event registrations")
    )
)]
pub struct ApiDoc;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
