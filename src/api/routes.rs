use crate::api::handlers::{auth, events, registrations};
use crate::auth::{jwt::TokenService, middleware::require_auth};
use crate::AppState;
use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;

pub fn create_router(token_service: Arc<TokenService>) -> Router<AppState> {
    let public_routes = Router::new()
        // Public routes (no auth required)
        .route("/signup", post(auth::signup))
        .route("/login", post(auth::login))
        .route("/events", get(events::list_events))
        .route("/events/{id}", get(events::get_event));

    let protected_routes = Router::new()
        // Protected routes (auth required)
        .route("/events", post(events::create_event))
        .route(
            "/events/{id}",
            put(events::update_event).delete(events::delete_event),
        )
        .route(
            "/events/{id}/register",
            post(registrations::register_for_event).delete(registrations::cancel_registration),
        )
        .route_layer(middleware::from_fn_with_state(token_service, require_auth));

    public_routes.merge(protected_routes)
}
