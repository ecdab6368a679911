use crate::{
    api::extract::ValidatedJson,
    auth::AuthenticatedUser,
    types::{AppError, Event, EventRequest, EventResponse, MessageResponse, Result},
    AppState,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

/// Loads an event and checks that `user` owns it.
async fn owned_event(state: &AppState, id: i64, user: AuthenticatedUser) -> Result<Event> {
    let event = state
        .db
        .get_event(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Event {} not found", id)))?;

    if event.user_id != user.user_id {
        return Err(AppError::Forbidden(
            "Only the event owner can modify this event".to_string(),
        ));
    }

    Ok(event)
}

/// List all events
#[utoipa::path(
    get,
    path = "/events",
    responses((status = 200, description = "All events", body = [Event])),
    tag = "events"
)]
pub async fn list_events(State(state): State<AppState>) -> Result<Json<Vec<Event>>> {
    Ok(Json(state.db.list_events().await?))
}

/// Get a single event
#[utoipa::path(
    get,
    path = "/events/{id}",
    params(("id" = i64, Path, description = "Event id")),
    responses(
        (status = 200, description = "The event", body = Event),
        (status = 404, description = "Event not found")
    ),
    tag = "events"
)]
pub async fn get_event(State(state): State<AppState>, Path(id): Path<i64>) -> Result<Json<Event>> {
    state
        .db
        .get_event(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Event {} not found", id)))
}

/// Create an event owned by the caller
#[utoipa::path(
    post,
    path = "/events",
    request_body = EventRequest,
    responses(
        (status = 201, description = "Event created", body = EventResponse),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer_auth" = [])),
    tag = "events"
)]
pub async fn create_event(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    ValidatedJson(payload): ValidatedJson<EventRequest>,
) -> Result<(StatusCode, Json<EventResponse>)> {
    payload.validate()?;

    let event = state.db.create_event(user.user_id, &payload).await?;
    tracing::info!(event_id = event.id, user_id = user.user_id, "event created");

    Ok((
        StatusCode::CREATED,
        Json(EventResponse {
            message: "Event created!".to_string(),
            event,
        }),
    ))
}

/// Replace an event's details
#[utoipa::path(
    put,
    path = "/events/{id}",
    params(("id" = i64, Path, description = "Event id")),
    request_body = EventRequest,
    responses(
        (status = 200, description = "Event updated", body = EventResponse),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Caller does not own the event"),
        (status = 404, description = "Event not found")
    ),
    security(("bearer_auth" = [])),
    tag = "events"
)]
pub async fn update_event(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<i64>,
    ValidatedJson(payload): ValidatedJson<EventRequest>,
) -> Result<Json<EventResponse>> {
    payload.validate()?;
    let existing = owned_event(&state, id, user).await?;

    state.db.update_event(id, &payload).await?;

    Ok(Json(EventResponse {
        message: "Event updated successfully!".to_string(),
        event: Event {
            id,
            name: payload.name,
            description: payload.description,
            location: payload.location,
            date_time: payload.date_time,
            user_id: existing.user_id,
        },
    }))
}

/// Delete an event
#[utoipa::path(
    delete,
    path = "/events/{id}",
    params(("id" = i64, Path, description = "Event id")),
    responses(
        (status = 200, description = "Event deleted", body = MessageResponse),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Caller does not own the event"),
        (status = 404, description = "Event not found")
    ),
    security(("bearer_auth" = [])),
    tag = "events"
)]
pub async fn delete_event(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>> {
    owned_event(&state, id, user).await?;
    state.db.delete_event(id).await?;
    tracing::info!(event_id = id, user_id = user.user_id, "event deleted");

    Ok(Json(MessageResponse {
        message: "Event deleted successfully!".to_string(),
    }))
}
