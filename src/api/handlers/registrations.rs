use crate::{
    auth::AuthenticatedUser,
    types::{AppError, MessageResponse, RegistrationResponse, Result},
    AppState,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

/// Register the caller for an event
#[utoipa::path(
    post,
    path = "/events/{id}/register",
    params(("id" = i64, Path, description = "Event id")),
    responses(
        (status = 201, description = "Registered", body = RegistrationResponse),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "Event not found"),
        (status = 409, description = "Already registered")
    ),
    security(("bearer_auth" = [])),
    tag = "registrations"
)]
pub async fn register_for_event(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<i64>,
) -> Result<(StatusCode, Json<RegistrationResponse>)> {
    if state.db.get_event(id).await?.is_none() {
        return Err(AppError::NotFound(format!("Event {} not found", id)));
    }

    let registration = state.db.register_for_event(id, user.user_id).await?;

    Ok((
        StatusCode::CREATED,
        Json(RegistrationResponse {
            message: "Registered!".to_string(),
            registration,
        }),
    ))
}

/// Cancel the caller's registration
#[utoipa::path(
    delete,
    path = "/events/{id}/register",
    params(("id" = i64, Path, description = "Event id")),
    responses(
        (status = 200, description = "Registration cancelled", body = MessageResponse),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "No registration for this event")
    ),
    security(("bearer_auth" = [])),
    tag = "registrations"
)]
pub async fn cancel_registration(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>> {
    if !state.db.cancel_registration(id, user.user_id).await? {
        return Err(AppError::NotFound(
            "No registration found for this event".to_string(),
        ));
    }

    Ok(Json(MessageResponse {
        message: "Cancelled!".to_string(),
    }))
}
