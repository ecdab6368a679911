use crate::{
    api::extract::ValidatedJson,
    types::{
        AppError, LoginRequest, LoginResponse, Result, SignupRequest, SignupResponse, UserSummary,
    },
    AppState,
};
use axum::{extract::State, http::StatusCode, Json};

/// Message returned on successful signup.
pub const SIGNUP_MESSAGE: &str = "User created successfully!";

/// Register a new user
#[utoipa::path(
    post,
    path = "/signup",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "User created", body = SignupResponse),
        (status = 400, description = "Invalid input"),
        (status = 409, description = "Email already registered")
    ),
    tag = "auth"
)]
pub async fn signup(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<SignupRequest>,
) -> Result<(StatusCode, Json<SignupResponse>)> {
    let email = payload.email.trim().to_string();
    if email.is_empty() || payload.password.is_empty() {
        return Err(AppError::InvalidInput(
            "Email and password are required".to_string(),
        ));
    }

    // Argon2 is CPU-bound; keep it off the async workers.
    let hasher = state.password_hasher.clone();
    let password = payload.password;
    let password_hash = tokio::task::spawn_blocking(move || hasher.hash(&password))
        .await
        .map_err(|e| AppError::Internal(format!("Hashing task failed: {}", e)))??;

    let id = state.db.create_user(&email, &password_hash).await?;
    tracing::info!(user_id = id, "user signed up");

    Ok((
        StatusCode::CREATED,
        Json(SignupResponse {
            message: SIGNUP_MESSAGE.to_string(),
            user: UserSummary { id, email },
        }),
    ))
}

/// Login with email and password
#[utoipa::path(
    post,
    path = "/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Invalid credentials")
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    let email = payload.email.trim();

    let user = state.db.get_user_by_email(email).await?;

    // Unknown email and wrong password cost the same Argon2 run and produce
    // the same response.
    let hasher = state.password_hasher.clone();
    let password = payload.password;
    let digest = user.as_ref().map(|user| user.password_hash.clone());
    let valid =
        tokio::task::spawn_blocking(move || hasher.verify_stored(&password, digest.as_deref()))
            .await
            .map_err(|e| AppError::Internal(format!("Verification task failed: {}", e)))?;

    let user = match user {
        Some(user) if valid => user,
        Some(user) => {
            tracing::debug!(user_id = user.id, "password verification failed");
            return Err(AppError::Unauthorized);
        }
        None => return Err(AppError::Unauthorized),
    };

    let token = state
        .token_service
        .issue(&user.email, user.id)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(Json(LoginResponse {
        message: "Login successful!".to_string(),
        token,
    }))
}
