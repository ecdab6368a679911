use axum_test::TestServer;
use serde_json::json;
use std::sync::Arc;

use booking::{
    auth::{PasswordHasher, TokenService},
    db::TursoClient,
    AppState,
};

// ============= Test Helpers =============

const TEST_SECRET: &str = "test_jwt_secret_key_for_testing_only";

/// Create a test app with in-memory database
async fn create_test_state() -> AppState {
    let turso = TursoClient::new_memory()
        .await
        .expect("Failed to create in-memory database");

    AppState {
        db: Arc::new(turso),
        password_hasher: Arc::new(PasswordHasher::new().expect("hasher")),
        token_service: Arc::new(TokenService::new(TEST_SECRET).expect("token service")),
    }
}

/// Create a test server
async fn create_test_server() -> TestServer {
    let app = booking::create_app(create_test_state().await);
    TestServer::new(app).expect("Failed to create test server")
}

async fn signup(server: &TestServer, email: &str, password: &str) {
    server
        .post("/signup")
        .json(&json!({ "email": email, "password": password }))
        .await
        .assert_status(axum::http::StatusCode::CREATED);
}

async fn login_token(server: &TestServer, email: &str, password: &str) -> String {
    let response = server
        .post("/login")
        .json(&json!({ "email": email, "password": password }))
        .await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    body["token"]
        .as_str()
        .expect("token should be a string")
        .to_string()
}

/// Sign up and log in, returning a bearer token
async fn authenticated(server: &TestServer, email: &str) -> String {
    signup(server, email, "password123").await;
    login_token(server, email, "password123").await
}

fn event_body(name: &str) -> serde_json::Value {
    json!({
        "name": name,
        "description": "Test Description",
        "location": "Test Location",
        "dateTime": "2024-09-15T09:00:00Z"
    })
}

// ============= Health & Docs =============

#[tokio::test]
async fn test_health_check() {
    let server = create_test_server().await;

    let response = server.get("/health").await;
    response.assert_status_ok();
    response.assert_text("OK");
}

#[tokio::test]
async fn test_openapi_document_lists_routes() {
    let server = create_test_server().await;

    let response = server.get("/api-docs/openapi.json").await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    assert!(body["paths"]["/signup"].is_object());
    assert!(body["paths"]["/events"]["post"].is_object());
    assert!(body["components"]["securitySchemes"]["bearer_auth"].is_object());
}

// ============= Authentication Tests =============

#[tokio::test]
async fn test_signup_endpoint() {
    let server = create_test_server().await;

    let response = server
        .post("/signup")
        .json(&json!({
            "email": "test@example.com",
            "password": "password123"
        }))
        .await;

    response.assert_status(axum::http::StatusCode::CREATED);
    let body: serde_json::Value = response.json();
    assert_eq!(body["message"], "User created successfully!");
    assert_eq!(body["user"]["email"], "test@example.com");
    assert!(body["user"]["id"].is_number());
    assert!(body["user"].get("password_hash").is_none());
}

#[tokio::test]
async fn test_signup_malformed_body() {
    let server = create_test_server().await;

    let response = server
        .post("/signup")
        .text("{ not json")
        .content_type("application/json")
        .await;
    response.assert_status_bad_request();

    let response = server
        .post("/signup")
        .json(&json!({ "email": "test@example.com" }))
        .await;
    response.assert_status_bad_request();
}

#[tokio::test]
async fn test_signup_duplicate_email_conflicts() {
    let server = create_test_server().await;
    signup(&server, "duplicate@example.com", "password123").await;

    let response = server
        .post("/signup")
        .json(&json!({
            "email": "duplicate@example.com",
            "password": "password456"
        }))
        .await;

    response.assert_status(axum::http::StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_login_endpoint() {
    let server = create_test_server().await;
    signup(&server, "test@example.com", "password123").await;

    let response = server
        .post("/login")
        .json(&json!({
            "email": "test@example.com",
            "password": "password123"
        }))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    let token = body["token"].as_str().expect("token");
    assert!(!token.is_empty());
}

#[tokio::test]
async fn test_login_token_carries_user_identity() {
    let state = create_test_state().await;
    let tokens = state.token_service.clone();
    let server = TestServer::new(booking::create_app(state)).expect("server");

    let response = server
        .post("/signup")
        .json(&json!({ "email": "claims@example.com", "password": "password123" }))
        .await;
    let body: serde_json::Value = response.json();
    let user_id = body["user"]["id"].as_i64().expect("id");

    let token = login_token(&server, "claims@example.com", "password123").await;
    let claims = tokens.verify_claims(&token).expect("valid token");

    assert_eq!(claims.sub, user_id);
    assert_eq!(claims.email, "claims@example.com");
    assert_eq!(claims.exp - claims.iat, 2 * 60 * 60);
}

#[tokio::test]
async fn test_login_with_wrong_password() {
    let server = create_test_server().await;
    signup(&server, "test@example.com", "password123").await;

    let response = server
        .post("/login")
        .json(&json!({
            "email": "test@example.com",
            "password": "wrongpassword"
        }))
        .await;

    response.assert_status_unauthorized();
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let server = create_test_server().await;
    signup(&server, "test@example.com", "password123").await;

    let wrong_password = server
        .post("/login")
        .json(&json!({ "email": "test@example.com", "password": "wrongpassword" }))
        .await;
    let unknown_email = server
        .post("/login")
        .json(&json!({ "email": "nobody@example.com", "password": "password123" }))
        .await;

    wrong_password.assert_status_unauthorized();
    unknown_email.assert_status_unauthorized();
    assert_eq!(wrong_password.text(), unknown_email.text());
}

// ============= Event Tests =============

#[tokio::test]
async fn test_get_events_endpoint() {
    let server = create_test_server().await;

    let response = server.get("/events").await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_create_event_without_auth() {
    let server = create_test_server().await;

    let response = server.post("/events").json(&event_body("Test Event")).await;
    response.assert_status_unauthorized();

    let events: serde_json::Value = server.get("/events").await.json();
    assert_eq!(events, json!([]), "event must not be created");
}

#[tokio::test]
async fn test_create_event_with_invalid_token() {
    let server = create_test_server().await;

    let foreign = TokenService::new("a-completely-different-secret")
        .expect("token service")
        .issue("test@example.com", 1)
        .expect("issue");

    for token in ["invalid.token.here".to_string(), foreign] {
        let response = server
            .post("/events")
            .authorization_bearer(token)
            .json(&event_body("Test Event"))
            .await;
        response.assert_status_unauthorized();
    }

    let events: serde_json::Value = server.get("/events").await.json();
    assert_eq!(events, json!([]));
}

#[tokio::test]
async fn test_create_event_with_expired_token() {
    let server = create_test_server().await;
    signup(&server, "late@example.com", "password123").await;

    let expired = TokenService::new(TEST_SECRET)
        .expect("token service")
        .issue_at(
            "late@example.com",
            1,
            chrono::Utc::now() - chrono::Duration::hours(3),
        )
        .expect("issue");

    let response = server
        .post("/events")
        .authorization_bearer(expired)
        .json(&event_body("Too Late"))
        .await;

    response.assert_status_unauthorized();
}

#[tokio::test]
async fn test_create_event_owned_by_caller() {
    let server = create_test_server().await;
    let token = authenticated(&server, "owner@example.com").await;

    let response = server
        .post("/events")
        .authorization_bearer(&token)
        .json(&event_body("Owned Event"))
        .await;

    response.assert_status(axum::http::StatusCode::CREATED);
    let body: serde_json::Value = response.json();
    assert_eq!(body["message"], "Event created!");
    let event_id = body["event"]["id"].as_i64().expect("id");
    let owner_id = body["event"]["userId"].as_i64().expect("owner");

    let second = authenticated(&server, "second@example.com").await;
    let response = server
        .post("/events")
        .authorization_bearer(&second)
        .json(&event_body("Second Event"))
        .await;
    let body: serde_json::Value = response.json();
    assert_ne!(body["event"]["userId"].as_i64(), Some(owner_id));

    let response = server.get(&format!("/events/{event_id}")).await;
    response.assert_status_ok();
    let event: serde_json::Value = response.json();
    assert_eq!(event["name"], "Owned Event");
    assert_eq!(event["dateTime"], "2024-09-15T09:00:00Z");

    let events: serde_json::Value = server.get("/events").await.json();
    assert_eq!(events.as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn test_create_event_with_blank_field() {
    let server = create_test_server().await;
    let token = authenticated(&server, "blank@example.com").await;

    let mut body = event_body("Blank");
    body["location"] = json!("");

    let response = server
        .post("/events")
        .authorization_bearer(token)
        .json(&body)
        .await;

    response.assert_status_bad_request();
}

#[tokio::test]
async fn test_get_unknown_event() {
    let server = create_test_server().await;

    server.get("/events/999").await.assert_status_not_found();
}

#[tokio::test]
async fn test_only_owner_can_update_or_delete() {
    let server = create_test_server().await;
    let owner = authenticated(&server, "owner@example.com").await;
    let intruder = authenticated(&server, "intruder@example.com").await;

    let created: serde_json::Value = server
        .post("/events")
        .authorization_bearer(&owner)
        .json(&event_body("Original"))
        .await
        .json();
    let path = format!("/events/{}", created["event"]["id"]);

    server
        .put(&path)
        .authorization_bearer(&intruder)
        .json(&event_body("Hijacked"))
        .await
        .assert_status_forbidden();
    server
        .delete(&path)
        .authorization_bearer(&intruder)
        .await
        .assert_status_forbidden();

    let response = server
        .put(&path)
        .authorization_bearer(&owner)
        .json(&event_body("Renamed"))
        .await;
    response.assert_status_ok();
    let event: serde_json::Value = server.get(&path).await.json();
    assert_eq!(event["name"], "Renamed");

    server
        .delete(&path)
        .authorization_bearer(&owner)
        .await
        .assert_status_ok();
    server.get(&path).await.assert_status_not_found();
}

#[tokio::test]
async fn test_update_without_auth_leaves_event_untouched() {
    let server = create_test_server().await;
    let owner = authenticated(&server, "owner@example.com").await;

    let created: serde_json::Value = server
        .post("/events")
        .authorization_bearer(&owner)
        .json(&event_body("Original"))
        .await
        .json();
    let path = format!("/events/{}", created["event"]["id"]);

    server
        .put(&path)
        .json(&event_body("Anonymous edit"))
        .await
        .assert_status_unauthorized();

    let event: serde_json::Value = server.get(&path).await.json();
    assert_eq!(event["name"], "Original");
}

// ============= Registration Tests =============

#[tokio::test]
async fn test_registration_lifecycle() {
    let server = create_test_server().await;
    let owner = authenticated(&server, "owner@example.com").await;
    let guest = authenticated(&server, "guest@example.com").await;

    let created: serde_json::Value = server
        .post("/events")
        .authorization_bearer(&owner)
        .json(&event_body("Party"))
        .await
        .json();
    let path = format!("/events/{}/register", created["event"]["id"]);

    server.post(&path).await.assert_status_unauthorized();

    let response = server.post(&path).authorization_bearer(&guest).await;
    response.assert_status(axum::http::StatusCode::CREATED);
    let body: serde_json::Value = response.json();
    assert_eq!(body["registration"]["eventId"], created["event"]["id"]);

    server
        .post(&path)
        .authorization_bearer(&guest)
        .await
        .assert_status(axum::http::StatusCode::CONFLICT);

    server
        .delete(&path)
        .authorization_bearer(&guest)
        .await
        .assert_status_ok();
    server
        .delete(&path)
        .authorization_bearer(&guest)
        .await
        .assert_status_not_found();
}

#[tokio::test]
async fn test_register_for_unknown_event() {
    let server = create_test_server().await;
    let token = authenticated(&server, "guest@example.com").await;

    server
        .post("/events/424242/register")
        .authorization_bearer(token)
        .await
        .assert_status_not_found();
}

#[tokio::test]
async fn test_deleting_event_removes_registrations() {
    let server = create_test_server().await;
    let owner = authenticated(&server, "owner@example.com").await;
    let guest = authenticated(&server, "guest@example.com").await;

    let created: serde_json::Value = server
        .post("/events")
        .authorization_bearer(&owner)
        .json(&event_body("Short-lived"))
        .await
        .json();
    let id = &created["event"]["id"];

    server
        .post(&format!("/events/{id}/register"))
        .authorization_bearer(&guest)
        .await
        .assert_status(axum::http::StatusCode::CREATED);

    server
        .delete(&format!("/events/{id}"))
        .authorization_bearer(&owner)
        .await
        .assert_status_ok();

    server
        .delete(&format!("/events/{id}/register"))
        .authorization_bearer(&guest)
        .await
        .assert_status_not_found();
}
