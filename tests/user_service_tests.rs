//! HTTP-level tests for the user service
//!
//! These tests verify that:
//! - Registration validates input and never leaks the password hash
//! - Duplicate emails are rejected with 401 before any row is written
//! - Login issues a token bound to the user's uuid
//! - Login failures do not reveal whether the email exists

mod common;

use axum::body::Bytes;
use axum::http::{HeaderValue, StatusCode, header};
use axum_test::TestServer;
use serde_json::{Value, json};
use std::sync::Arc;
use todo_services::prelude::*;

async fn register(server: &TestServer, email: &str, password: &str) -> axum_test::TestResponse {
    server
        .post("/register")
        .json(&json!({ "email": email, "password": password }))
        .await
}

// =============================================================================
// Registration
// =============================================================================

#[tokio::test]
async fn test_register_returns_201_with_resource() {
    let server = common::user_server();

    let response = register(&server, "alice@example.com", "secret1").await;
    response.assert_status(StatusCode::CREATED);

    let body: Value = response.json();
    assert_eq!(body["message"], "User registered successfully");
    assert_eq!(body["user"]["email"], "alice@example.com");
    assert_eq!(body["user"]["id"], 1);
    assert_eq!(body["user"].as_object().unwrap().len(), 2);
    assert!(body.to_string().find("password").is_none());
}

#[tokio::test]
async fn test_register_validation_collects_all_errors() {
    let server = common::user_server();

    let response = register(&server, "not-an-email", "123").await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let body: Value = response.json();
    assert_eq!(body["error"], "Validation failed");
    let errors = body["errors"].as_array().unwrap();
    assert_eq!(errors.len(), 2);
    assert_eq!(errors[0]["field"], "email");
    assert_eq!(errors[1]["field"], "password");
}

#[tokio::test]
async fn test_register_missing_fields() {
    let server = common::user_server();

    let response = server.post("/register").json(&json!({})).await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let body: Value = response.json();
    let constraints: Vec<&str> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["constraint"].as_str().unwrap())
        .collect();
    assert_eq!(constraints, vec!["required", "required"]);
}

#[tokio::test]
async fn test_register_malformed_json() {
    let server = common::user_server();

    let response = server
        .post("/register")
        .bytes(Bytes::from_static(b"{\"email\": "))
        .add_header(header::CONTENT_TYPE, HeaderValue::from_static("application/json"))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_register_rejects_non_json_content_type() {
    let server = common::user_server();

    let response = server
        .post("/register")
        .text(r#"{"email": "alice@example.com", "password": "secret1"}"#)
        .await;
    response.assert_status(StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert_eq!(
        response.json::<Value>(),
        json!({"error": "Expected request with `Content-Type: application/json`"})
    );
}

#[tokio::test]
async fn test_register_duplicate_email_is_401_and_no_new_row() {
    let store = Arc::new(InMemoryUserStore::new());
    let server = TestServer::new(
        app::user_service(&common::config(), store.clone())
            .build()
            .unwrap(),
    );

    register(&server, "alice@example.com", "secret1")
        .await
        .assert_status(StatusCode::CREATED);

    let response = register(&server, "alice@example.com", "another1").await;
    response.assert_status(StatusCode::UNAUTHORIZED);
    let body: Value = response.json();
    assert_eq!(body, json!({"error": "Email already exists"}));
    assert_eq!(store.count().unwrap(), 1);
}

#[tokio::test]
async fn test_register_ignores_undeclared_fields() {
    let server = common::user_server();

    let response = server
        .post("/register")
        .json(&json!({
            "email": "mallory@example.com",
            "password": "secret1",
            "id": 999,
            "uuid": "forged"
        }))
        .await;
    response.assert_status(StatusCode::CREATED);
    let body: Value = response.json();
    assert_eq!(body["user"]["id"], 1);
}

// =============================================================================
// Login
// =============================================================================

#[tokio::test]
async fn test_login_returns_token_with_user_uuid() {
    let store = Arc::new(InMemoryUserStore::new());
    let server = TestServer::new(
        app::user_service(&common::config(), store.clone())
            .build()
            .unwrap(),
    );

    register(&server, "alice@example.com", "secret1").await;
    let response = server
        .post("/login")
        .json(&json!({"email": "alice@example.com", "password": "secret1"}))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["message"], "Login successful");
    let token = body["token"].as_str().unwrap();

    let claims = TokenIssuer::new(common::SECRET, 3600).verify(token).unwrap();
    let user = store
        .find_by_email("alice@example.com")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(claims.uuid, user.uuid.to_string());
    assert_eq!(claims.exp - claims.iat, 3600);
}

#[tokio::test]
async fn test_login_failures_are_identical() {
    let server = common::user_server();
    register(&server, "alice@example.com", "secret1").await;

    let wrong_password = server
        .post("/login")
        .json(&json!({"email": "alice@example.com", "password": "wrong-pass"}))
        .await;
    let unknown_email = server
        .post("/login")
        .json(&json!({"email": "bob@example.com", "password": "secret1"}))
        .await;

    wrong_password.assert_status(StatusCode::UNAUTHORIZED);
    unknown_email.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password.text(), unknown_email.text());
    assert_eq!(
        wrong_password.json::<Value>(),
        json!({"error": "Invalid email or password"})
    );
}

#[tokio::test]
async fn test_login_with_empty_body_is_401() {
    let server = common::user_server();
    let response = server.post("/login").await;
    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_rejects_non_json_content_type() {
    let server = common::user_server();
    register(&server, "alice@example.com", "secret1").await;

    let response = server
        .post("/login")
        .text(r#"{"email": "alice@example.com", "password": "secret1"}"#)
        .await;
    response.assert_status(StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert!(response.json::<Value>().get("token").is_none());
}

// =============================================================================
// Ambient routes
// =============================================================================

#[tokio::test]
async fn test_check_and_health() {
    let server = common::user_server();

    let check = server.get("/check").await;
    check.assert_status_ok();
    assert_eq!(check.text(), "Hello from user-service!");

    let health = server.get("/health").await;
    assert_eq!(
        health.json::<Value>(),
        json!({"status": "ok", "service": "user-service"})
    );
}

#[tokio::test]
async fn test_cors_allows_frontend_origin() {
    let mut config = common::config();
    config.apply_defaults(ServiceKind::User);
    let server = TestServer::new(app::user_router(&config).unwrap());

    let response = server
        .get("/check")
        .add_header(
            axum::http::header::ORIGIN,
            axum::http::HeaderValue::from_static("http://localhost:5173"),
        )
        .await;
    assert_eq!(
        response.header("access-control-allow-origin"),
        "http://localhost:5173"
    );
    assert_eq!(response.header("access-control-allow-credentials"), "true");
}
