//! Test helpers for API integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum_test::TestServer;
use serde_json::{json, Value};

use nestly::auth::TokenIssuer;
use nestly::web::{create_router, AppState};
use nestly::Database;

/// Secret used for all test servers.
pub const TEST_SECRET: &str = "test-secret-key-for-testing-only";

/// Create a test server backed by an in-memory database.
pub async fn create_test_server() -> TestServer {
    let db = Database::open_in_memory()
        .await
        .expect("Failed to create test database");
    let issuer = TokenIssuer::new(TEST_SECRET, 3600);
    let state = Arc::new(AppState::new(db, issuer));
    let router = create_router(state, &[]);

    TestServer::new(router).expect("Failed to create test server")
}

/// Sign up a user and return the response body.
pub async fn signup_user(server: &TestServer, username: &str, email: &str, password: &str) -> Value {
    let response = server
        .post("/api/auth/signup")
        .json(&json!({
            "username": username,
            "email": email,
            "password": password
        }))
        .await;

    response.json::<Value>()
}

/// Log in and return the response body.
pub async fn login_user(server: &TestServer, email: &str, password: &str) -> Value {
    let response = server
        .post("/api/auth/login")
        .json(&json!({
            "email": email,
            "password": password
        }))
        .await;

    response.json::<Value>()
}

/// Sign up and log in, returning `(account_id, token)`.
pub async fn register_and_login(
    server: &TestServer,
    username: &str,
    email: &str,
    password: &str,
) -> (i64, String) {
    signup_user(server, username, email, password).await;
    let body = login_user(server, email, password).await;

    let id = body["data"]["user"]["id"].as_i64().expect("account id");
    let token = body["data"]["token"].as_str().expect("token").to_string();
    (id, token)
}
