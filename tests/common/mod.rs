// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use std::sync::Arc;
use tower::ServiceExt;
use visual_social::config::Config;
use visual_social::db::{FirestoreDb, MemoryDb, SocialStore};
use visual_social::middleware::auth::create_jwt;
use visual_social::models::{Project, User};
use visual_social::routes::create_router;
use visual_social::AppState;

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a test database connection.
#[allow(dead_code)]
pub async fn test_db() -> FirestoreDb {
    FirestoreDb::new("test-project")
        .await
        .expect("Failed to connect to Firestore emulator")
}

/// Create a test app over an in-memory store.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (Router, Arc<AppState>) {
    let db: Arc<dyn SocialStore> = Arc::new(MemoryDb::new());
    let state = Arc::new(AppState::new(Config::test_default(), db));
    (create_router(state.clone()), state)
}

/// Create a session token for `user_id` signed with the test key.
#[allow(dead_code)]
pub fn create_test_jwt(user_id: &str, signing_key: &[u8]) -> String {
    create_jwt(user_id, signing_key, 60).unwrap()
}

/// Insert a user directly, skipping password hashing.
#[allow(dead_code)]
pub async fn seed_user(state: &AppState, email: &str, full_name: &str) -> (User, String) {
    let user = User::new(email.to_string(), full_name.to_string(), "unused".to_string());
    state.db.create_user(&user).await.unwrap();
    let token = create_test_jwt(&user.id, &state.config.jwt_signing_key);
    (user, token)
}

#[allow(dead_code)]
pub async fn seed_project(state: &AppState, owner_id: &str, title: &str) -> Project {
    let project = Project::new(
        owner_id.to_string(),
        title.to_string(),
        format!("{} description", title),
        None,
        None,
    );
    state.db.upsert_project(&project).await.unwrap();
    project
}

/// Send a request with an optional JSON body and bearer token.
#[allow(dead_code)]
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
    };
    (status, json)
}
