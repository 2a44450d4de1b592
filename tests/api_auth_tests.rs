// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! API authentication and CORS tests.
//!
//! These tests verify that:
//! 1. Protected routes reject requests without valid tokens
//! 2. Register, login and profile work end to end
//! 3. The session cookie is accepted in place of a bearer token
//! 4. CORS preflight requests return correct headers

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use serde_json::json;
use tower::ServiceExt;

mod common;
use common::{create_test_app, create_test_jwt, seed_user, send};

#[tokio::test]
async fn test_protected_route_without_token() {
    let (app, _) = create_test_app();

    let (status, _) = send(&app, "GET", "/api/social/authorizations", None, None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_protected_route_with_invalid_token() {
    let (app, _) = create_test_app();

    let (status, _) = send(
        &app,
        "GET",
        "/api/social/authorizations",
        Some("invalid.token.here"),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_token_signed_with_other_key_rejected() {
    let (app, _) = create_test_app();
    let token = create_test_jwt("someone", b"a_completely_different_signing_key");

    let (status, _) = send(&app, "GET", "/api/projects", Some(&token), None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_protected_route_with_valid_token() {
    let (app, state) = create_test_app();
    let (_, token) = seed_user(&state, "owner@visual.app", "Owner").await;

    let (status, body) = send(&app, "GET", "/api/social/authorizations", Some(&token), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["authorizations"], json!([]));
}

#[tokio::test]
async fn test_register_login_me() {
    let (app, _) = create_test_app();

    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({
            "email": "Jane@Visual.app",
            "password": "correct horse",
            "full_name": "Jane Doe"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["email"], "jane@visual.app");
    assert_eq!(body["visupoints"], 0);
    assert!(body.get("hashed_password").is_none());

    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({"email": "jane@visual.app", "password": "correct horse"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["token_type"], "bearer");
    let token = body["access_token"].as_str().unwrap().to_string();

    let (status, body) = send(&app, "GET", "/api/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["full_name"], "Jane Doe");
    assert_eq!(body["badges"], json!([]));
}

#[tokio::test]
async fn test_register_duplicate_email() {
    let (app, state) = create_test_app();
    seed_user(&state, "taken@visual.app", "First").await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({
            "email": "TAKEN@visual.app",
            "password": "long enough",
            "full_name": "Second"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "conflict");
}

#[tokio::test]
async fn test_concurrent_register_same_email() {
    let (app, _) = create_test_app();

    let register = |name: &'static str| {
        let app = app.clone();
        async move {
            send(
                &app,
                "POST",
                "/api/auth/register",
                None,
                Some(json!({
                    "email": "race@visual.app",
                    "password": "long enough",
                    "full_name": name
                })),
            )
            .await
        }
    };

    let ((first, _), (second, _)) = tokio::join!(register("First"), register("Second"));

    let mut statuses = vec![first, second];
    statuses.sort_by_key(|s| s.as_u16());
    assert_eq!(statuses, vec![StatusCode::CREATED, StatusCode::CONFLICT]);
}

#[tokio::test]
async fn test_login_wrong_password() {
    let (app, _) = create_test_app();
    send(
        &app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({
            "email": "sam@visual.app",
            "password": "the right one",
            "full_name": "Sam"
        })),
    )
    .await;

    let (status, _) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({"email": "sam@visual.app", "password": "the wrong one"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({"email": "nobody@visual.app", "password": "the right one"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_sets_session_cookie() {
    let (app, _) = create_test_app();
    send(
        &app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({
            "email": "cookie@visual.app",
            "password": "cookie monster",
            "full_name": "Cookie"
        })),
    )
    .await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/login")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    json!({"email": "cookie@visual.app", "password": "cookie monster"})
                        .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("Set-Cookie header missing")
        .to_str()
        .unwrap()
        .to_string();
    assert!(set_cookie.starts_with("visual_token="));
    assert!(set_cookie.contains("HttpOnly"));

    // The cookie alone authenticates
    let cookie_pair = set_cookie.split(';').next().unwrap().to_string();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/auth/me")
                .header(header::COOKIE, cookie_pair)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_logout_clears_cookie() {
    let (app, _) = create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/logout")
                .header(header::COOKIE, "visual_token=stale")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap();
    assert!(set_cookie.starts_with("visual_token="));
    assert!(set_cookie.contains("Path=/"));
    assert!(set_cookie.contains("HttpOnly"));
    assert!(set_cookie.contains("SameSite=Lax"));
    assert!(set_cookie.contains("Max-Age=0"));
    // Test frontend is plain http://localhost
    assert!(!set_cookie.contains("Secure"));
}

#[tokio::test]
async fn test_cors_preflight() {
    let (app, _) = create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/api/projects")
                .header(header::ORIGIN, "http://localhost:5173")
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response
        .headers()
        .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
    assert!(response
        .headers()
        .contains_key(header::ACCESS_CONTROL_ALLOW_METHODS));
}

#[tokio::test]
async fn test_public_routes_no_auth_required() {
    let (app, _) = create_test_app();

    for uri in ["/health", "/api/", "/api/leaderboard", "/api/social/platforms"] {
        let (status, _) = send(&app, "GET", uri, None, None).await;
        assert_eq!(status, StatusCode::OK, "{} should be public", uri);
    }
}
