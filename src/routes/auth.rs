// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Account routes: registration, login, logout, profile.

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::middleware::auth::{create_jwt, AuthUser, SESSION_COOKIE};
use crate::models::User;
use crate::services::credentials::{hash_password, verify_password};
use crate::time_utils::format_utc_rfc3339;
use crate::AppState;

pub fn public_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
        .route("/api/auth/logout", post(logout))
}

pub fn protected_routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/auth/me", get(get_me))
}

#[derive(Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8, max = 128))]
    pub password: String,
    #[validate(length(min = 1, max = 100))]
    pub full_name: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub full_name: String,
    pub visupoints: u64,
    pub badges: Vec<String>,
    pub created_at: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            full_name: user.full_name,
            visupoints: user.visupoints,
            badges: user.badges,
            created_at: format_utc_rfc3339(user.created_at),
        }
    }
}

#[derive(Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

/// Emails are compared case-insensitively.
fn normalize_email(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}

/// Register a new project owner.
async fn register(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserResponse>)> {
    payload.validate()?;

    let email = normalize_email(&payload.email);
    // Early exit before hashing; `create_user` still rejects a racing twin
    if state.db.find_user_by_email(&email).await?.is_some() {
        return Err(AppError::Conflict("Email already registered".to_string()));
    }

    let hashed_password =
        hash_password(payload.password, state.config.password_hash_cost).await?;
    let user = User::new(email, payload.full_name.trim().to_string(), hashed_password);
    state.db.create_user(&user).await?;

    tracing::info!(user_id = %user.id, "User registered");

    Ok((StatusCode::CREATED, Json(user.into())))
}

/// Verify credentials and issue a session token.
///
/// The token is returned in the body and also set as an HTTP-only cookie.
async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(payload): Json<LoginRequest>,
) -> Result<(CookieJar, Json<TokenResponse>)> {
    let user = state
        .db
        .find_user_by_email(&normalize_email(&payload.email))
        .await?
        .ok_or(AppError::Unauthorized)?;

    if !verify_password(payload.password, user.hashed_password.clone()).await {
        return Err(AppError::Unauthorized);
    }

    if !user.is_active {
        tracing::warn!(user_id = %user.id, "Login attempt on inactive account");
        return Err(AppError::Unauthorized);
    }

    let token = create_jwt(
        &user.id,
        &state.config.jwt_signing_key,
        state.config.access_token_expire_minutes,
    )?;

    tracing::info!(user_id = %user.id, "User logged in");

    Ok((
        jar.add(session_cookie(&state, token.clone())),
        Json(TokenResponse {
            access_token: token,
            token_type: "bearer".to_string(),
        }),
    ))
}

/// Clear the session cookie.
///
/// The removal cookie carries the same attributes as the one set at login.
async fn logout(State(state): State<Arc<AppState>>, jar: CookieJar) -> (CookieJar, StatusCode) {
    (
        jar.remove(session_cookie(&state, String::new())),
        StatusCode::NO_CONTENT,
    )
}

/// Plain-HTTP frontends (local dev) cannot receive `Secure` cookies.
fn session_cookie(state: &AppState, value: String) -> Cookie<'static> {
    let secure = !state.config.frontend_url.starts_with("http://");
    Cookie::build((SESSION_COOKIE, value))
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .build()
}

/// Get current user profile.
async fn get_me(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<UserResponse>> {
    let profile = state
        .db
        .get_user(&user.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", user.user_id)))?;

    Ok(Json(profile.into()))
}
