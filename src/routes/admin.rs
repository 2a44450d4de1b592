// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Operator-only publishing of projects to the official channels.

use axum::{extract::State, routing::post, Extension, Json, Router};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::SocialPlatform;
use crate::services::PublishResult;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/admin/publish", post(publish_project))
}

#[derive(Debug, Deserialize)]
pub struct PublishRequest {
    pub project_id: String,
    pub platforms: Vec<SocialPlatform>,
}

#[derive(Serialize)]
pub struct PublishResponse {
    pub project_id: String,
    pub results: BTreeMap<SocialPlatform, PublishResult>,
    pub message: String,
}

/// Publish a project's excerpts to the requested official channels.
///
/// Requires an active sharing authorization on the project. Each platform
/// is attempted independently; failures are reported per platform.
async fn publish_project(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<PublishRequest>,
) -> Result<Json<PublishResponse>> {
    let caller = state
        .db
        .get_user(&user.user_id)
        .await?
        .ok_or(AppError::Unauthorized)?;
    if !state.config.is_admin(&caller.email) {
        tracing::warn!(user_id = %user.user_id, "Non-admin publish attempt");
        return Err(AppError::Forbidden("Admin access required".to_string()));
    }

    if payload.platforms.is_empty() {
        return Err(AppError::BadRequest(
            "At least one platform is required".to_string(),
        ));
    }

    let project = state
        .db
        .get_project(&payload.project_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Project {} not found", payload.project_id)))?;

    let authorization = state
        .db
        .find_active_authorization_for_project(&project.id)
        .await?
        .ok_or_else(|| {
            AppError::Forbidden("No active authorization for this project".to_string())
        })?;

    let results = state
        .publishers
        .publish_project(&project, &authorization, &payload.platforms)
        .await;

    let succeeded = results.values().filter(|r| r.success).count();
    tracing::info!(
        project_id = %project.id,
        requested = results.len(),
        succeeded,
        "Publish batch complete"
    );

    Ok(Json(PublishResponse {
        project_id: project.id,
        message: format!("Published to {}/{} platforms", succeeded, results.len()),
        results,
    }))
}
