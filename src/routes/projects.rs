// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Project CRUD for owners.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Extension, Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::Project;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/projects", get(list_projects).post(create_project))
        .route("/api/projects/{project_id}", get(get_project).put(update_project))
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateProjectRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[serde(default)]
    #[validate(length(max = 5000))]
    pub description: String,
    #[validate(url)]
    pub video_url: Option<String>,
    #[validate(url)]
    pub thumbnail_url: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProjectRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[validate(length(max = 5000))]
    pub description: Option<String>,
    #[validate(url)]
    pub video_url: Option<String>,
    #[validate(url)]
    pub thumbnail_url: Option<String>,
}

#[derive(Serialize)]
pub struct ProjectListResponse {
    pub projects: Vec<Project>,
}

async fn create_project(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<CreateProjectRequest>,
) -> Result<(StatusCode, Json<Project>)> {
    payload.validate()?;

    let project = Project::new(
        user.user_id.clone(),
        payload.title,
        payload.description,
        payload.video_url,
        payload.thumbnail_url,
    );
    state.db.upsert_project(&project).await?;

    tracing::info!(user_id = %user.user_id, project_id = %project.id, "Project created");

    Ok((StatusCode::CREATED, Json(project)))
}

async fn list_projects(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<ProjectListResponse>> {
    let projects = state.db.list_projects_for_user(&user.user_id).await?;
    Ok(Json(ProjectListResponse { projects }))
}

async fn get_project(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(project_id): Path<String>,
) -> Result<Json<Project>> {
    Ok(Json(owned_project(&state, &user.user_id, &project_id).await?))
}

async fn update_project(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(project_id): Path<String>,
    Json(payload): Json<UpdateProjectRequest>,
) -> Result<Json<Project>> {
    payload.validate()?;

    let mut project = owned_project(&state, &user.user_id, &project_id).await?;
    if let Some(title) = payload.title {
        project.title = title;
    }
    if let Some(description) = payload.description {
        project.description = description;
    }
    if payload.video_url.is_some() {
        project.video_url = payload.video_url;
    }
    if payload.thumbnail_url.is_some() {
        project.thumbnail_url = payload.thumbnail_url;
    }
    project.updated_at = Utc::now();

    state.db.upsert_project(&project).await?;
    Ok(Json(project))
}

/// Projects owned by someone else are reported as missing.
async fn owned_project(state: &AppState, user_id: &str, project_id: &str) -> Result<Project> {
    state
        .db
        .get_project(project_id)
        .await?
        .filter(|p| p.is_owned_by(user_id))
        .ok_or_else(|| AppError::NotFound(format!("Project {} not found", project_id)))
}
