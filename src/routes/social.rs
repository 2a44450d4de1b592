// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Sharing authorization, share links, stats, and the public tracking ping.

use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::middleware::client_ip::ClientIp;
use crate::models::{EventType, SocialAuthorization, SocialPlatform, VideoSpec};
use crate::services::ProjectStats;
use crate::AppState;

/// Routes that need no session.
pub fn public_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/social/track", post(track_event))
        .route("/api/social/platforms", get(list_platforms))
}

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/social/authorize", post(authorize))
        .route("/api/social/revoke", post(revoke))
        .route("/api/social/authorizations", get(list_authorizations))
        .route("/api/social/links/{project_id}", get(get_links))
        .route("/api/social/stats/{project_id}", get(get_stats))
}

#[derive(Debug, Deserialize)]
pub struct AuthorizeRequest {
    pub project_id: String,
    pub platforms: Vec<SocialPlatform>,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct AuthorizeResponse {
    pub success: bool,
    pub project_id: String,
    pub platforms: Vec<SocialPlatform>,
    pub links: BTreeMap<SocialPlatform, String>,
    pub badge_granted: bool,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct RevokeParams {
    pub project_id: String,
}

#[derive(Serialize)]
pub struct StatusResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Serialize)]
pub struct AuthorizationListResponse {
    pub authorizations: Vec<SocialAuthorization>,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct LinksResponse {
    pub project_id: String,
    pub links: BTreeMap<SocialPlatform, String>,
}

#[derive(Debug, Deserialize)]
pub struct TrackRequest {
    pub project_id: String,
    pub platform: SocialPlatform,
    pub event_type: EventType,
}

#[derive(Serialize)]
pub struct PlatformsResponse {
    pub platforms: Vec<VideoSpec>,
}

async fn authorize(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Extension(ClientIp(ip)): Extension<ClientIp>,
    Json(payload): Json<AuthorizeRequest>,
) -> Result<Json<AuthorizeResponse>> {
    let outcome = state
        .authorizations
        .authorize(&user.user_id, &payload.project_id, &payload.platforms, ip)
        .await?;

    Ok(Json(AuthorizeResponse {
        success: true,
        project_id: outcome.project_id,
        platforms: outcome.platforms,
        links: outcome.links,
        badge_granted: outcome.reward_granted,
        message: outcome.message,
    }))
}

async fn revoke(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(params): Query<RevokeParams>,
) -> Result<Json<StatusResponse>> {
    state
        .authorizations
        .revoke(&user.user_id, &params.project_id)
        .await?;

    Ok(Json(StatusResponse {
        success: true,
        message: "Authorization revoked".to_string(),
    }))
}

async fn list_authorizations(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<AuthorizationListResponse>> {
    let authorizations = state.authorizations.list_active(&user.user_id).await?;
    Ok(Json(AuthorizationListResponse { authorizations }))
}

async fn get_links(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(project_id): Path<String>,
) -> Result<Json<LinksResponse>> {
    let links = state
        .authorizations
        .get_links(&user.user_id, &project_id)
        .await?;
    Ok(Json(LinksResponse { project_id, links }))
}

async fn get_stats(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(project_id): Path<String>,
) -> Result<Json<ProjectStats>> {
    Ok(Json(
        state
            .tracker
            .project_stats(&user.user_id, &project_id)
            .await?,
    ))
}

/// Anonymous view/click ping from a shared link.
async fn track_event(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<TrackRequest>,
) -> Result<Json<StatusResponse>> {
    state
        .tracker
        .track(&payload.project_id, payload.platform, payload.event_type)
        .await?;

    Ok(Json(StatusResponse {
        success: true,
        message: "Event tracked".to_string(),
    }))
}

async fn list_platforms() -> Json<PlatformsResponse> {
    Json(PlatformsResponse {
        platforms: SocialPlatform::ALL.iter().map(|p| p.video_spec()).collect(),
    })
}
