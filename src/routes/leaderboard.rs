// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Public ambassador leaderboard.

use axum::{extract::State, routing::get, Json, Router};
use std::sync::Arc;

use crate::error::Result;
use crate::models::LeaderboardEntry;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/leaderboard", get(get_leaderboard))
}

/// Top users by total shared-link views, computed on read.
async fn get_leaderboard(State(state): State<Arc<AppState>>) -> Result<Json<Vec<LeaderboardEntry>>> {
    Ok(Json(state.leaderboard.compute().await?))
}
