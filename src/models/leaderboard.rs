// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Derived leaderboard rows (never persisted).

use serde::Serialize;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// One ranked user on the monthly leaderboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct LeaderboardEntry {
    pub user_id: String,
    pub full_name: String,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub visupoints: u64,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub total_views: u64,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub total_clicks: u64,
    pub badges: Vec<String>,
    pub rank: u32,
}
