// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Monthly leaderboard aggregation.
//!
//! Stats rows are joined to their project, summed per owning user, joined
//! to the user record, then ranked by views and clicks. The join runs
//! in-process so any [`SocialStore`] backend can serve it.

use futures_util::{stream, StreamExt};
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use crate::db::SocialStore;
use crate::error::{AppError, Result};
use crate::models::{LeaderboardEntry, SocialStats};

pub const LEADERBOARD_SIZE: usize = 20;
const MAX_CONCURRENT_DB_OPS: usize = 50;

/// Period-end reward for a rank: 1st +500, 2nd-5th +200, 6th-10th +100.
pub fn reward_for_rank(rank: u32) -> Option<u64> {
    match rank {
        1 => Some(500),
        2..=5 => Some(200),
        6..=10 => Some(100),
        _ => None,
    }
}

/// Summed counters for one user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserTotals {
    pub total_views: u64,
    pub total_clicks: u64,
}

/// Sum stats per owning user. Rows whose project has no known owner are skipped.
pub fn totals_by_user(
    stats: &[SocialStats],
    project_owners: &HashMap<String, String>,
) -> HashMap<String, UserTotals> {
    let mut totals: HashMap<String, UserTotals> = HashMap::new();
    for row in stats {
        if let Some(owner) = project_owners.get(&row.project_id) {
            let entry = totals.entry(owner.clone()).or_default();
            entry.total_views += row.views;
            entry.total_clicks += row.clicks;
        }
    }
    totals
}

/// Sort, truncate to [`LEADERBOARD_SIZE`] and assign ranks 1..N.
///
/// Views descending, then clicks descending; user ID breaks exact ties so
/// the order is stable. Ranks have no gaps, even on ties.
pub fn rank_entries(mut entries: Vec<LeaderboardEntry>) -> Vec<LeaderboardEntry> {
    entries.sort_by(|a, b| {
        b.total_views
            .cmp(&a.total_views)
            .then_with(|| b.total_clicks.cmp(&a.total_clicks))
            .then_with(|| a.user_id.cmp(&b.user_id))
    });
    entries.truncate(LEADERBOARD_SIZE);

    for (i, entry) in entries.iter_mut().enumerate() {
        entry.rank = (i + 1) as u32;
    }
    entries
}

#[derive(Clone)]
pub struct LeaderboardAggregator {
    db: Arc<dyn SocialStore>,
}

impl LeaderboardAggregator {
    pub fn new(db: Arc<dyn SocialStore>) -> Self {
        Self { db }
    }

    /// Current top [`LEADERBOARD_SIZE`] users. Read-only.
    pub async fn compute(&self) -> Result<Vec<LeaderboardEntry>> {
        let stats = self.db.all_stats().await?;

        let project_ids: BTreeSet<String> = stats.iter().map(|s| s.project_id.clone()).collect();
        let db = &self.db;

        let project_owners: HashMap<String, String> = stream::iter(project_ids)
            .map(|project_id| async move {
                let project = db.get_project(&project_id).await?;
                Ok::<_, AppError>(project.map(|p| (project_id, p.user_id)))
            })
            .buffer_unordered(MAX_CONCURRENT_DB_OPS)
            .collect::<Vec<Result<_>>>()
            .await
            .into_iter()
            .collect::<Result<Vec<_>>>()?
            .into_iter()
            .flatten()
            .collect();

        let totals = totals_by_user(&stats, &project_owners);

        let entries: Vec<LeaderboardEntry> = stream::iter(totals)
            .map(|(user_id, totals)| async move {
                let user = db.get_user(&user_id).await?;
                Ok::<_, AppError>(user.map(|u| LeaderboardEntry {
                    user_id,
                    full_name: u.full_name,
                    visupoints: u.visupoints,
                    total_views: totals.total_views,
                    total_clicks: totals.total_clicks,
                    badges: u.badges,
                    rank: 0,
                }))
            })
            .buffer_unordered(MAX_CONCURRENT_DB_OPS)
            .collect::<Vec<Result<_>>>()
            .await
            .into_iter()
            .collect::<Result<Vec<_>>>()?
            .into_iter()
            .flatten()
            .collect();

        tracing::debug!(
            stats_rows = stats.len(),
            ranked_users = entries.len(),
            "Leaderboard computed"
        );

        Ok(rank_entries(entries))
    }

    /// Grant period-end tier rewards to the current top 10.
    ///
    /// Intended for an external end-of-period job; nothing in the request
    /// path calls it. Returns `(user_id, points)` for each grant.
    pub async fn settle_rewards(&self) -> Result<Vec<(String, u64)>> {
        let mut granted = Vec::new();

        for entry in self.compute().await? {
            let Some(points) = reward_for_rank(entry.rank) else {
                continue;
            };
            self.db.grant_points(&entry.user_id, points).await?;
            tracing::info!(
                user_id = %entry.user_id,
                rank = entry.rank,
                points,
                "Leaderboard reward granted"
            );
            granted.push((entry.user_id, points));
        }

        Ok(granted)
    }
}
