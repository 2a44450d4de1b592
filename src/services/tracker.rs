// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! View/click tracking for shared links.

use serde::Serialize;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::db::SocialStore;
use crate::error::{AppError, Result};
use crate::models::{EventType, SocialPlatform};

/// Counters for one platform of a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct PlatformStats {
    pub platform: SocialPlatform,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub views: u64,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub clicks: u64,
    pub last_updated_at: String,
}

/// Totals across platforms plus the per-platform breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ProjectStats {
    pub project_id: String,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub total_views: u64,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub total_clicks: u64,
    pub by_platform: Vec<PlatformStats>,
}

#[derive(Clone)]
pub struct StatsTracker {
    db: Arc<dyn SocialStore>,
}

impl StatsTracker {
    pub fn new(db: Arc<dyn SocialStore>) -> Self {
        Self { db }
    }

    /// Count one anonymous event.
    ///
    /// The project ID is not checked: events for unknown projects create
    /// orphan stats rows, which the leaderboard ignores.
    pub async fn track(
        &self,
        project_id: &str,
        platform: SocialPlatform,
        event: EventType,
    ) -> Result<()> {
        if project_id.trim().is_empty() {
            return Err(AppError::BadRequest("project_id is required".to_string()));
        }

        self.db.record_event(project_id, platform, event).await?;

        tracing::debug!(project_id, platform = %platform, event = event.as_str(), "Tracked event");
        Ok(())
    }

    /// Stats for a project owned by `user_id`.
    pub async fn project_stats(&self, user_id: &str, project_id: &str) -> Result<ProjectStats> {
        self.db
            .get_project(project_id)
            .await?
            .filter(|p| p.is_owned_by(user_id))
            .ok_or_else(|| AppError::NotFound(format!("Project {} not found", project_id)))?;

        let mut rows = self.db.stats_for_project(project_id).await?;
        rows.sort_by_key(|s| s.platform);

        let by_platform: Vec<PlatformStats> = rows
            .into_iter()
            .map(|s| PlatformStats {
                platform: s.platform,
                views: s.views,
                clicks: s.clicks,
                last_updated_at: crate::time_utils::format_utc_rfc3339(s.last_updated_at),
            })
            .collect();

        Ok(ProjectStats {
            project_id: project_id.to_string(),
            total_views: by_platform.iter().map(|s| s.views).sum(),
            total_clicks: by_platform.iter().map(|s| s.clicks).sum(),
            by_platform,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryDb;
    use crate::models::{Project, User};

    #[tokio::test]
    async fn test_counts_match_events() {
        let db = Arc::new(MemoryDb::new());
        let user = User::new("t@visual.app".into(), "T".into(), "hash".into());
        db.create_user(&user).await.unwrap();
        let project = Project::new(user.id.clone(), "Demo".into(), "".into(), None, None);
        db.upsert_project(&project).await.unwrap();

        let tracker = StatsTracker::new(db.clone());
        for _ in 0..7 {
            tracker
                .track(&project.id, SocialPlatform::Facebook, EventType::View)
                .await
                .unwrap();
        }
        for _ in 0..2 {
            tracker
                .track(&project.id, SocialPlatform::Facebook, EventType::Click)
                .await
                .unwrap();
        }
        tracker
            .track(&project.id, SocialPlatform::YouTube, EventType::Click)
            .await
            .unwrap();

        let stats = tracker.project_stats(&user.id, &project.id).await.unwrap();
        assert_eq!(stats.total_views, 7);
        assert_eq!(stats.total_clicks, 3);
        assert_eq!(stats.by_platform.len(), 2);
        assert_eq!(stats.by_platform[0].platform, SocialPlatform::YouTube);
        assert_eq!(stats.by_platform[1].views, 7);
    }

    #[tokio::test]
    async fn test_unknown_project_creates_orphan_row() {
        let db = Arc::new(MemoryDb::new());
        let tracker = StatsTracker::new(db.clone());

        tracker
            .track("no-such-project", SocialPlatform::TikTok, EventType::View)
            .await
            .unwrap();

        assert_eq!(db.stats_for_project("no-such-project").await.unwrap().len(), 1);
        let err = tracker
            .project_stats("anyone", "no-such-project")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_blank_project_id_rejected() {
        let tracker = StatsTracker::new(Arc::new(MemoryDb::new()));
        let err = tracker
            .track("  ", SocialPlatform::TikTok, EventType::Click)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }
}
