// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Per-platform promotion counters.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{EventType, SocialPlatform};

/// Cumulative counters for one (project, platform) pair.
///
/// Stored at: `social_stats/{project_id}_{platform}`
///
/// Counters only move through atomic increments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SocialStats {
    pub project_id: String,
    pub platform: SocialPlatform,
    #[serde(default)]
    pub views: u64,
    #[serde(default)]
    pub clicks: u64,
    #[serde(default = "Utc::now")]
    pub last_updated_at: DateTime<Utc>,
}

impl SocialStats {
    /// Fresh record with both counters at zero.
    pub fn zeroed(project_id: &str, platform: SocialPlatform) -> Self {
        Self {
            project_id: project_id.to_string(),
            platform,
            views: 0,
            clicks: 0,
            last_updated_at: Utc::now(),
        }
    }

    /// Fresh record seeded by its first tracked event.
    pub fn from_first_event(project_id: &str, platform: SocialPlatform, event: EventType) -> Self {
        let mut stats = Self::zeroed(project_id, platform);
        let now = stats.last_updated_at;
        stats.apply(event, now);
        stats
    }

    /// Document ID for the (project, platform) pair.
    ///
    /// Tracked project IDs are caller-supplied, so they are URL-encoded
    /// to stay valid as document IDs.
    pub fn doc_id(project_id: &str, platform: SocialPlatform) -> String {
        format!("{}_{}", urlencoding::encode(project_id), platform.as_str())
    }

    /// Count one event and refresh the timestamp.
    pub fn apply(&mut self, event: EventType, now: DateTime<Utc>) {
        match event {
            EventType::View => self.views += 1,
            EventType::Click => self.clicks += 1,
        }
        self.last_updated_at = now;
    }
}
