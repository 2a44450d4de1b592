// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Project model: a piece of content owned by one user.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stored project record in the `projects` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    /// Project ID (also used as document ID)
    pub id: String,
    /// Owning user ID
    pub user_id: String,
    pub title: String,
    pub description: String,
    pub video_url: Option<String>,
    pub thumbnail_url: Option<String>,
    /// Denormalized view counter
    #[serde(default)]
    pub views: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Project {
    pub fn new(
        user_id: String,
        title: String,
        description: String,
        video_url: Option<String>,
        thumbnail_url: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_id,
            title,
            description,
            video_url,
            thumbnail_url,
            views: 0,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.user_id == user_id
    }
}
