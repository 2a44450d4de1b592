// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User model for storage and API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User account stored in the `users` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Account ID (also used as document ID)
    pub id: String,
    /// Login email, unique across accounts
    pub email: String,
    /// Display name
    pub full_name: String,
    /// PBKDF2 credential hash
    pub hashed_password: String,
    /// Cumulative VISUpoints, only ever incremented
    #[serde(default)]
    pub visupoints: u64,
    /// Earned badge names; append-only, no duplicates
    #[serde(default)]
    pub badges: Vec<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
    /// When the account was registered
    pub created_at: DateTime<Utc>,
}

fn default_active() -> bool {
    true
}

impl User {
    pub fn new(email: String, full_name: String, hashed_password: String) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            email,
            full_name,
            hashed_password,
            visupoints: 0,
            badges: Vec::new(),
            is_active: true,
            created_at: Utc::now(),
        }
    }

    pub fn has_badge(&self, badge: &str) -> bool {
        self.badges.iter().any(|b| b == badge)
    }
}
