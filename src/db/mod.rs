// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Database layer.
//!
//! Core services talk to the store only through [`SocialStore`], so the
//! Firestore backend and the in-process backend are interchangeable.

pub mod firestore;
pub mod memory;

pub use firestore::FirestoreDb;
pub use memory::MemoryDb;

use async_trait::async_trait;

use crate::error::AppError;
use crate::models::{EventType, Project, SocialAuthorization, SocialPlatform, SocialStats, User};

/// Collection names as constants.
pub mod collections {
    pub const USERS: &str = "users";
    /// One document per registered email, keyed by the normalized address
    pub const USER_EMAILS: &str = "user_emails";
    /// One document per (user, badge) one-time reward
    pub const BADGE_GRANTS: &str = "badge_grants";
    pub const PROJECTS: &str = "projects";
    pub const SOCIAL_AUTHORIZATIONS: &str = "social_authorizations";
    /// Per-(project, platform) counters
    pub const SOCIAL_STATS: &str = "social_stats";
}

/// Persistent record store used by the core services.
///
/// Counter mutations (`record_event`, `grant_points`, `grant_badge_once`)
/// must be atomic in the backend, never read-modify-write across calls.
#[async_trait]
pub trait SocialStore: Send + Sync {
    // ─── Users ───────────────────────────────────────────────────

    async fn get_user(&self, user_id: &str) -> Result<Option<User>, AppError>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    /// Create-only. Fails with `Conflict` when the email (compared
    /// case-insensitively) already belongs to an account.
    async fn create_user(&self, user: &User) -> Result<(), AppError>;

    /// Add `points` to the user's VISUpoints.
    async fn grant_points(&self, user_id: &str, points: u64) -> Result<(), AppError>;

    /// Append `badge` and add `points` in one atomic step, but only if the
    /// user does not hold the badge yet. Returns `true` when this call
    /// granted it.
    async fn grant_badge_once(
        &self,
        user_id: &str,
        badge: &str,
        points: u64,
    ) -> Result<bool, AppError>;

    // ─── Projects ────────────────────────────────────────────────

    async fn get_project(&self, project_id: &str) -> Result<Option<Project>, AppError>;

    /// Projects owned by a user, newest first.
    async fn list_projects_for_user(&self, user_id: &str) -> Result<Vec<Project>, AppError>;

    async fn upsert_project(&self, project: &Project) -> Result<(), AppError>;

    // ─── Authorizations ──────────────────────────────────────────

    async fn get_authorization(
        &self,
        user_id: &str,
        project_id: &str,
    ) -> Result<Option<SocialAuthorization>, AppError>;

    /// Write the authorization for its (user, project) pair, replacing any previous one.
    async fn upsert_authorization(&self, auth: &SocialAuthorization) -> Result<(), AppError>;

    async fn list_active_authorizations(
        &self,
        user_id: &str,
    ) -> Result<Vec<SocialAuthorization>, AppError>;

    async fn find_active_authorization_for_project(
        &self,
        project_id: &str,
    ) -> Result<Option<SocialAuthorization>, AppError>;

    // ─── Stats ───────────────────────────────────────────────────

    /// Create a zeroed stats record if none exists. Existing counters are untouched.
    async fn ensure_stats(&self, project_id: &str, platform: SocialPlatform)
        -> Result<(), AppError>;

    /// Create the record seeded with this event, or atomically increment it.
    async fn record_event(
        &self,
        project_id: &str,
        platform: SocialPlatform,
        event: EventType,
    ) -> Result<(), AppError>;

    async fn stats_for_project(&self, project_id: &str) -> Result<Vec<SocialStats>, AppError>;

    async fn all_stats(&self) -> Result<Vec<SocialStats>, AppError>;
}
