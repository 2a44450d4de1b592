// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Sharing consent: authorize, revoke, list, and regenerate links.
//!
//! The first authorization recorded for a (user, project) pair earns the
//! "Ambassadeur VISUAL" badge and a one-time VISUpoints bonus, unless the
//! user already holds the badge.

use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::db::SocialStore;
use crate::error::{AppError, Result};
use crate::models::{Project, SocialAuthorization, SocialPlatform};
use crate::services::links::LinkGenerator;

pub const AMBASSADOR_BADGE: &str = "Ambassadeur VISUAL";
pub const AMBASSADOR_REWARD_POINTS: u64 = 100;

/// Result of an authorize call.
#[derive(Debug, Clone)]
pub struct AuthorizeOutcome {
    pub project_id: String,
    pub platforms: Vec<SocialPlatform>,
    pub links: BTreeMap<SocialPlatform, String>,
    /// Whether this call granted the ambassador badge and bonus.
    pub reward_granted: bool,
    pub message: String,
}

/// Manages per-project sharing consent.
#[derive(Clone)]
pub struct AuthorizationManager {
    db: Arc<dyn SocialStore>,
    links: LinkGenerator,
}

impl AuthorizationManager {
    pub fn new(db: Arc<dyn SocialStore>, links: LinkGenerator) -> Self {
        Self { db, links }
    }

    /// Record consent to share `project_id` on `platforms`.
    ///
    /// Re-authorizing an existing pair overwrites the platform set and
    /// clears any revocation. Stats rows are created for each platform if
    /// missing; existing counters are never reset.
    pub async fn authorize(
        &self,
        user_id: &str,
        project_id: &str,
        platforms: &[SocialPlatform],
        caller_ip: Option<String>,
    ) -> Result<AuthorizeOutcome> {
        let platforms = dedup_platforms(platforms);
        if platforms.is_empty() {
            return Err(AppError::BadRequest(
                "At least one platform is required".to_string(),
            ));
        }

        self.owned_project(user_id, project_id).await?;

        // Find-then-upsert is not atomic; concurrent calls for the same
        // pair collapse onto one document, last writer wins. Both may see
        // `is_first`, which is why the reward grant is atomic in the store.
        let existing = self.db.get_authorization(user_id, project_id).await?;
        let is_first = existing.is_none();

        let authorization = match existing {
            Some(mut auth) => {
                auth.reauthorize(platforms.clone(), caller_ip, Utc::now());
                auth
            }
            None => SocialAuthorization::new(user_id, project_id, platforms.clone(), caller_ip),
        };
        self.db.upsert_authorization(&authorization).await?;

        for &platform in &platforms {
            self.db.ensure_stats(project_id, platform).await?;
        }

        let reward_granted = if is_first {
            self.grant_ambassador_reward(user_id).await?
        } else {
            false
        };

        tracing::info!(
            user_id,
            project_id,
            platforms = ?platforms,
            first_authorization = is_first,
            reward_granted,
            "Sharing authorized"
        );

        let message = if reward_granted {
            format!(
                "Authorization recorded. You earned the '{}' badge and {} VISUpoints!",
                AMBASSADOR_BADGE, AMBASSADOR_REWARD_POINTS
            )
        } else {
            "Authorization recorded.".to_string()
        };

        Ok(AuthorizeOutcome {
            project_id: project_id.to_string(),
            links: self.links.share_links(project_id, &platforms),
            platforms,
            reward_granted,
            message,
        })
    }

    /// Soft-delete the authorization for (user, project).
    pub async fn revoke(&self, user_id: &str, project_id: &str) -> Result<()> {
        let mut authorization = self
            .db
            .get_authorization(user_id, project_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("No authorization found for project {}", project_id))
            })?;

        authorization.revoke(Utc::now());
        self.db.upsert_authorization(&authorization).await?;

        tracing::info!(user_id, project_id, "Sharing authorization revoked");
        Ok(())
    }

    /// All non-revoked authorizations of a user.
    pub async fn list_active(&self, user_id: &str) -> Result<Vec<SocialAuthorization>> {
        self.db.list_active_authorizations(user_id).await
    }

    /// Share links from the stored platform set of an active authorization.
    pub async fn get_links(
        &self,
        user_id: &str,
        project_id: &str,
    ) -> Result<BTreeMap<SocialPlatform, String>> {
        self.owned_project(user_id, project_id).await?;

        let authorization = self
            .db
            .get_authorization(user_id, project_id)
            .await?
            .filter(SocialAuthorization::is_active)
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "No active authorization for project {}",
                    project_id
                ))
            })?;

        Ok(self
            .links
            .share_links(project_id, &authorization.platforms))
    }

    async fn owned_project(&self, user_id: &str, project_id: &str) -> Result<Project> {
        self.db
            .get_project(project_id)
            .await?
            .filter(|p| p.is_owned_by(user_id))
            .ok_or_else(|| AppError::NotFound(format!("Project {} not found", project_id)))
    }

    /// Returns whether this call granted the badge and bonus. The store
    /// decides atomically, so racing first authorizations grant once.
    async fn grant_ambassador_reward(&self, user_id: &str) -> Result<bool> {
        self.db
            .grant_badge_once(user_id, AMBASSADOR_BADGE, AMBASSADOR_REWARD_POINTS)
            .await
    }
}

/// Drop repeated platforms, keeping first-seen order.
fn dedup_platforms(platforms: &[SocialPlatform]) -> Vec<SocialPlatform> {
    let mut unique = Vec::with_capacity(platforms.len());
    for &platform in platforms {
        if !unique.contains(&platform) {
            unique.push(platform);
        }
    }
    unique
}
