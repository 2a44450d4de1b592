// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-process store for local development and tests.
//!
//! Each collection is a `DashMap`. Counter updates go through
//! `DashMap::entry`, which holds the shard lock for the whole
//! create-or-increment, so concurrent tracking pings never lose updates.

use async_trait::async_trait;
use chrono::Utc;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::Arc;

use crate::db::SocialStore;
use crate::error::AppError;
use crate::models::{EventType, Project, SocialAuthorization, SocialPlatform, SocialStats, User};

#[derive(Default)]
struct Collections {
    users: DashMap<String, User>,
    /// Lowercased email to user ID
    emails: DashMap<String, String>,
    projects: DashMap<String, Project>,
    authorizations: DashMap<String, SocialAuthorization>,
    stats: DashMap<String, SocialStats>,
}

/// Cheaply cloneable handle to an in-memory store.
#[derive(Clone, Default)]
pub struct MemoryDb {
    inner: Arc<Collections>,
}

impl MemoryDb {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SocialStore for MemoryDb {
    async fn get_user(&self, user_id: &str) -> Result<Option<User>, AppError> {
        Ok(self.inner.users.get(user_id).map(|u| u.clone()))
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        Ok(self
            .inner
            .users
            .iter()
            .find(|u| u.email == email)
            .map(|u| u.clone()))
    }

    async fn create_user(&self, user: &User) -> Result<(), AppError> {
        match self.inner.emails.entry(user.email.to_lowercase()) {
            Entry::Occupied(_) => Err(AppError::Conflict("Email already registered".to_string())),
            Entry::Vacant(slot) => {
                // Publish the user before releasing the email shard lock
                self.inner.users.insert(user.id.clone(), user.clone());
                slot.insert(user.id.clone());
                Ok(())
            }
        }
    }

    async fn grant_points(&self, user_id: &str, points: u64) -> Result<(), AppError> {
        let mut user = self
            .inner
            .users
            .get_mut(user_id)
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", user_id)))?;

        user.visupoints += points;
        Ok(())
    }

    async fn grant_badge_once(
        &self,
        user_id: &str,
        badge: &str,
        points: u64,
    ) -> Result<bool, AppError> {
        // The guard holds the shard lock across check and update
        let mut user = self
            .inner
            .users
            .get_mut(user_id)
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", user_id)))?;

        if user.has_badge(badge) {
            return Ok(false);
        }
        user.badges.push(badge.to_string());
        user.visupoints += points;
        Ok(true)
    }

    async fn get_project(&self, project_id: &str) -> Result<Option<Project>, AppError> {
        Ok(self.inner.projects.get(project_id).map(|p| p.clone()))
    }

    async fn list_projects_for_user(&self, user_id: &str) -> Result<Vec<Project>, AppError> {
        let mut projects: Vec<Project> = self
            .inner
            .projects
            .iter()
            .filter(|p| p.user_id == user_id)
            .map(|p| p.clone())
            .collect();
        projects.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(projects)
    }

    async fn upsert_project(&self, project: &Project) -> Result<(), AppError> {
        self.inner
            .projects
            .insert(project.id.clone(), project.clone());
        Ok(())
    }

    async fn get_authorization(
        &self,
        user_id: &str,
        project_id: &str,
    ) -> Result<Option<SocialAuthorization>, AppError> {
        Ok(self
            .inner
            .authorizations
            .get(&SocialAuthorization::doc_id(user_id, project_id))
            .map(|a| a.clone()))
    }

    async fn upsert_authorization(&self, auth: &SocialAuthorization) -> Result<(), AppError> {
        self.inner.authorizations.insert(
            SocialAuthorization::doc_id(&auth.user_id, &auth.project_id),
            auth.clone(),
        );
        Ok(())
    }

    async fn list_active_authorizations(
        &self,
        user_id: &str,
    ) -> Result<Vec<SocialAuthorization>, AppError> {
        let mut auths: Vec<SocialAuthorization> = self
            .inner
            .authorizations
            .iter()
            .filter(|a| a.user_id == user_id && a.is_active())
            .map(|a| a.clone())
            .collect();
        auths.sort_by(|a, b| b.authorized_at.cmp(&a.authorized_at));
        Ok(auths)
    }

    async fn find_active_authorization_for_project(
        &self,
        project_id: &str,
    ) -> Result<Option<SocialAuthorization>, AppError> {
        Ok(self
            .inner
            .authorizations
            .iter()
            .find(|a| a.project_id == project_id && a.is_active())
            .map(|a| a.clone()))
    }

    async fn ensure_stats(
        &self,
        project_id: &str,
        platform: SocialPlatform,
    ) -> Result<(), AppError> {
        self.inner
            .stats
            .entry(SocialStats::doc_id(project_id, platform))
            .or_insert_with(|| SocialStats::zeroed(project_id, platform));
        Ok(())
    }

    async fn record_event(
        &self,
        project_id: &str,
        platform: SocialPlatform,
        event: EventType,
    ) -> Result<(), AppError> {
        let now = Utc::now();
        self.inner
            .stats
            .entry(SocialStats::doc_id(project_id, platform))
            .and_modify(|s| s.apply(event, now))
            .or_insert_with(|| SocialStats::from_first_event(project_id, platform, event));
        Ok(())
    }

    async fn stats_for_project(&self, project_id: &str) -> Result<Vec<SocialStats>, AppError> {
        Ok(self
            .inner
            .stats
            .iter()
            .filter(|s| s.project_id == project_id)
            .map(|s| s.clone())
            .collect())
    }

    async fn all_stats(&self) -> Result<Vec<SocialStats>, AppError> {
        Ok(self.inner.stats.iter().map(|s| s.clone()).collect())
    }
}
