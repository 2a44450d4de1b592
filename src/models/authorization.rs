// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Sharing consent records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::SocialPlatform;

/// A user's consent to share one project on a set of platforms.
///
/// One record per (user, project) pair. Revocation is a soft delete:
/// the record is kept and flagged so history survives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SocialAuthorization {
    pub id: String,
    pub user_id: String,
    pub project_id: String,
    pub platforms: Vec<SocialPlatform>,
    pub authorized_at: DateTime<Utc>,
    pub authorized_ip: Option<String>,
    #[serde(default)]
    pub revoked: bool,
    #[serde(default)]
    pub revoked_at: Option<DateTime<Utc>>,
}

impl SocialAuthorization {
    pub fn new(
        user_id: &str,
        project_id: &str,
        platforms: Vec<SocialPlatform>,
        authorized_ip: Option<String>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            project_id: project_id.to_string(),
            platforms,
            authorized_at: Utc::now(),
            authorized_ip,
            revoked: false,
            revoked_at: None,
        }
    }

    /// Document ID for the (user, project) pair.
    pub fn doc_id(user_id: &str, project_id: &str) -> String {
        format!(
            "{}_{}",
            urlencoding::encode(user_id),
            urlencoding::encode(project_id)
        )
    }

    /// Overwrite the platform set and clear any revocation.
    pub fn reauthorize(
        &mut self,
        platforms: Vec<SocialPlatform>,
        authorized_ip: Option<String>,
        now: DateTime<Utc>,
    ) {
        self.platforms = platforms;
        self.authorized_ip = authorized_ip;
        self.authorized_at = now;
        self.revoked = false;
        self.revoked_at = None;
    }

    pub fn revoke(&mut self, now: DateTime<Utc>) {
        self.revoked = true;
        self.revoked_at = Some(now);
    }

    pub fn is_active(&self) -> bool {
        !self.revoked
    }

    pub fn allows(&self, platform: SocialPlatform) -> bool {
        self.platforms.contains(&platform)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reauthorize_clears_revocation() {
        let mut auth =
            SocialAuthorization::new("u1", "p1", vec![SocialPlatform::YouTube], None);
        let original_id = auth.id.clone();

        auth.revoke(Utc::now());
        assert!(!auth.is_active());
        assert!(auth.revoked_at.is_some());

        auth.reauthorize(
            vec![SocialPlatform::TikTok],
            Some("10.0.0.1".to_string()),
            Utc::now(),
        );

        assert!(auth.is_active());
        assert_eq!(auth.revoked_at, None);
        assert_eq!(auth.id, original_id);
        assert!(auth.allows(SocialPlatform::TikTok));
        assert!(!auth.allows(SocialPlatform::YouTube));
    }

    #[test]
    fn test_doc_id_is_pair_scoped() {
        assert_eq!(SocialAuthorization::doc_id("u1", "p1"), "u1_p1");
        assert_ne!(
            SocialAuthorization::doc_id("u1", "p1"),
            SocialAuthorization::doc_id("u1", "p2")
        );
        assert_eq!(SocialAuthorization::doc_id("u/1", "p"), "u%2F1_p");
    }
}
