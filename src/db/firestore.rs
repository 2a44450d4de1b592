// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Users (accounts, email uniqueness, rewards)
//! - Projects
//! - Social authorizations (keyed by user + project)
//! - Social stats (keyed by project + platform)

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::db::{collections, SocialStore};
use crate::error::AppError;
use crate::models::{EventType, Project, SocialAuthorization, SocialPlatform, SocialStats, User};

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: firestore::FirestoreDb,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // If the emulator environment variable is set, use unauthenticated connection
        // to avoid local credential warnings and leakage.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self { client })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self { client })
    }
}

/// Firestore rejects some document IDs (for example any containing `/`)
/// before the request is sent. No document can live under such an ID, so
/// the lookup is a miss rather than a store failure.
fn missing_if_invalid_id<T>(
    result: Result<Option<T>, firestore::errors::FirestoreError>,
) -> Result<Option<T>, AppError> {
    match result {
        Ok(found) => Ok(found),
        Err(firestore::errors::FirestoreError::InvalidParametersError(e)) => {
            tracing::debug!(error = ?e, "Lookup with invalid document ID");
            Ok(None)
        }
        Err(e) => Err(AppError::Database(e.to_string())),
    }
}

/// Uniqueness record for a registered email.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct EmailClaim {
    user_id: String,
    email: String,
}

impl EmailClaim {
    fn doc_id(email: &str) -> String {
        urlencoding::encode(&email.to_lowercase()).into_owned()
    }
}

/// Record that a one-time badge reward was issued.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct BadgeGrant {
    user_id: String,
    badge: String,
    points: u64,
    granted_at: chrono::DateTime<chrono::Utc>,
}

impl BadgeGrant {
    fn doc_id(user_id: &str, badge: &str) -> String {
        format!(
            "{}__{}",
            urlencoding::encode(user_id),
            urlencoding::encode(badge)
        )
    }
}

impl FirestoreDb {
    async fn apply_badge(&self, user_id: &str, badge: &str, points: u64) -> Result<(), AppError> {
        let mut transaction = self
            .client
            .begin_transaction()
            .await
            .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

        self.client
            .fluent()
            .update()
            .in_col(collections::USERS)
            .document_id(user_id)
            .transforms(|t| {
                t.fields([
                    t.field("visupoints").increment(points as i64),
                    t.field("badges").append_missing_elements([badge]),
                ])
            })
            .only_transform()
            .add_to_transaction(&mut transaction)
            .map_err(|e| {
                AppError::Database(format!("Failed to add reward to transaction: {}", e))
            })?;

        transaction
            .commit()
            .await
            .map_err(|e| AppError::Database(format!("Transaction commit failed: {}", e)))?;

        Ok(())
    }

    /// Best-effort removal of a claim document after the write it guarded failed.
    async fn release(&self, collection: &str, doc_id: &str) {
        if let Err(e) = self
            .client
            .fluent()
            .delete()
            .from(collection)
            .document_id(doc_id)
            .execute()
            .await
        {
            tracing::warn!(collection, doc_id, error = %e, "Failed to release claim document");
        }
    }
}

#[async_trait]
impl SocialStore for FirestoreDb {
    // ─── User Operations ─────────────────────────────────────────

    async fn get_user(&self, user_id: &str) -> Result<Option<User>, AppError> {
        missing_if_invalid_id(
            self.client
                .fluent()
                .select()
                .by_id_in(collections::USERS)
                .obj()
                .one(user_id)
                .await,
        )
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let users: Vec<User> = self
            .client
            .fluent()
            .select()
            .from(collections::USERS)
            .filter(|q| q.for_all([q.field("email").eq(email)]))
            .limit(1)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(users.into_iter().next())
    }

    /// The email claim document is written create-only first, so two
    /// concurrent registrations for one address cannot both succeed.
    async fn create_user(&self, user: &User) -> Result<(), AppError> {
        let claim_id = EmailClaim::doc_id(&user.email);
        let claim = EmailClaim {
            user_id: user.id.clone(),
            email: user.email.to_lowercase(),
        };

        let claimed: Result<EmailClaim, _> = self
            .client
            .fluent()
            .insert()
            .into(collections::USER_EMAILS)
            .document_id(&claim_id)
            .object(&claim)
            .execute()
            .await;

        match claimed {
            Ok(_) => {}
            Err(firestore::errors::FirestoreError::DataConflictError(_)) => {
                return Err(AppError::Conflict("Email already registered".to_string()));
            }
            Err(e) => return Err(AppError::Database(e.to_string())),
        }

        let created: Result<User, _> = self
            .client
            .fluent()
            .insert()
            .into(collections::USERS)
            .document_id(&user.id)
            .object(user)
            .execute()
            .await;

        if let Err(e) = created {
            self.release(collections::USER_EMAILS, &claim_id).await;
            return Err(AppError::Database(e.to_string()));
        }
        Ok(())
    }

    /// Points move through a server-side `increment` transform.
    async fn grant_points(&self, user_id: &str, points: u64) -> Result<(), AppError> {
        if self.get_user(user_id).await?.is_none() {
            return Err(AppError::NotFound(format!("User {} not found", user_id)));
        }

        let mut transaction = self
            .client
            .begin_transaction()
            .await
            .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

        self.client
            .fluent()
            .update()
            .in_col(collections::USERS)
            .document_id(user_id)
            .transforms(|t| t.fields([t.field("visupoints").increment(points as i64)]))
            .only_transform()
            .add_to_transaction(&mut transaction)
            .map_err(|e| {
                AppError::Database(format!("Failed to add reward to transaction: {}", e))
            })?;

        transaction
            .commit()
            .await
            .map_err(|e| AppError::Database(format!("Transaction commit failed: {}", e)))?;

        Ok(())
    }

    /// A create-only grant marker per (user, badge) decides the winner
    /// between concurrent callers. Only the caller that created the marker
    /// applies the `increment` / `appendMissingElements` transforms.
    async fn grant_badge_once(
        &self,
        user_id: &str,
        badge: &str,
        points: u64,
    ) -> Result<bool, AppError> {
        let user = self
            .get_user(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", user_id)))?;
        if user.has_badge(badge) {
            return Ok(false);
        }

        let marker_id = BadgeGrant::doc_id(user_id, badge);
        let marker = BadgeGrant {
            user_id: user_id.to_string(),
            badge: badge.to_string(),
            points,
            granted_at: chrono::Utc::now(),
        };

        let marked: Result<BadgeGrant, _> = self
            .client
            .fluent()
            .insert()
            .into(collections::BADGE_GRANTS)
            .document_id(&marker_id)
            .object(&marker)
            .execute()
            .await;

        match marked {
            Ok(_) => {}
            Err(firestore::errors::FirestoreError::DataConflictError(_)) => return Ok(false),
            Err(e) => return Err(AppError::Database(e.to_string())),
        }

        if let Err(e) = self.apply_badge(user_id, badge, points).await {
            self.release(collections::BADGE_GRANTS, &marker_id).await;
            return Err(e);
        }
        Ok(true)
    }

    // ─── Project Operations ──────────────────────────────────────

    async fn get_project(&self, project_id: &str) -> Result<Option<Project>, AppError> {
        missing_if_invalid_id(
            self.client
                .fluent()
                .select()
                .by_id_in(collections::PROJECTS)
                .obj()
                .one(project_id)
                .await,
        )
    }

    async fn list_projects_for_user(&self, user_id: &str) -> Result<Vec<Project>, AppError> {
        let mut projects: Vec<Project> = self
            .client
            .fluent()
            .select()
            .from(collections::PROJECTS)
            .filter(|q| q.for_all([q.field("user_id").eq(user_id)]))
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        // Sorted here rather than in the query to avoid a composite index.
        projects.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(projects)
    }

    async fn upsert_project(&self, project: &Project) -> Result<(), AppError> {
        let _: () = self
            .client
            .fluent()
            .update()
            .in_col(collections::PROJECTS)
            .document_id(&project.id)
            .object(project)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    // ─── Authorization Operations ────────────────────────────────

    async fn get_authorization(
        &self,
        user_id: &str,
        project_id: &str,
    ) -> Result<Option<SocialAuthorization>, AppError> {
        self.client
            .fluent()
            .select()
            .by_id_in(collections::SOCIAL_AUTHORIZATIONS)
            .obj()
            .one(&SocialAuthorization::doc_id(user_id, project_id))
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    async fn upsert_authorization(&self, auth: &SocialAuthorization) -> Result<(), AppError> {
        let _: () = self
            .client
            .fluent()
            .update()
            .in_col(collections::SOCIAL_AUTHORIZATIONS)
            .document_id(SocialAuthorization::doc_id(&auth.user_id, &auth.project_id))
            .object(auth)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    async fn list_active_authorizations(
        &self,
        user_id: &str,
    ) -> Result<Vec<SocialAuthorization>, AppError> {
        self.client
            .fluent()
            .select()
            .from(collections::SOCIAL_AUTHORIZATIONS)
            .filter(|q| {
                q.for_all([
                    q.field("user_id").eq(user_id),
                    q.field("revoked").eq(false),
                ])
            })
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    async fn find_active_authorization_for_project(
        &self,
        project_id: &str,
    ) -> Result<Option<SocialAuthorization>, AppError> {
        let auths: Vec<SocialAuthorization> = self
            .client
            .fluent()
            .select()
            .from(collections::SOCIAL_AUTHORIZATIONS)
            .filter(|q| {
                q.for_all([
                    q.field("project_id").eq(project_id),
                    q.field("revoked").eq(false),
                ])
            })
            .limit(1)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(auths.into_iter().next())
    }

    // ─── Stats Operations ────────────────────────────────────────

    /// Uses a create-only insert; an existing document is a conflict we ignore.
    async fn ensure_stats(
        &self,
        project_id: &str,
        platform: SocialPlatform,
    ) -> Result<(), AppError> {
        let stats = SocialStats::zeroed(project_id, platform);

        let result: Result<SocialStats, _> = self
            .client
            .fluent()
            .insert()
            .into(collections::SOCIAL_STATS)
            .document_id(SocialStats::doc_id(project_id, platform))
            .object(&stats)
            .execute()
            .await;

        match result {
            Ok(_) => {
                tracing::debug!(project_id, platform = %platform, "Initialized social stats");
                Ok(())
            }
            Err(firestore::errors::FirestoreError::DataConflictError(_)) => Ok(()),
            Err(e) => Err(AppError::Database(e.to_string())),
        }
    }

    /// One write: the update mask only touches identity fields and the
    /// timestamp, and the counter moves through an `increment` transform.
    /// A missing document is created by the same write.
    async fn record_event(
        &self,
        project_id: &str,
        platform: SocialPlatform,
        event: EventType,
    ) -> Result<(), AppError> {
        let seed = SocialStats::zeroed(project_id, platform);
        let counter = event.counter_field();

        let mut transaction = self
            .client
            .begin_transaction()
            .await
            .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

        self.client
            .fluent()
            .update()
            .fields(["project_id", "platform", "last_updated_at"])
            .in_col(collections::SOCIAL_STATS)
            .document_id(SocialStats::doc_id(project_id, platform))
            .object(&seed)
            .transforms(|t| t.fields([t.field(counter).increment(1)]))
            .add_to_transaction(&mut transaction)
            .map_err(|e| {
                AppError::Database(format!("Failed to add stats to transaction: {}", e))
            })?;

        transaction
            .commit()
            .await
            .map_err(|e| AppError::Database(format!("Transaction commit failed: {}", e)))?;

        Ok(())
    }

    async fn stats_for_project(&self, project_id: &str) -> Result<Vec<SocialStats>, AppError> {
        self.client
            .fluent()
            .select()
            .from(collections::SOCIAL_STATS)
            .filter(|q| q.for_all([q.field("project_id").eq(project_id)]))
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    async fn all_stats(&self) -> Result<Vec<SocialStats>, AppError> {
        self.client
            .fluent()
            .select()
            .from(collections::SOCIAL_STATS)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
