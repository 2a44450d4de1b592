// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Publication to the official VISUAL channels.
//!
//! Each platform is a [`PlatformPublisher`]. A publisher without a
//! configured credential returns a deterministic mock result instead of
//! failing, so the rest of the system runs end-to-end without live keys.
//!
//! The live paths are placeholder integrations. They hand the platform the
//! project's public `video_url` and fail fast when there is none. No
//! excerpt rendering or OAuth flow exists here, and YouTube needs both
//! (see [`YouTubePublisher`]).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use crate::config::Config;
use crate::error::AppError;
use crate::models::{Project, SocialAuthorization, SocialPlatform};

/// Outcome of one publish attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublishResult {
    pub success: bool,
    pub mock: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PublishResult {
    /// Stand-in result used when the platform has no credential.
    pub fn mock(platform: SocialPlatform, project_id: &str, channel_url: &str) -> Self {
        Self {
            success: true,
            mock: true,
            video_id: Some(format!("mock_{}_{}", platform.as_str(), project_id)),
            url: Some(format!("{}/video/{}", channel_url, project_id)),
            message: Some(format!(
                "Mock publication - no {} credential configured",
                platform.as_str()
            )),
            error: None,
        }
    }

    fn published(video_id: String, url: String) -> Self {
        Self {
            success: true,
            mock: false,
            video_id: Some(video_id),
            url: Some(url),
            message: None,
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            mock: false,
            video_id: None,
            url: None,
            message: None,
            error: Some(error.into()),
        }
    }
}

/// Capability to publish a video excerpt to one platform.
#[async_trait]
pub trait PlatformPublisher: Send + Sync {
    fn platform(&self) -> SocialPlatform;

    async fn publish(
        &self,
        media_url: &str,
        title: &str,
        description: &str,
        project_id: &str,
    ) -> Result<PublishResult, AppError>;
}

// ─── YouTube ─────────────────────────────────────────────────────

/// Placeholder: the Data API has no pull-from-URL mode and `videos.insert`
/// takes an OAuth token plus a resumable byte upload. With a credential set
/// this only creates the video resource from metadata, carrying the source
/// URL in the description.
pub struct YouTubePublisher {
    http: reqwest::Client,
    api_key: Option<String>,
    channel_url: String,
}

impl YouTubePublisher {
    pub fn new(http: reqwest::Client, api_key: Option<String>, channel_url: String) -> Self {
        Self {
            http,
            api_key,
            channel_url,
        }
    }
}

#[derive(Deserialize)]
struct YouTubeVideo {
    id: String,
}

#[async_trait]
impl PlatformPublisher for YouTubePublisher {
    fn platform(&self) -> SocialPlatform {
        SocialPlatform::YouTube
    }

    async fn publish(
        &self,
        media_url: &str,
        title: &str,
        description: &str,
        project_id: &str,
    ) -> Result<PublishResult, AppError> {
        let Some(api_key) = &self.api_key else {
            tracing::warn!(project_id, "YouTube API key not configured, using mock publish");
            return Ok(PublishResult::mock(self.platform(), project_id, &self.channel_url));
        };

        require_media_url(media_url, self.platform())?;
        tracing::info!(project_id, title, media_url, "Publishing to YouTube");

        let body = serde_json::json!({
            "snippet": {
                "title": title,
                "description": format!("{}\n\n{}", description, media_url),
            },
            "status": { "privacyStatus": "public" },
        });

        let response = self
            .http
            .post("https://www.googleapis.com/youtube/v3/videos")
            .query(&[("part", "snippet,status")])
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::PlatformApi(format!("YouTube request failed: {}", e)))?;

        let video: YouTubeVideo = check_response_json(response, self.platform()).await?;
        let url = format!("https://www.youtube.com/watch?v={}", video.id);
        Ok(PublishResult::published(video.id, url))
    }
}

// ─── TikTok ──────────────────────────────────────────────────────

pub struct TikTokPublisher {
    http: reqwest::Client,
    api_key: Option<String>,
    channel_url: String,
}

impl TikTokPublisher {
    pub fn new(http: reqwest::Client, api_key: Option<String>, channel_url: String) -> Self {
        Self {
            http,
            api_key,
            channel_url,
        }
    }
}

#[derive(Deserialize)]
struct TikTokInitResponse {
    data: TikTokInitData,
}

#[derive(Deserialize)]
struct TikTokInitData {
    publish_id: String,
}

#[async_trait]
impl PlatformPublisher for TikTokPublisher {
    fn platform(&self) -> SocialPlatform {
        SocialPlatform::TikTok
    }

    async fn publish(
        &self,
        media_url: &str,
        title: &str,
        _description: &str,
        project_id: &str,
    ) -> Result<PublishResult, AppError> {
        let Some(api_key) = &self.api_key else {
            tracing::warn!(project_id, "TikTok API key not configured, using mock publish");
            return Ok(PublishResult::mock(self.platform(), project_id, &self.channel_url));
        };

        require_media_url(media_url, self.platform())?;
        tracing::info!(project_id, title, media_url, "Publishing to TikTok");

        let body = serde_json::json!({
            "post_info": { "title": title },
            "source_info": { "source": "PULL_FROM_URL", "video_url": media_url },
        });

        let response = self
            .http
            .post("https://open.tiktokapis.com/v2/post/publish/video/init/")
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::PlatformApi(format!("TikTok request failed: {}", e)))?;

        let init: TikTokInitResponse = check_response_json(response, self.platform()).await?;
        let url = format!("{}/video/{}", self.channel_url, init.data.publish_id);
        Ok(PublishResult::published(init.data.publish_id, url))
    }
}

// ─── Facebook ────────────────────────────────────────────────────

pub struct FacebookPublisher {
    http: reqwest::Client,
    access_token: Option<String>,
    channel_url: String,
}

impl FacebookPublisher {
    pub fn new(http: reqwest::Client, access_token: Option<String>, channel_url: String) -> Self {
        Self {
            http,
            access_token,
            channel_url,
        }
    }
}

#[derive(Deserialize)]
struct FacebookVideo {
    id: String,
}

#[async_trait]
impl PlatformPublisher for FacebookPublisher {
    fn platform(&self) -> SocialPlatform {
        SocialPlatform::Facebook
    }

    async fn publish(
        &self,
        media_url: &str,
        title: &str,
        description: &str,
        project_id: &str,
    ) -> Result<PublishResult, AppError> {
        let Some(access_token) = &self.access_token else {
            tracing::warn!(project_id, "Facebook access token not configured, using mock publish");
            return Ok(PublishResult::mock(self.platform(), project_id, &self.channel_url));
        };

        require_media_url(media_url, self.platform())?;
        tracing::info!(project_id, title, media_url, "Publishing to Facebook");

        let response = self
            .http
            .post("https://graph-video.facebook.com/v19.0/me/videos")
            .form(&[
                ("title", title),
                ("description", description),
                ("file_url", media_url),
                ("access_token", access_token.as_str()),
            ])
            .send()
            .await
            .map_err(|e| AppError::PlatformApi(format!("Facebook request failed: {}", e)))?;

        let video: FacebookVideo = check_response_json(response, self.platform()).await?;
        let url = format!("{}/videos/{}", self.channel_url, video.id);
        Ok(PublishResult::published(video.id, url))
    }
}

/// Check response status and parse the JSON body.
async fn check_response_json<T: for<'de> Deserialize<'de>>(
    response: reqwest::Response,
    platform: SocialPlatform,
) -> Result<T, AppError> {
    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if status.as_u16() == 429 {
            tracing::warn!(platform = %platform, "Platform rate limit hit (429)");
        }

        return Err(AppError::PlatformApi(format!(
            "{} HTTP {}: {}",
            platform, status, body
        )));
    }

    response
        .json()
        .await
        .map_err(|e| AppError::PlatformApi(format!("{} JSON parse error: {}", platform, e)))
}

// ─── Registry ────────────────────────────────────────────────────

/// Lookup table from platform tag to its publisher.
#[derive(Clone)]
pub struct PublisherRegistry {
    publishers: HashMap<SocialPlatform, Arc<dyn PlatformPublisher>>,
}

impl PublisherRegistry {
    /// Registry over the given publishers, keyed by their own platform.
    pub fn new(publishers: Vec<Arc<dyn PlatformPublisher>>) -> Self {
        Self {
            publishers: publishers.into_iter().map(|p| (p.platform(), p)).collect(),
        }
    }

    /// All three official publishers, using whatever credentials are configured.
    pub fn from_config(config: &Config) -> Self {
        let http = reqwest::Client::new();
        Self::new(vec![
            Arc::new(YouTubePublisher::new(
                http.clone(),
                config.youtube_api_key.clone(),
                config.official_youtube_url.clone(),
            )),
            Arc::new(TikTokPublisher::new(
                http.clone(),
                config.tiktok_api_key.clone(),
                config.official_tiktok_url.clone(),
            )),
            Arc::new(FacebookPublisher::new(
                http,
                config.facebook_access_token.clone(),
                config.official_facebook_url.clone(),
            )),
        ])
    }

    /// Publish to a single platform.
    pub async fn publish(
        &self,
        platform: SocialPlatform,
        media_url: &str,
        title: &str,
        description: &str,
        project_id: &str,
    ) -> Result<PublishResult, AppError> {
        let publisher = self
            .publishers
            .get(&platform)
            .ok_or_else(|| AppError::UnsupportedPlatform(platform.to_string()))?;

        publisher
            .publish(media_url, title, description, project_id)
            .await
    }

    /// Best-effort batch publish of a project.
    ///
    /// Every requested platform gets an entry. Platforms outside the
    /// authorization, and platforms whose publish call fails, get a
    /// failure entry rather than aborting the batch.
    pub async fn publish_project(
        &self,
        project: &Project,
        authorization: &SocialAuthorization,
        platforms: &[SocialPlatform],
    ) -> BTreeMap<SocialPlatform, PublishResult> {
        let mut results = BTreeMap::new();

        for &platform in platforms {
            if !authorization.allows(platform) {
                results.insert(platform, PublishResult::failed("Platform not authorized"));
                continue;
            }

            let media_url = project.video_url.as_deref().unwrap_or_default();
            let result = match self
                .publish(
                    platform,
                    media_url,
                    &project.title,
                    &project.description,
                    &project.id,
                )
                .await
            {
                Ok(result) => result,
                Err(e) => {
                    tracing::warn!(
                        project_id = %project.id,
                        platform = %platform,
                        error = %e,
                        "Publish failed"
                    );
                    PublishResult::failed(e.to_string())
                }
            };
            results.insert(platform, result);
        }

        results
    }
}

/// Live publishing needs a URL the platform can fetch.
fn require_media_url(media_url: &str, platform: SocialPlatform) -> Result<(), AppError> {
    if media_url.starts_with("https://") || media_url.starts_with("http://") {
        Ok(())
    } else {
        Err(AppError::PlatformApi(format!(
            "{} publish needs a public video_url on the project",
            platform
        )))
    }
}
