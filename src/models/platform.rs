// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! External social platforms and tracked event kinds.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Official VISUAL channels a project can be shared to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum SocialPlatform {
    YouTube,
    TikTok,
    Facebook,
}

impl SocialPlatform {
    pub const ALL: [SocialPlatform; 3] = [
        SocialPlatform::YouTube,
        SocialPlatform::TikTok,
        SocialPlatform::Facebook,
    ];

    /// Wire/storage tag (`youtube`, `tiktok`, `facebook`).
    pub fn as_str(&self) -> &'static str {
        match self {
            SocialPlatform::YouTube => "youtube",
            SocialPlatform::TikTok => "tiktok",
            SocialPlatform::Facebook => "facebook",
        }
    }

    /// Excerpt format each platform expects.
    pub fn video_spec(&self) -> VideoSpec {
        let (duration_secs, aspect_ratio) = match self {
            SocialPlatform::YouTube => (60, "16:9"),
            SocialPlatform::TikTok => (30, "9:16"),
            SocialPlatform::Facebook => (45, "1:1"),
        };
        VideoSpec {
            platform: *self,
            duration_secs,
            aspect_ratio: aspect_ratio.to_string(),
            format: "mp4".to_string(),
        }
    }
}

impl fmt::Display for SocialPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SocialPlatform {
    type Err = crate::error::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SocialPlatform::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| crate::error::AppError::UnsupportedPlatform(s.to_string()))
    }
}

/// Kind of tracking ping received from a shared link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum EventType {
    View,
    Click,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::View => "view",
            EventType::Click => "click",
        }
    }

    /// Counter field on `SocialStats` this event increments.
    pub fn counter_field(&self) -> &'static str {
        match self {
            EventType::View => "views",
            EventType::Click => "clicks",
        }
    }
}

/// Video excerpt requirements for a platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct VideoSpec {
    pub platform: SocialPlatform,
    pub duration_secs: u32,
    pub aspect_ratio: String,
    pub format: String,
}
