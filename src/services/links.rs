// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Tracked share-link generation.

use std::collections::BTreeMap;

use crate::models::SocialPlatform;

/// Builds UTM-tagged share URLs pointing at a project page.
#[derive(Debug, Clone)]
pub struct LinkGenerator {
    base_url: String,
}

impl LinkGenerator {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Share link for one platform.
    pub fn share_link(&self, project_id: &str, platform: SocialPlatform) -> String {
        format!(
            "{}/project/{project_id}?utm_source={}&utm_medium=official_social&utm_campaign=project_{project_id}",
            self.base_url,
            platform.as_str(),
        )
    }

    /// Share links keyed by platform. Pure function of its inputs.
    pub fn share_links(
        &self,
        project_id: &str,
        platforms: &[SocialPlatform],
    ) -> BTreeMap<SocialPlatform, String> {
        platforms
            .iter()
            .map(|&platform| (platform, self.share_link(project_id, platform)))
            .collect()
    }
}
