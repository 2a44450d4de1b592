// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! VISUAL social promotion backend.
//!
//! Project owners authorize VISUAL to share their projects on YouTube,
//! TikTok and Facebook. The service issues tracked share links, counts
//! anonymous views and clicks, rewards ambassadors, and ranks them on a
//! public leaderboard.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::SocialStore;
use services::{
    AuthorizationManager, LeaderboardAggregator, LinkGenerator, PublisherRegistry, StatsTracker,
};
use std::sync::Arc;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: Arc<dyn SocialStore>,
    pub authorizations: AuthorizationManager,
    pub tracker: StatsTracker,
    pub leaderboard: LeaderboardAggregator,
    pub publishers: PublisherRegistry,
}

impl AppState {
    /// Wire the services over a store, with publishers built from `config`.
    pub fn new(config: Config, db: Arc<dyn SocialStore>) -> Self {
        let publishers = PublisherRegistry::from_config(&config);
        Self::with_publishers(config, db, publishers)
    }

    pub fn with_publishers(
        config: Config,
        db: Arc<dyn SocialStore>,
        publishers: PublisherRegistry,
    ) -> Self {
        let links = LinkGenerator::new(config.base_url.clone());
        Self {
            authorizations: AuthorizationManager::new(db.clone(), links),
            tracker: StatsTracker::new(db.clone()),
            leaderboard: LeaderboardAggregator::new(db.clone()),
            publishers,
            config,
            db,
        }
    }
}
