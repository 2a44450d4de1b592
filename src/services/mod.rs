// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod authorization;
pub mod credentials;
pub mod leaderboard;
pub mod links;
pub mod publish;
pub mod tracker;

pub use authorization::{AuthorizationManager, AuthorizeOutcome};
pub use leaderboard::LeaderboardAggregator;
pub use links::LinkGenerator;
pub use publish::{PlatformPublisher, PublishResult, PublisherRegistry};
pub use tracker::{ProjectStats, StatsTracker};
