// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod authorization;
pub mod leaderboard;
pub mod platform;
pub mod project;
pub mod stats;
pub mod user;

pub use authorization::SocialAuthorization;
pub use leaderboard::LeaderboardEntry;
pub use platform::{EventType, SocialPlatform, VideoSpec};
pub use project::Project;
pub use stats::SocialStats;
pub use user::User;
