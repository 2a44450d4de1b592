// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.
//!
//! Platform credentials are optional: a platform without one publishes
//! through the mock path.

use std::env;

/// Which persistent store backs the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Firestore,
    Memory,
}

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    // --- Environment Variables (non-sensitive) ---
    /// Frontend URL (allowed CORS origin)
    pub frontend_url: String,
    /// Public site URL used to build share links
    pub base_url: String,
    /// GCP project ID
    pub gcp_project_id: String,
    /// Store backend selection
    pub store_backend: StoreBackend,
    /// Server port
    pub port: u16,
    /// Session token lifetime
    pub access_token_expire_minutes: i64,
    /// Official VISUAL channels, used in publish results
    pub official_youtube_url: String,
    pub official_tiktok_url: String,
    pub official_facebook_url: String,
    /// Accounts allowed to trigger official publication
    pub admin_emails: Vec<String>,
    /// bcrypt work factor for new password hashes
    pub password_hash_cost: u32,

    // --- Secrets ---
    /// JWT signing key for session tokens (raw bytes)
    pub jwt_signing_key: Vec<u8>,
    pub youtube_api_key: Option<String>,
    pub tiktok_api_key: Option<String>,
    pub facebook_access_token: Option<String>,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            frontend_url: "http://localhost:3000".to_string(),
            base_url: "https://visual.app".to_string(),
            gcp_project_id: "test-project".to_string(),
            store_backend: StoreBackend::Memory,
            port: 8080,
            access_token_expire_minutes: 43200,
            official_youtube_url: "https://youtube.com/@visualproject".to_string(),
            official_tiktok_url: "https://tiktok.com/@visualproject".to_string(),
            official_facebook_url: "https://facebook.com/visualproject".to_string(),
            admin_emails: vec!["admin@visual.test".to_string()],
            password_hash_cost: 4,
            jwt_signing_key: b"test_jwt_key_32_bytes_minimum!!".to_vec(),
            youtube_api_key: None,
            tiktok_api_key: None,
            facebook_access_token: None,
        }
    }
}

impl Config {
    /// Configuration used by tests: in-memory store, no platform credentials.
    pub fn test_default() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let store_backend = match env::var("STORE_BACKEND")
            .unwrap_or_else(|_| "firestore".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "firestore" => StoreBackend::Firestore,
            "memory" => StoreBackend::Memory,
            _ => return Err(ConfigError::Invalid("STORE_BACKEND")),
        };

        let password_hash_cost = match env::var("BCRYPT_COST") {
            Ok(v) => v
                .parse::<u32>()
                .ok()
                .filter(|c| (4..=31).contains(c))
                .ok_or(ConfigError::Invalid("BCRYPT_COST"))?,
            Err(_) => bcrypt::DEFAULT_COST,
        };

        Ok(Self {
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            base_url: env::var("VISUAL_BASE_URL")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| "https://visual.app".to_string()),
            gcp_project_id: env::var("GCP_PROJECT_ID").unwrap_or_else(|_| "local-dev".to_string()),
            store_backend,
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            access_token_expire_minutes: env::var("ACCESS_TOKEN_EXPIRE_MINUTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(43200),
            official_youtube_url: env::var("VISUAL_OFFICIAL_YOUTUBE")
                .unwrap_or_else(|_| "https://youtube.com/@visualproject".to_string()),
            official_tiktok_url: env::var("VISUAL_OFFICIAL_TIKTOK")
                .unwrap_or_else(|_| "https://tiktok.com/@visualproject".to_string()),
            official_facebook_url: env::var("VISUAL_OFFICIAL_FACEBOOK")
                .unwrap_or_else(|_| "https://facebook.com/visualproject".to_string()),
            admin_emails: env::var("ADMIN_EMAILS")
                .map(|v| parse_list(&v))
                .unwrap_or_default(),
            password_hash_cost,

            jwt_signing_key: env::var("JWT_SIGNING_KEY")
                .map_err(|_| ConfigError::Missing("JWT_SIGNING_KEY"))?
                .into_bytes(),
            youtube_api_key: credential("YOUTUBE_API_KEY"),
            tiktok_api_key: credential("TIKTOK_API_KEY"),
            facebook_access_token: credential("FACEBOOK_ACCESS_TOKEN"),
        })
    }

    /// Whether `email` may call the admin publish endpoint.
    pub fn is_admin(&self, email: &str) -> bool {
        self.admin_emails
            .iter()
            .any(|admin| admin.eq_ignore_ascii_case(email))
    }
}

/// Read an optional credential, treating empty and `your-...-here` placeholders as unset.
fn credential(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| is_real_credential(v))
}

fn is_real_credential(value: &str) -> bool {
    !value.is_empty() && !(value.starts_with("your-") && value.ends_with("-here"))
}

fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),
}
