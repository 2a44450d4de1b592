// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! VISUAL Social Promotion API Server

use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use visual_social::{
    config::{Config, StoreBackend},
    db::{FirestoreDb, MemoryDb, SocialStore},
    AppState,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging for GCP
    init_logging()?;

    let config = Config::from_env()?;
    tracing::info!(port = config.port, "Starting VISUAL social API");

    let db: Arc<dyn SocialStore> = match config.store_backend {
        StoreBackend::Firestore => Arc::new(FirestoreDb::new(&config.gcp_project_id).await?),
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store; data is lost on restart");
            Arc::new(MemoryDb::new())
        }
    };

    for (name, configured) in [
        ("youtube", config.youtube_api_key.is_some()),
        ("tiktok", config.tiktok_api_key.is_some()),
        ("facebook", config.facebook_access_token.is_some()),
    ] {
        if !configured {
            tracing::info!(platform = name, "No credential configured, publishing in mock mode");
        }
    }

    let state = Arc::new(AppState::new(config.clone(), db));
    let app = visual_social::routes::create_router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;
    Ok(())
}

/// Initialize structured JSON logging (GCP-compliant).
fn init_logging() -> Result<(), Box<dyn std::error::Error>> {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("visual_social=debug".parse()?)
                .add_directive("info".parse()?),
        )
        .with(format)
        .init();
    Ok(())
}
