//! # trailmap-server
//!
//! HTTP and WebSocket server for trailmap: serves the index page, generates
//! roadmaps through a chat completions API and streams them to the browser
//! with the progressive revealer. Sign-in and rate limiting sit in front of
//! every generation call.

pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod generate;
pub mod oauth;
pub mod prompt;
pub mod ratelimit;
pub mod server;
pub mod ws;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::info;
use trailmap_core::Config;

pub use auth::{SessionKeys, SessionUser, SESSION_COOKIE};
pub use cli::ServeArgs;
pub use config::{GenerationSettings, ServeConfig, SignInSettings};
pub use error::ApiError;
pub use generate::{ChatCompletionsClient, GenerationError, Generator};
pub use oauth::OAuthSettings;
pub use ratelimit::RateLimitConfig;
pub use server::{router, AppState, RoadmapResponse};

/// How often idle rate-limit buckets are dropped.
const PRUNE_INTERVAL: Duration = Duration::from_secs(10 * 60);

/// Run the server until it is stopped.
pub async fn run(args: &ServeArgs, config: &Config) -> Result<()> {
    let serve_config = ServeConfig::from_args(args, config);
    if serve_config.generation.api_key.is_none() {
        tracing::warn!("no API key set (TRAILMAP_API_KEY); generation requests will fail");
    }

    let generator = Arc::new(ChatCompletionsClient::new(&serve_config.generation));
    let state = AppState::new(serve_config, generator).context("Invalid sign-in settings")?;
    let addr = state.config.listen_addr.clone();

    let limiter = Arc::clone(&state.rate_limiter);
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(PRUNE_INTERVAL);
        loop {
            interval.tick().await;
            limiter.prune(PRUNE_INTERVAL);
        }
    });

    info!(
        %addr,
        sign_in = state.sign_in_configured(),
        model = %state.config.generation.model,
        "trailmap listening"
    );
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {addr}"))?;
    axum::serve(listener, router(state))
        .await
        .context("Server error")?;
    Ok(())
}
