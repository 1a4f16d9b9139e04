mod auth;
mod backend;
mod config;
mod errors;
mod export;
mod recruitment;
mod routes;
mod state;

use anyhow::{Context, Result};
use axum::http::HeaderValue;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::auth::{AccessControl, GuardPolicy};
use crate::backend::BackendClient;
use crate::config::Config;
use crate::recruitment::InFlightGate;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting HR Portal v{}", env!("CARGO_PKG_VERSION"));

    // One client serves recruitment data, the employee directory and session lookups
    let backend = Arc::new(
        BackendClient::new(
            &config.backend_url,
            config.backend_token.clone(),
            config.backend_timeout,
        )
        .context("Failed to build backend HTTP client")?,
    );
    info!("Backend client initialized ({})", config.backend_url);

    let policy = GuardPolicy::staff()
        .sign_in_path(config.sign_in_path.clone())
        .unauthorized_path(config.unauthorized_path.clone())
        .on_unauthorized(config.unauthorized_mode);
    info!(
        "Staff routes guarded: sign-in at {}, unauthorized mode {:?}",
        policy.sign_in_path, policy.on_unauthorized
    );

    // Build app state
    let state = AppState {
        recruitment: backend.clone(),
        employees: backend.clone(),
        migrations: InFlightGate::new(),
        staff_access: AccessControl {
            policy,
            resolver: backend,
            resolve_timeout: config.session_resolve_timeout,
        },
    };

    let cors = match &config.cors_allowed_origin {
        Some(origin) => CorsLayer::new()
            .allow_origin(
                origin
                    .parse::<HeaderValue>()
                    .with_context(|| format!("Invalid CORS_ALLOWED_ORIGIN '{origin}'"))?,
            )
            .allow_methods(Any)
            .allow_headers(Any),
        None => CorsLayer::permissive(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
