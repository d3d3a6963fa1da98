//! Weight tracker API server

use anyhow::Context;
use axum::http::HeaderName;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;

use weight_tracker::app::{build_app, configure_cors};
use weight_tracker::config::Config;
use weight_tracker::db;
use weight_tracker::jobs::spawn_background_jobs;
use weight_tracker::middleware::{RateLimitState, RateLimiter};
use weight_tracker::state::AppState;
use weight_tracker::users::LogMailer;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env().context("Failed to load configuration")?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .with_target(true)
        .with_line_number(true)
        .init();

    tracing::info!(environment = config.environment.as_str(), "Starting weight tracker");

    let db_pool = db::create_pool(&config).await?;
    db::run_migrations(&db_pool).await?;

    let app_state = AppState::new(db_pool, &config, Arc::new(LogMailer));

    let rate_limiter = RateLimiter::new(config.rate_limit.window, config.rate_limit.max_requests);
    let client_header = HeaderName::try_from(config.rate_limit.client_header.as_str())
        .context("RATE_LIMIT_CLIENT_HEADER is not a valid header name")?;

    spawn_background_jobs(
        app_state.auth_service.clone(),
        app_state.user_service.clone(),
        rate_limiter.clone(),
    );

    let app = build_app(
        app_state,
        RateLimitState {
            limiter: rate_limiter,
            client_header,
        },
        configure_cors(config.cors_allowed_origins.as_deref()),
    );

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!("Server listening on {}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown...");
        }
    }
}
