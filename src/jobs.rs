//! Periodic maintenance tasks
//!
//! Each job runs in its own task for the lifetime of the process. A failed
//! run is logged and retried on the next tick.

use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};

use crate::auth::AuthService;
use crate::middleware::RateLimiter;
use crate::users::UserService;

const REVOKED_TOKEN_SWEEP_EVERY: Duration = Duration::from_secs(60);
const UNVERIFIED_USER_SWEEP_EVERY: Duration = Duration::from_secs(30 * 60);
/// How long a new account may stay unconfirmed
const UNVERIFIED_USER_MAX_AGE: Duration = Duration::from_secs(30 * 60);

/// Start every maintenance job
pub fn spawn_background_jobs(
    auth_service: Arc<AuthService>,
    user_service: Arc<UserService>,
    rate_limiter: RateLimiter,
) -> Vec<JoinHandle<()>> {
    vec![
        tokio::spawn(cleanup_revoked_tokens(auth_service)),
        tokio::spawn(cleanup_unverified_users(user_service)),
        tokio::spawn(sweep_rate_limiter(rate_limiter)),
    ]
}

async fn cleanup_revoked_tokens(auth_service: Arc<AuthService>) {
    tracing::info!("Revoked token cleanup started");
    let mut ticker = interval(REVOKED_TOKEN_SWEEP_EVERY);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        match auth_service.delete_expired_revocations().await {
            Ok(0) => {}
            Ok(removed) => tracing::info!(removed, "Deleted expired revoked tokens"),
            Err(e) => tracing::error!(error = %e, "Failed to delete expired revoked tokens"),
        }
    }
}

async fn cleanup_unverified_users(user_service: Arc<UserService>) {
    tracing::info!("Unverified user cleanup started");
    let mut ticker = interval(UNVERIFIED_USER_SWEEP_EVERY);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        match user_service
            .delete_unverified_users(UNVERIFIED_USER_MAX_AGE)
            .await
        {
            Ok(0) => {}
            Ok(removed) => tracing::info!(removed, "Deleted unverified users"),
            Err(e) => tracing::error!(error = %e, "Failed to delete unverified users"),
        }
    }
}

async fn sweep_rate_limiter(rate_limiter: RateLimiter) {
    let mut ticker = interval(rate_limiter.window().max(Duration::from_secs(1)));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        let removed = rate_limiter.sweep_expired().await;
        if removed > 0 {
            tracing::debug!(removed, "Swept idle rate limit windows");
        }
    }
}
