use axum::{routing::get, Router};

use crate::handlers::health;
use crate::state::AppState;

pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/ip", get(health::client_ip))
}
