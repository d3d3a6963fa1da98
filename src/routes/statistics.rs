use axum::{routing::get, Router};

use crate::handlers::statistics;
use crate::state::AppState;

pub fn statistics_routes() -> Router<AppState> {
    Router::new().route("/statistics", get(statistics::get_statistics))
}
