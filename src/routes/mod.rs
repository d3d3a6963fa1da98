//! Route definitions

mod auth;
mod exercise_items;
mod exercise_types;
mod health;
mod statistics;
mod workouts;

use axum::{middleware::from_fn_with_state, Router};

use crate::middleware::require_auth;
use crate::state::AppState;

pub use auth::{account_routes, public_auth_routes};
pub use exercise_items::exercise_item_routes;
pub use exercise_types::exercise_type_routes;
pub use health::health_routes;
pub use statistics::statistics_routes;
pub use workouts::workout_routes;

/// Every route of the API with authentication applied to the protected ones
pub fn api_routes(state: AppState) -> Router {
    let protected = Router::new()
        .merge(account_routes())
        .merge(workout_routes())
        .merge(exercise_item_routes())
        .merge(exercise_type_routes())
        .merge(statistics_routes())
        .route_layer(from_fn_with_state(state.tokens.clone(), require_auth));

    Router::new()
        .merge(public_auth_routes())
        .merge(health_routes())
        .merge(protected)
        .with_state(state)
}
