use axum::{
    routing::{get, put},
    Router,
};

use crate::handlers::exercise_types;
use crate::state::AppState;

pub fn exercise_type_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/exercise-types",
            get(exercise_types::list_exercise_types).post(exercise_types::create_exercise_type),
        )
        .route(
            "/exercise-types/:id",
            put(exercise_types::update_exercise_type).delete(exercise_types::delete_exercise_type),
        )
        .route("/exercise-types/:id/max", get(exercise_types::max_set))
        .route("/exercise-types/:id/last", get(exercise_types::last_set))
}
