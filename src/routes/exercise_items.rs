use axum::{routing::get, Router};

use crate::handlers::exercise_items;
use crate::state::AppState;

pub fn exercise_item_routes() -> Router<AppState> {
    Router::new().route(
        "/exercise-items/:id",
        get(exercise_items::get_exercise_item)
            .put(exercise_items::update_exercise_item)
            .delete(exercise_items::delete_exercise_item),
    )
}
