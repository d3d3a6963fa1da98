//! Workout route definitions, including the nested exercises and sets

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::handlers::{exercise_items, exercises, sets, workouts};
use crate::state::AppState;

pub fn workout_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/workouts",
            get(workouts::list_workouts).post(workouts::create_workout),
        )
        .route(
            "/workouts/:id",
            get(workouts::get_workout)
                .put(workouts::update_workout)
                .delete(workouts::delete_workout),
        )
        .route("/workouts/:id/complete", put(workouts::complete_workout))
        .route("/workouts/:id/clone", post(workouts::clone_workout))
        .route(
            "/workouts/:id/exercise-items",
            get(exercise_items::list_exercise_items).post(exercise_items::create_exercise_item),
        )
        .route(
            "/workouts/:id/exercises",
            get(exercises::list_exercises).post(exercises::create_exercise),
        )
        .route(
            "/workouts/:id/exercises/:exercise_id",
            delete(exercises::delete_exercise),
        )
        .route(
            "/workouts/:id/exercises/:exercise_id/sets",
            get(sets::list_sets).post(sets::create_set),
        )
        .route(
            "/workouts/:id/exercises/:exercise_id/sets/:set_id",
            delete(sets::delete_set),
        )
}
