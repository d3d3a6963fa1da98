use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An exercise type placed in a workout
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Exercise {
    pub id: Uuid,
    pub name: String,
    pub workout_id: Uuid,
    pub exercise_type_id: Uuid,
    pub exercise_item_id: Uuid,
}

/// Without `exercise_item_id` the exercise gets an item of its own
#[derive(Debug, Deserialize)]
pub struct CreateExerciseRequest {
    pub exercise_type_id: Uuid,
    pub exercise_item_id: Option<Uuid>,
}

/// Body of the exercise listing
#[derive(Debug, Serialize, Deserialize)]
pub struct ExercisesResponse {
    pub exercises: Vec<Exercise>,
}
