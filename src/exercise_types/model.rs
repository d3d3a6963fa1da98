use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A kind of exercise the user logs, e.g. "Bench press"
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ExerciseType {
    pub id: Uuid,
    pub name: String,
}

/// Create or rename payload
#[derive(Debug, Deserialize, Validate)]
pub struct ExerciseTypeRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
}

/// Weight and reps of a single logged set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct SetSummary {
    pub weight: f64,
    pub reps: i32,
}
