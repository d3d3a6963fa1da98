use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// One logged set
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Set {
    pub id: Uuid,
    pub repetitions: i32,
    pub weight: f64,
    pub exercise_id: Uuid,
    pub created_on: DateTime<Utc>,
    pub updated_on: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateSetRequest {
    #[validate(range(min = 0, max = 10000))]
    pub repetitions: i32,
    #[validate(range(min = 0.0, max = 10000.0))]
    pub weight: f64,
}
