use sqlx::PgPool;
use uuid::Uuid;

use super::model::{CreateExerciseRequest, Exercise};
use crate::error::ApiError;
use crate::exercise_items::ExerciseItemType;

pub(crate) const EXERCISE_COLUMNS: &str =
    "id, name, workout_id, exercise_type_id, exercise_item_id";

#[derive(Clone)]
pub struct ExerciseService {
    db_pool: PgPool,
}

impl ExerciseService {
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }

    pub async fn list(&self, user_id: Uuid, workout_id: Uuid) -> Result<Vec<Exercise>, ApiError> {
        let exercises = sqlx::query_as::<_, Exercise>(&format!(
            r#"
            SELECT {} FROM exercises
            WHERE workout_id = $1 AND user_id = $2
            ORDER BY created_on ASC, id ASC
            "#,
            EXERCISE_COLUMNS
        ))
        .bind(workout_id)
        .bind(user_id)
        .fetch_all(&self.db_pool)
        .await?;

        Ok(exercises)
    }

    /// Add an exercise of the given type to a workout.
    ///
    /// The exercise takes the name of its type. Without an explicit item a
    /// new `exercise` item is created in the same transaction.
    pub async fn create(
        &self,
        user_id: Uuid,
        workout_id: Uuid,
        request: CreateExerciseRequest,
    ) -> Result<Uuid, ApiError> {
        let mut tx = self.db_pool.begin().await?;

        let type_name: String =
            sqlx::query_scalar("SELECT name FROM exercise_types WHERE id = $1 AND user_id = $2")
                .bind(request.exercise_type_id)
                .bind(user_id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or_else(|| ApiError::not_found("Exercise type"))?;

        let workout_exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM workouts WHERE id = $1 AND user_id = $2)",
        )
        .bind(workout_id)
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await?;

        if !workout_exists {
            return Err(ApiError::not_found("Workout"));
        }

        let item_id = match request.exercise_item_id {
            Some(item_id) => {
                let item_exists: bool = sqlx::query_scalar(
                    r#"
                    SELECT EXISTS(
                        SELECT 1 FROM exercise_items
                        WHERE id = $1 AND workout_id = $2 AND user_id = $3
                    )
                    "#,
                )
                .bind(item_id)
                .bind(workout_id)
                .bind(user_id)
                .fetch_one(&mut *tx)
                .await?;

                if !item_exists {
                    return Err(ApiError::not_found("Exercise item"));
                }
                item_id
            }
            None => {
                let item_id = Uuid::now_v7();
                sqlx::query(
                    r#"
                    INSERT INTO exercise_items (id, user_id, workout_id, item_type)
                    VALUES ($1, $2, $3, $4)
                    "#,
                )
                .bind(item_id)
                .bind(user_id)
                .bind(workout_id)
                .bind(ExerciseItemType::Exercise.as_str())
                .execute(&mut *tx)
                .await?;
                item_id
            }
        };

        let id = Uuid::now_v7();
        sqlx::query(
            r#"
            INSERT INTO exercises (id, user_id, workout_id, exercise_type_id, exercise_item_id, name)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(workout_id)
        .bind(request.exercise_type_id)
        .bind(item_id)
        .bind(&type_name)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::debug!(user_id = %user_id, workout_id = %workout_id, exercise_id = %id, "Exercise added");

        Ok(id)
    }

    pub async fn delete(
        &self,
        user_id: Uuid,
        workout_id: Uuid,
        exercise_id: Uuid,
    ) -> Result<(), ApiError> {
        let result = sqlx::query(
            "DELETE FROM exercises WHERE id = $1 AND workout_id = $2 AND user_id = $3",
        )
        .bind(exercise_id)
        .bind(workout_id)
        .bind(user_id)
        .execute(&self.db_pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(ApiError::not_found("Exercise"));
        }

        Ok(())
    }
}
