use sqlx::PgPool;
use uuid::Uuid;

use super::model::{CreateSetRequest, Set};
use crate::error::ApiError;

#[derive(Clone)]
pub struct SetService {
    db_pool: PgPool,
}

impl SetService {
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }

    /// Sets of an exercise in the order they were logged
    pub async fn list(
        &self,
        user_id: Uuid,
        workout_id: Uuid,
        exercise_id: Uuid,
    ) -> Result<Vec<Set>, ApiError> {
        let sets = sqlx::query_as::<_, Set>(
            r#"
            SELECT s.id, s.repetitions, s.weight, s.exercise_id, s.created_on, s.updated_on
            FROM sets s
            JOIN exercises e ON e.id = s.exercise_id
            WHERE s.exercise_id = $1 AND e.workout_id = $2 AND s.user_id = $3
            ORDER BY s.created_on ASC, s.id ASC
            "#,
        )
        .bind(exercise_id)
        .bind(workout_id)
        .bind(user_id)
        .fetch_all(&self.db_pool)
        .await?;

        Ok(sets)
    }

    pub async fn create(
        &self,
        user_id: Uuid,
        workout_id: Uuid,
        exercise_id: Uuid,
        request: CreateSetRequest,
    ) -> Result<Uuid, ApiError> {
        let id = Uuid::now_v7();

        let result = sqlx::query(
            r#"
            INSERT INTO sets (id, user_id, exercise_id, repetitions, weight)
            SELECT $1, $2, $3, $4, $5
            WHERE EXISTS (
                SELECT 1 FROM exercises
                WHERE id = $3 AND workout_id = $6 AND user_id = $2
            )
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(exercise_id)
        .bind(request.repetitions)
        .bind(request.weight)
        .bind(workout_id)
        .execute(&self.db_pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(ApiError::not_found("Exercise"));
        }

        Ok(id)
    }

    pub async fn delete(
        &self,
        user_id: Uuid,
        workout_id: Uuid,
        exercise_id: Uuid,
        set_id: Uuid,
    ) -> Result<(), ApiError> {
        let result = sqlx::query(
            r#"
            DELETE FROM sets s
            USING exercises e
            WHERE s.id = $1
              AND s.exercise_id = $2
              AND e.id = s.exercise_id
              AND e.workout_id = $3
              AND s.user_id = $4
            "#,
        )
        .bind(set_id)
        .bind(exercise_id)
        .bind(workout_id)
        .bind(user_id)
        .execute(&self.db_pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(ApiError::not_found("Set"));
        }

        Ok(())
    }
}
