use sqlx::PgPool;
use uuid::Uuid;

use super::model::{ExerciseType, ExerciseTypeRequest, SetSummary};
use crate::error::ApiError;

#[derive(Clone)]
pub struct ExerciseTypeService {
    db_pool: PgPool,
}

impl ExerciseTypeService {
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }

    /// All exercise types of a user, by name
    pub async fn list(&self, user_id: Uuid) -> Result<Vec<ExerciseType>, ApiError> {
        let types = sqlx::query_as::<_, ExerciseType>(
            "SELECT id, name FROM exercise_types WHERE user_id = $1 ORDER BY name ASC, id ASC",
        )
        .bind(user_id)
        .fetch_all(&self.db_pool)
        .await?;

        Ok(types)
    }

    pub async fn create(
        &self,
        user_id: Uuid,
        request: ExerciseTypeRequest,
    ) -> Result<Uuid, ApiError> {
        let name = normalized_name(&request.name)?;
        let id = Uuid::now_v7();

        sqlx::query("INSERT INTO exercise_types (id, user_id, name) VALUES ($1, $2, $3)")
            .bind(id)
            .bind(user_id)
            .bind(name)
            .execute(&self.db_pool)
            .await?;

        tracing::debug!(user_id = %user_id, exercise_type_id = %id, "Exercise type created");

        Ok(id)
    }

    pub async fn update(
        &self,
        user_id: Uuid,
        id: Uuid,
        request: ExerciseTypeRequest,
    ) -> Result<(), ApiError> {
        let name = normalized_name(&request.name)?;

        let result = sqlx::query(
            r#"
            UPDATE exercise_types SET name = $1, updated_on = NOW()
            WHERE id = $2 AND user_id = $3
            "#,
        )
        .bind(name)
        .bind(id)
        .bind(user_id)
        .execute(&self.db_pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(ApiError::not_found("Exercise type"));
        }

        Ok(())
    }

    pub async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<(), ApiError> {
        let result = sqlx::query("DELETE FROM exercise_types WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.db_pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(ApiError::not_found("Exercise type"));
        }

        Ok(())
    }

    /// Heaviest set ever logged for the type, more reps winning ties
    pub async fn max_set(&self, user_id: Uuid, id: Uuid) -> Result<SetSummary, ApiError> {
        sqlx::query_as::<_, SetSummary>(
            r#"
            SELECT s.weight, s.repetitions AS reps
            FROM sets s
            JOIN exercises e ON e.id = s.exercise_id
            WHERE e.exercise_type_id = $1 AND s.user_id = $2
            ORDER BY s.weight DESC, s.repetitions DESC
            LIMIT 1
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.db_pool)
        .await?
        .ok_or_else(|| ApiError::not_found("Set"))
    }

    /// Most recently logged set for the type
    pub async fn last_set(&self, user_id: Uuid, id: Uuid) -> Result<SetSummary, ApiError> {
        sqlx::query_as::<_, SetSummary>(
            r#"
            SELECT s.weight, s.repetitions AS reps
            FROM sets s
            JOIN exercises e ON e.id = s.exercise_id
            WHERE e.exercise_type_id = $1 AND s.user_id = $2
            ORDER BY s.created_on DESC, s.id DESC
            LIMIT 1
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.db_pool)
        .await?
        .ok_or_else(|| ApiError::not_found("Set"))
    }
}

fn normalized_name(name: &str) -> Result<&str, ApiError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ApiError::ValidationError("name must not be blank".to_string()));
    }
    Ok(name)
}
