use sqlx::PgPool;
use uuid::Uuid;

use super::model::{CreateWorkoutRequest, UpdateWorkoutRequest, Workout};
use crate::error::ApiError;
use crate::models::{PaginatedResponse, PaginationParams};

const WORKOUT_COLUMNS: &str = "id, name, note, completed_on, created_on, updated_on";

#[derive(sqlx::FromRow)]
struct ItemToCopy {
    id: Uuid,
    item_type: String,
}

#[derive(sqlx::FromRow)]
struct ExerciseToCopy {
    exercise_type_id: Uuid,
    name: String,
}

#[derive(Clone)]
pub struct WorkoutService {
    db_pool: PgPool,
}

impl WorkoutService {
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }

    /// Workouts of a user, newest first
    pub async fn list(
        &self,
        user_id: Uuid,
        params: PaginationParams,
    ) -> Result<PaginatedResponse<Workout>, ApiError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM workouts WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&self.db_pool)
            .await?;

        let workouts = sqlx::query_as::<_, Workout>(&format!(
            r#"
            SELECT {} FROM workouts
            WHERE user_id = $1
            ORDER BY created_on DESC, id DESC
            LIMIT $2 OFFSET $3
            "#,
            WORKOUT_COLUMNS
        ))
        .bind(user_id)
        .bind(params.page_size())
        .bind(params.offset())
        .fetch_all(&self.db_pool)
        .await?;

        Ok(PaginatedResponse::new(workouts, &params, total))
    }

    pub async fn create(
        &self,
        user_id: Uuid,
        request: CreateWorkoutRequest,
    ) -> Result<Uuid, ApiError> {
        let id = Uuid::now_v7();

        sqlx::query("INSERT INTO workouts (id, user_id, name) VALUES ($1, $2, $3)")
            .bind(id)
            .bind(user_id)
            .bind(request.name.trim())
            .execute(&self.db_pool)
            .await?;

        tracing::debug!(user_id = %user_id, workout_id = %id, "Workout created");

        Ok(id)
    }

    pub async fn get(&self, user_id: Uuid, id: Uuid) -> Result<Workout, ApiError> {
        sqlx::query_as::<_, Workout>(&format!(
            "SELECT {} FROM workouts WHERE id = $1 AND user_id = $2",
            WORKOUT_COLUMNS
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.db_pool)
        .await?
        .ok_or_else(|| ApiError::not_found("Workout"))
    }

    pub async fn update(
        &self,
        user_id: Uuid,
        id: Uuid,
        request: UpdateWorkoutRequest,
    ) -> Result<(), ApiError> {
        let result = sqlx::query(
            "UPDATE workouts SET note = $1, updated_on = NOW() WHERE id = $2 AND user_id = $3",
        )
        .bind(request.note)
        .bind(id)
        .bind(user_id)
        .execute(&self.db_pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(ApiError::not_found("Workout"));
        }

        Ok(())
    }

    /// Mark a workout as completed now
    pub async fn complete(&self, user_id: Uuid, id: Uuid) -> Result<(), ApiError> {
        let result = sqlx::query(
            r#"
            UPDATE workouts SET completed_on = NOW(), updated_on = NOW()
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .execute(&self.db_pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(ApiError::not_found("Workout"));
        }

        tracing::info!(user_id = %user_id, workout_id = %id, "Workout completed");

        Ok(())
    }

    pub async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<(), ApiError> {
        let result = sqlx::query("DELETE FROM workouts WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.db_pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(ApiError::not_found("Workout"));
        }

        Ok(())
    }

    /// Copy a workout with its exercise items and exercises. Sets are not copied.
    pub async fn clone_workout(&self, user_id: Uuid, id: Uuid) -> Result<Uuid, ApiError> {
        let source = self.get(user_id, id).await?;
        let new_id = Uuid::now_v7();

        let mut tx = self.db_pool.begin().await?;

        sqlx::query("INSERT INTO workouts (id, user_id, name) VALUES ($1, $2, $3)")
            .bind(new_id)
            .bind(user_id)
            .bind(&source.name)
            .execute(&mut *tx)
            .await?;

        let items = sqlx::query_as::<_, ItemToCopy>(
            r#"
            SELECT id, item_type FROM exercise_items
            WHERE workout_id = $1 AND user_id = $2
            ORDER BY created_on ASC, id ASC
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_all(&mut *tx)
        .await?;

        for item in items {
            let new_item_id = Uuid::now_v7();

            sqlx::query(
                r#"
                INSERT INTO exercise_items (id, user_id, workout_id, item_type)
                VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(new_item_id)
            .bind(user_id)
            .bind(new_id)
            .bind(&item.item_type)
            .execute(&mut *tx)
            .await?;

            let exercises = sqlx::query_as::<_, ExerciseToCopy>(
                r#"
                SELECT exercise_type_id, name FROM exercises
                WHERE exercise_item_id = $1
                ORDER BY created_on ASC, id ASC
                "#,
            )
            .bind(item.id)
            .fetch_all(&mut *tx)
            .await?;

            for exercise in exercises {
                sqlx::query(
                    r#"
                    INSERT INTO exercises (id, user_id, workout_id, exercise_type_id, exercise_item_id, name)
                    VALUES ($1, $2, $3, $4, $5, $6)
                    "#,
                )
                .bind(Uuid::now_v7())
                .bind(user_id)
                .bind(new_id)
                .bind(exercise.exercise_type_id)
                .bind(new_item_id)
                .bind(&exercise.name)
                .execute(&mut *tx)
                .await?;
            }
        }

        tx.commit().await?;

        tracing::info!(user_id = %user_id, source_id = %id, workout_id = %new_id, "Workout cloned");

        Ok(new_id)
    }
}
