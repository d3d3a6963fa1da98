use sqlx::PgPool;
use std::collections::HashMap;
use uuid::Uuid;

use super::model::{ExerciseItem, ExerciseItemRequest, ExerciseItemRow};
use crate::error::ApiError;
use crate::exercises::{Exercise, EXERCISE_COLUMNS};

const ITEM_COLUMNS: &str = "id, item_type, workout_id, created_on, updated_on";

#[derive(Clone)]
pub struct ExerciseItemService {
    db_pool: PgPool,
}

impl ExerciseItemService {
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }

    /// Items of a workout in creation order, each with its exercises
    pub async fn list_for_workout(
        &self,
        user_id: Uuid,
        workout_id: Uuid,
    ) -> Result<Vec<ExerciseItem>, ApiError> {
        let workout_exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM workouts WHERE id = $1 AND user_id = $2)",
        )
        .bind(workout_id)
        .bind(user_id)
        .fetch_one(&self.db_pool)
        .await?;

        if !workout_exists {
            return Err(ApiError::not_found("Workout"));
        }

        let rows = sqlx::query_as::<_, ExerciseItemRow>(&format!(
            r#"
            SELECT {} FROM exercise_items
            WHERE workout_id = $1 AND user_id = $2
            ORDER BY created_on ASC, id ASC
            "#,
            ITEM_COLUMNS
        ))
        .bind(workout_id)
        .bind(user_id)
        .fetch_all(&self.db_pool)
        .await?;

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

        Ok(group_exercises(rows, exercises))
    }

    pub async fn create(
        &self,
        user_id: Uuid,
        workout_id: Uuid,
        request: ExerciseItemRequest,
    ) -> Result<Uuid, ApiError> {
        let id = Uuid::now_v7();

        let result = sqlx::query(
            r#"
            INSERT INTO exercise_items (id, user_id, workout_id, item_type)
            SELECT $1, $2, $3, $4
            WHERE EXISTS (SELECT 1 FROM workouts WHERE id = $3 AND user_id = $2)
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(workout_id)
        .bind(request.item_type.as_str())
        .execute(&self.db_pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(ApiError::not_found("Workout"));
        }

        Ok(id)
    }

    pub async fn get(&self, user_id: Uuid, id: Uuid) -> Result<ExerciseItem, ApiError> {
        let row = sqlx::query_as::<_, ExerciseItemRow>(&format!(
            "SELECT {} FROM exercise_items WHERE id = $1 AND user_id = $2",
            ITEM_COLUMNS
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.db_pool)
        .await?
        .ok_or_else(|| ApiError::not_found("Exercise item"))?;

        let exercises = sqlx::query_as::<_, Exercise>(&format!(
            r#"
            SELECT {} FROM exercises
            WHERE exercise_item_id = $1
            ORDER BY created_on ASC, id ASC
            "#,
            EXERCISE_COLUMNS
        ))
        .bind(id)
        .fetch_all(&self.db_pool)
        .await?;

        Ok(ExerciseItem::from_row(row, exercises))
    }

    pub async fn update(
        &self,
        user_id: Uuid,
        id: Uuid,
        request: ExerciseItemRequest,
    ) -> Result<(), ApiError> {
        let result = sqlx::query(
            r#"
            UPDATE exercise_items SET item_type = $1, updated_on = NOW()
            WHERE id = $2 AND user_id = $3
            "#,
        )
        .bind(request.item_type.as_str())
        .bind(id)
        .bind(user_id)
        .execute(&self.db_pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(ApiError::not_found("Exercise item"));
        }

        Ok(())
    }

    pub async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<(), ApiError> {
        let result = sqlx::query("DELETE FROM exercise_items WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.db_pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(ApiError::not_found("Exercise item"));
        }

        Ok(())
    }
}

/// Attach exercises to their items, keeping the order of both lists
fn group_exercises(rows: Vec<ExerciseItemRow>, exercises: Vec<Exercise>) -> Vec<ExerciseItem> {
    let mut by_item: HashMap<Uuid, Vec<Exercise>> = HashMap::new();
    for exercise in exercises {
        by_item
            .entry(exercise.exercise_item_id)
            .or_default()
            .push(exercise);
    }

    rows.into_iter()
        .map(|row| {
            let exercises = by_item.remove(&row.id).unwrap_or_default();
            ExerciseItem::from_row(row, exercises)
        })
        .collect()
}
