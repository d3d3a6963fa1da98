use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::error::ApiError;
use crate::exercises::{CreateExerciseRequest, ExerciseService, ExercisesResponse};
use crate::middleware::AuthenticatedUser;
use crate::models::IdResponse;

pub async fn list_exercises(
    State(service): State<Arc<ExerciseService>>,
    user: AuthenticatedUser,
    Path(workout_id): Path<Uuid>,
) -> Result<Json<ExercisesResponse>, ApiError> {
    let exercises = service.list(user.user_id()?, workout_id).await?;
    Ok(Json(ExercisesResponse { exercises }))
}

pub async fn create_exercise(
    State(service): State<Arc<ExerciseService>>,
    user: AuthenticatedUser,
    Path(workout_id): Path<Uuid>,
    Json(request): Json<CreateExerciseRequest>,
) -> Result<(StatusCode, Json<IdResponse>), ApiError> {
    let id = service.create(user.user_id()?, workout_id, request).await?;
    Ok((StatusCode::CREATED, Json(IdResponse { id })))
}

pub async fn delete_exercise(
    State(service): State<Arc<ExerciseService>>,
    user: AuthenticatedUser,
    Path((workout_id, exercise_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ApiError> {
    service
        .delete(user.user_id()?, workout_id, exercise_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
