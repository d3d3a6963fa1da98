use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::error::ApiError;
use crate::exercise_items::{ExerciseItem, ExerciseItemRequest, ExerciseItemService};
use crate::middleware::AuthenticatedUser;
use crate::models::{DataResponse, IdResponse};

pub async fn list_exercise_items(
    State(service): State<Arc<ExerciseItemService>>,
    user: AuthenticatedUser,
    Path(workout_id): Path<Uuid>,
) -> Result<Json<DataResponse<Vec<ExerciseItem>>>, ApiError> {
    let items = service.list_for_workout(user.user_id()?, workout_id).await?;
    Ok(Json(DataResponse::new(items)))
}

pub async fn create_exercise_item(
    State(service): State<Arc<ExerciseItemService>>,
    user: AuthenticatedUser,
    Path(workout_id): Path<Uuid>,
    Json(request): Json<ExerciseItemRequest>,
) -> Result<(StatusCode, Json<IdResponse>), ApiError> {
    let id = service.create(user.user_id()?, workout_id, request).await?;
    Ok((StatusCode::CREATED, Json(IdResponse { id })))
}

pub async fn get_exercise_item(
    State(service): State<Arc<ExerciseItemService>>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<DataResponse<ExerciseItem>>, ApiError> {
    let item = service.get(user.user_id()?, id).await?;
    Ok(Json(DataResponse::new(item)))
}

pub async fn update_exercise_item(
    State(service): State<Arc<ExerciseItemService>>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(request): Json<ExerciseItemRequest>,
) -> Result<StatusCode, ApiError> {
    service.update(user.user_id()?, id, request).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_exercise_item(
    State(service): State<Arc<ExerciseItemService>>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    service.delete(user.user_id()?, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
