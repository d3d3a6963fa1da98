use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::error::ApiError;
use crate::middleware::AuthenticatedUser;
use crate::models::{DataResponse, IdResponse, PaginatedResponse, PaginationParams};
use crate::workouts::{CreateWorkoutRequest, UpdateWorkoutRequest, Workout, WorkoutService};

pub async fn list_workouts(
    State(service): State<Arc<WorkoutService>>,
    user: AuthenticatedUser,
    Query(params): Query<PaginationParams>,
) -> Result<Json<PaginatedResponse<Workout>>, ApiError> {
    let page = service.list(user.user_id()?, params).await?;
    Ok(Json(page))
}

pub async fn create_workout(
    State(service): State<Arc<WorkoutService>>,
    user: AuthenticatedUser,
    Json(request): Json<CreateWorkoutRequest>,
) -> Result<(StatusCode, Json<IdResponse>), ApiError> {
    request.validate()?;
    let id = service.create(user.user_id()?, request).await?;
    Ok((StatusCode::CREATED, Json(IdResponse { id })))
}

pub async fn get_workout(
    State(service): State<Arc<WorkoutService>>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<DataResponse<Workout>>, ApiError> {
    let workout = service.get(user.user_id()?, id).await?;
    Ok(Json(DataResponse::new(workout)))
}

pub async fn update_workout(
    State(service): State<Arc<WorkoutService>>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateWorkoutRequest>,
) -> Result<StatusCode, ApiError> {
    request.validate()?;
    service.update(user.user_id()?, id, request).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn complete_workout(
    State(service): State<Arc<WorkoutService>>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    service.complete(user.user_id()?, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn clone_workout(
    State(service): State<Arc<WorkoutService>>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<(StatusCode, Json<IdResponse>), ApiError> {
    let id = service.clone_workout(user.user_id()?, id).await?;
    Ok((StatusCode::CREATED, Json(IdResponse { id })))
}

pub async fn delete_workout(
    State(service): State<Arc<WorkoutService>>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    service.delete(user.user_id()?, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
