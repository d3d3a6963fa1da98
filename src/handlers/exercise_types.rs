use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::error::ApiError;
use crate::exercise_types::{ExerciseType, ExerciseTypeRequest, ExerciseTypeService, SetSummary};
use crate::middleware::AuthenticatedUser;
use crate::models::{DataResponse, IdResponse};

pub async fn list_exercise_types(
    State(service): State<Arc<ExerciseTypeService>>,
    user: AuthenticatedUser,
) -> Result<Json<DataResponse<Vec<ExerciseType>>>, ApiError> {
    let types = service.list(user.user_id()?).await?;
    Ok(Json(DataResponse::new(types)))
}

pub async fn create_exercise_type(
    State(service): State<Arc<ExerciseTypeService>>,
    user: AuthenticatedUser,
    Json(request): Json<ExerciseTypeRequest>,
) -> Result<(StatusCode, Json<IdResponse>), ApiError> {
    request.validate()?;
    let id = service.create(user.user_id()?, request).await?;
    Ok((StatusCode::CREATED, Json(IdResponse { id })))
}

pub async fn update_exercise_type(
    State(service): State<Arc<ExerciseTypeService>>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(request): Json<ExerciseTypeRequest>,
) -> Result<StatusCode, ApiError> {
    request.validate()?;
    service.update(user.user_id()?, id, request).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_exercise_type(
    State(service): State<Arc<ExerciseTypeService>>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    service.delete(user.user_id()?, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /exercise-types/:id/max
pub async fn max_set(
    State(service): State<Arc<ExerciseTypeService>>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<DataResponse<SetSummary>>, ApiError> {
    let set = service.max_set(user.user_id()?, id).await?;
    Ok(Json(DataResponse::new(set)))
}

/// GET /exercise-types/:id/last
pub async fn last_set(
    State(service): State<Arc<ExerciseTypeService>>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<DataResponse<SetSummary>>, ApiError> {
    let set = service.last_set(user.user_id()?, id).await?;
    Ok(Json(DataResponse::new(set)))
}
