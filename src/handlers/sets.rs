use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::error::ApiError;
use crate::middleware::AuthenticatedUser;
use crate::models::{DataResponse, IdResponse};
use crate::sets::{CreateSetRequest, Set, SetService};

pub async fn list_sets(
    State(service): State<Arc<SetService>>,
    user: AuthenticatedUser,
    Path((workout_id, exercise_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<DataResponse<Vec<Set>>>, ApiError> {
    let sets = service
        .list(user.user_id()?, workout_id, exercise_id)
        .await?;
    Ok(Json(DataResponse::new(sets)))
}

pub async fn create_set(
    State(service): State<Arc<SetService>>,
    user: AuthenticatedUser,
    Path((workout_id, exercise_id)): Path<(Uuid, Uuid)>,
    Json(request): Json<CreateSetRequest>,
) -> Result<(StatusCode, Json<IdResponse>), ApiError> {
    request.validate()?;
    let id = service
        .create(user.user_id()?, workout_id, exercise_id, request)
        .await?;
    Ok((StatusCode::CREATED, Json(IdResponse { id })))
}

pub async fn delete_set(
    State(service): State<Arc<SetService>>,
    user: AuthenticatedUser,
    Path((workout_id, exercise_id, set_id)): Path<(Uuid, Uuid, Uuid)>,
) -> Result<StatusCode, ApiError> {
    service
        .delete(user.user_id()?, workout_id, exercise_id, set_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
