use axum::{extract::State, Json};
use std::sync::Arc;

use crate::error::ApiError;
use crate::middleware::AuthenticatedUser;
use crate::statistics::{Statistics, StatisticsService};

/// GET /statistics
pub async fn get_statistics(
    State(service): State<Arc<StatisticsService>>,
    user: AuthenticatedUser,
) -> Result<Json<Statistics>, ApiError> {
    let statistics = service.get(user.user_id()?).await?;
    Ok(Json(statistics))
}
