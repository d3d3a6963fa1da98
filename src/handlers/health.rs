//! Operational endpoints

use axum::{
    extract::{ConnectInfo, State},
    http::{HeaderMap, HeaderName, StatusCode},
    Json,
};
use serde::Serialize;
use sqlx::PgPool;
use std::net::SocketAddr;

use crate::db;
use crate::error::ApiError;
use crate::middleware::client_key;
use crate::state::OpsSettings;

/// Header carrying the operations API key
pub const API_KEY_HEADER: &str = "x-wt-api-key";

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub database: String,
    pub version: String,
}

#[derive(Debug, Serialize)]
pub struct IpResponse {
    pub ip: String,
}

/// GET /health - needs the API key; 503 when the database is unreachable
pub async fn health_check(
    State(ops): State<OpsSettings>,
    State(pool): State<PgPool>,
    headers: HeaderMap,
) -> Result<(StatusCode, Json<HealthResponse>), ApiError> {
    let expected = ops.api_key.as_deref().ok_or(ApiError::Unauthorized)?;
    let presented = headers
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok());

    if presented != Some(expected) {
        return Err(ApiError::Unauthorized);
    }

    let (status, health, database) = match db::check_health(&pool).await {
        Ok(()) => (StatusCode::OK, "healthy", "connected".to_string()),
        Err(e) => {
            tracing::warn!(error = %e, "Health check failed");
            (StatusCode::SERVICE_UNAVAILABLE, "unhealthy", "disconnected".to_string())
        }
    };

    Ok((
        status,
        Json(HealthResponse {
            status: health.to_string(),
            database,
            version: env!("CARGO_PKG_VERSION").to_string(),
        }),
    ))
}

/// GET /ip - the address the service sees for the caller
pub async fn client_ip(
    State(ops): State<OpsSettings>,
    headers: HeaderMap,
    connect_info: Option<ConnectInfo<SocketAddr>>,
) -> Json<IpResponse> {
    let from_header = HeaderName::try_from(ops.client_header.as_str())
        .map(|name| client_key(&headers, &name))
        .unwrap_or_default();

    let ip = if from_header.is_empty() {
        connect_info
            .map(|ConnectInfo(addr)| addr.ip().to_string())
            .unwrap_or_default()
    } else {
        from_header
    };

    Json(IpResponse { ip })
}
