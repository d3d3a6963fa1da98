//! Application assembly
//!
//! Layer order, outermost first: rate limiter, CORS, request tracing,
//! then the router with per-route authentication.

use axum::{
    http::{header, HeaderName, HeaderValue, Method},
    middleware::from_fn_with_state,
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};

use crate::middleware::{rate_limit, request_tracing, RateLimitState};
use crate::routes::api_routes;
use crate::state::AppState;

/// Build the complete HTTP application
pub fn build_app(state: AppState, rate_limit_state: RateLimitState, cors: CorsLayer) -> Router {
    let client_header = rate_limit_state.client_header.clone();

    api_routes(state).layer(
        ServiceBuilder::new()
            .layer(from_fn_with_state(rate_limit_state, rate_limit))
            .layer(cors)
            .layer(from_fn_with_state(client_header, request_tracing)),
    )
}

/// CORS policy for the given comma-separated origins, or any origin when unset
pub fn configure_cors(allowed_origins: Option<&str>) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
            Method::PATCH,
        ])
        .allow_headers([
            header::ACCEPT,
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            HeaderName::from_static("x-csrf-token"),
            HeaderName::from_static("apikey"),
        ]);

    let origins: Vec<HeaderValue> = allowed_origins
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .filter_map(|s| s.parse().ok())
        .collect();

    if origins.is_empty() {
        tracing::warn!("CORS_ALLOWED_ORIGINS not set, allowing all origins");
        return layer.allow_origin(Any);
    }

    layer.allow_origin(origins)
}
