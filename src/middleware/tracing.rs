//! Request tracing middleware

use axum::{
    extract::{Request, State},
    http::{HeaderMap, HeaderName},
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::Instrument;
use uuid::Uuid;

use super::rate_limiter::client_key;

/// Log every request with its outcome and latency inside a per-request span.
///
/// The state is the trusted client header, the same one the rate limiter keys on.
pub async fn request_tracing(
    State(client_header): State<HeaderName>,
    request: Request,
    next: Next,
) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let client_ip = logged_client(request.headers(), &client_header);

    let span = tracing::info_span!(
        "request",
        request_id = %Uuid::now_v7(),
        method = %method,
        path = %path,
    );

    async move {
        let start = Instant::now();
        tracing::debug!(client_ip = ?client_ip, "Request started");

        let response = next.run(request).await;

        let duration_ms = start.elapsed().as_millis() as u64;
        let status = response.status().as_u16();

        if response.status().is_server_error() {
            tracing::error!(status, duration_ms, "Request failed");
        } else if response.status().is_client_error() {
            tracing::warn!(status, duration_ms, "Request rejected");
        } else {
            tracing::info!(status, duration_ms, "Request completed");
        }

        response
    }
    .instrument(span)
    .await
}

fn logged_client(headers: &HeaderMap, client_header: &HeaderName) -> Option<String> {
    Some(client_key(headers, client_header)).filter(|key| !key.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_logged_client_follows_configured_header() {
        let forwarded = HeaderName::from_static("x-forwarded-for");
        let mut headers = HeaderMap::new();
        headers.insert("x-real-ip", HeaderValue::from_static("10.0.0.1"));

        assert_eq!(logged_client(&headers, &forwarded), None);

        headers.insert("x-forwarded-for", HeaderValue::from_static(" 203.0.113.7 "));
        assert_eq!(
            logged_client(&headers, &forwarded).as_deref(),
            Some("203.0.113.7")
        );
    }
}
