//! Fixed-window rate limiting middleware

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, HeaderName, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, Instant},
};
use tokio::sync::Mutex;

/// Request count for one client inside its current window
#[derive(Debug, Clone, Copy)]
struct ClientWindow {
    window_start: Instant,
    count: u32,
}

/// Per-client fixed-window rate limiter.
///
/// Cloning is cheap and every clone shares the same table, so a single
/// instance built at startup is handed to the middleware and to the
/// sweeper task.
#[derive(Clone)]
pub struct RateLimiter {
    windows: Arc<Mutex<HashMap<String, ClientWindow>>>,
    window: Duration,
    limit: u32,
}

impl RateLimiter {
    /// Create a limiter allowing `limit` requests per `window`
    pub fn new(window: Duration, limit: u32) -> Self {
        Self {
            windows: Arc::new(Mutex::new(HashMap::new())),
            window,
            limit,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Check if a request from `key` is allowed right now
    pub async fn allow(&self, key: &str) -> bool {
        self.allow_at(key, Instant::now()).await
    }

    /// Check if a request from `key` is allowed at `now`.
    ///
    /// An absent or elapsed window is replaced by a fresh one that already
    /// counts this request.
    pub async fn allow_at(&self, key: &str, now: Instant) -> bool {
        let mut windows = self.windows.lock().await;

        match windows.get_mut(key) {
            Some(entry) if now.saturating_duration_since(entry.window_start) < self.window => {
                if entry.count < self.limit {
                    entry.count += 1;
                    true
                } else {
                    false
                }
            }
            _ => {
                windows.insert(
                    key.to_string(),
                    ClientWindow {
                        window_start: now,
                        count: 1,
                    },
                );
                true
            }
        }
    }

    /// Time left until the window of `key` resets
    pub async fn retry_after(&self, key: &str) -> Duration {
        self.retry_after_at(key, Instant::now()).await
    }

    pub async fn retry_after_at(&self, key: &str, now: Instant) -> Duration {
        let windows = self.windows.lock().await;

        windows
            .get(key)
            .map(|entry| {
                self.window
                    .saturating_sub(now.saturating_duration_since(entry.window_start))
            })
            .unwrap_or_default()
    }

    /// Drop clients whose window has elapsed; returns how many were removed
    pub async fn sweep_expired(&self) -> usize {
        self.sweep_expired_at(Instant::now()).await
    }

    pub async fn sweep_expired_at(&self, now: Instant) -> usize {
        let mut windows = self.windows.lock().await;
        let before = windows.len();

        windows.retain(|_, entry| now.saturating_duration_since(entry.window_start) < self.window);

        before - windows.len()
    }

    /// Number of clients currently tracked
    pub async fn len(&self) -> usize {
        self.windows.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.windows.lock().await.is_empty()
    }
}

/// State for the rate limiting middleware
#[derive(Clone)]
pub struct RateLimitState {
    pub limiter: RateLimiter,
    /// Trusted proxy header carrying the real client address
    pub client_header: HeaderName,
}

/// Reject clients that exhausted their window with 429.
pub async fn rate_limit(
    State(state): State<RateLimitState>,
    request: Request,
    next: Next,
) -> Response {
    let client_key = client_key(request.headers(), &state.client_header);

    if !state.limiter.allow(&client_key).await {
        let retry_after = retry_after_seconds(state.limiter.retry_after(&client_key).await);

        tracing::warn!(client = %client_key, retry_after, "Rate limit exceeded");

        return (
            StatusCode::TOO_MANY_REQUESTS,
            [(header::RETRY_AFTER, retry_after.to_string())],
        )
            .into_response();
    }

    next.run(request).await
}

/// Client identifier from the trusted header.
///
/// Requests without the header all share the empty key.
pub fn client_key(headers: &HeaderMap, client_header: &HeaderName) -> String {
    headers
        .get(client_header)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.trim().to_string())
        .unwrap_or_default()
}

/// Whole seconds to advertise in Retry-After, never zero
fn retry_after_seconds(remaining: Duration) -> u64 {
    let secs = remaining.as_secs() + u64::from(remaining.subsec_nanos() > 0);
    secs.max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[tokio::test]
    async fn test_allows_up_to_limit_within_window() {
        let limiter = RateLimiter::new(Duration::from_secs(60), 5);
        let now = Instant::now();

        for _ in 0..5 {
            assert!(limiter.allow_at("A", now).await);
        }
        assert!(!limiter.allow_at("A", now).await);
    }

    #[tokio::test]
    async fn test_window_resets_after_it_elapses() {
        let limiter = RateLimiter::new(Duration::from_secs(60), 5);
        let start = Instant::now();

        for _ in 0..5 {
            assert!(limiter.allow_at("A", start).await);
        }
        assert!(!limiter.allow_at("A", start).await);

        let later = start + Duration::from_secs(61);
        assert!(limiter.allow_at("A", later).await);

        // The new window counts from the reset request
        for _ in 0..4 {
            assert!(limiter.allow_at("A", later).await);
        }
        assert!(!limiter.allow_at("A", later).await);
    }

    #[tokio::test]
    async fn test_window_boundary_is_inclusive() {
        let limiter = RateLimiter::new(Duration::from_secs(60), 1);
        let start = Instant::now();

        assert!(limiter.allow_at("A", start).await);
        assert!(!limiter.allow_at("A", start + Duration::from_millis(59_999)).await);
        assert!(limiter.allow_at("A", start + Duration::from_secs(60)).await);
    }

    #[tokio::test]
    async fn test_clients_do_not_interfere() {
        let limiter = RateLimiter::new(Duration::from_secs(60), 2);
        let now = Instant::now();

        assert!(limiter.allow_at("client-a", now).await);
        assert!(limiter.allow_at("client-a", now).await);
        assert!(!limiter.allow_at("client-a", now).await);

        assert!(limiter.allow_at("client-b", now).await);
        assert!(limiter.allow_at("client-b", now).await);
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let limiter = RateLimiter::new(Duration::from_secs(60), 1);
        let clone = limiter.clone();
        let now = Instant::now();

        assert!(limiter.allow_at("A", now).await);
        assert!(!clone.allow_at("A", now).await);
    }

    #[tokio::test]
    async fn test_concurrent_requests_never_exceed_limit() {
        let limiter = RateLimiter::new(Duration::from_secs(60), 50);

        let handles: Vec<_> = (0..200)
            .map(|_| {
                let limiter = limiter.clone();
                tokio::spawn(async move { limiter.allow("A").await })
            })
            .collect();

        let mut allowed = 0;
        for handle in handles {
            if handle.await.unwrap() {
                allowed += 1;
            }
        }
        assert_eq!(allowed, 50);
    }

    #[tokio::test]
    async fn test_retry_after_reports_time_to_reset() {
        let limiter = RateLimiter::new(Duration::from_secs(60), 1);
        let start = Instant::now();
        limiter.allow_at("A", start).await;

        let remaining = limiter
            .retry_after_at("A", start + Duration::from_secs(20))
            .await;
        assert_eq!(remaining, Duration::from_secs(40));
        assert_eq!(retry_after_seconds(remaining), 40);
        assert_eq!(retry_after_seconds(Duration::from_millis(1500)), 2);
        assert_eq!(retry_after_seconds(Duration::ZERO), 1);
    }

    #[tokio::test]
    async fn test_sweep_removes_only_elapsed_windows() {
        let limiter = RateLimiter::new(Duration::from_secs(60), 5);
        let start = Instant::now();

        limiter.allow_at("old", start).await;
        limiter
            .allow_at("fresh", start + Duration::from_secs(30))
            .await;
        assert_eq!(limiter.len().await, 2);

        let removed = limiter
            .sweep_expired_at(start + Duration::from_secs(61))
            .await;
        assert_eq!(removed, 1);
        assert_eq!(limiter.len().await, 1);
    }

    #[test]
    fn test_client_key_reads_trusted_header() {
        let header = HeaderName::from_static("x-real-ip");
        let mut headers = HeaderMap::new();
        assert_eq!(client_key(&headers, &header), "");

        headers.insert("x-real-ip", HeaderValue::from_static(" 10.0.0.7 "));
        assert_eq!(client_key(&headers, &header), "10.0.0.7");
    }
}
