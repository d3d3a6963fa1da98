//! HTTP middleware
//!
//! Rate limiting runs first, then CORS and request tracing. Protected
//! routes add authentication as a route layer.

pub mod auth;
mod rate_limiter;
mod tracing;

pub use auth::{authenticate, require_auth, AuthError, AuthenticatedUser};
pub use rate_limiter::{client_key, rate_limit, RateLimitState, RateLimiter};
pub use self::tracing::request_tracing;
