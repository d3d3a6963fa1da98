//! Authentication middleware
//!
//! Verifies the bearer credential of protected routes and hands the
//! resolved identity to handlers through request extensions.

use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::CookieJar;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use crate::auth::TokenService;
use crate::error::ApiError;

/// Identity of the caller, set by [`require_auth`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    /// Subject claim of the verified token
    pub subject: String,
}

impl AuthenticatedUser {
    /// The subject parsed as a user ID
    pub fn user_id(&self) -> Result<Uuid, ApiError> {
        Uuid::parse_str(&self.subject).map_err(|_| ApiError::Unauthorized)
    }
}

/// Why a request was not authenticated. Both render as the same 401.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("missing credential")]
    MissingCredential,

    #[error("invalid credential")]
    InvalidCredential,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        ApiError::Unauthorized.into_response()
    }
}

/// Raw token from `Authorization: Bearer`, else from the named cookie
pub fn extract_token(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    let bearer = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty());

    if let Some(token) = bearer {
        return Some(token.to_string());
    }

    CookieJar::from_headers(headers)
        .get(cookie_name)
        .map(|cookie| cookie.value().to_string())
        .filter(|token| !token.is_empty())
}

/// Resolve and verify the credential carried by a request
pub fn authenticate(
    headers: &HeaderMap,
    tokens: &TokenService,
) -> Result<AuthenticatedUser, AuthError> {
    let token =
        extract_token(headers, tokens.access_cookie()).ok_or(AuthError::MissingCredential)?;

    let claims = tokens.verify_access_token(&token).map_err(|e| {
        tracing::debug!(error = %e, "Access token rejected");
        AuthError::InvalidCredential
    })?;

    Ok(AuthenticatedUser {
        subject: claims.sub,
    })
}

/// Gate for protected routes. Rejected requests never reach the handler.
pub async fn require_auth(
    State(tokens): State<Arc<TokenService>>,
    mut request: Request,
    next: Next,
) -> Response {
    match authenticate(request.headers(), &tokens) {
        Ok(user) => {
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Err(e) => {
            tracing::debug!(reason = %e, path = %request.uri().path(), "Unauthenticated request");
            e.into_response()
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or(ApiError::Unauthorized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::JwtConfig;
    use axum::http::HeaderValue;

    fn token_service(secret: &str) -> TokenService {
        TokenService::new(&JwtConfig {
            sign_key: secret.to_string(),
            refresh_sign_key: "refresh".to_string(),
            issuer: "weight-tracker".to_string(),
            access_ttl_minutes: 1,
            refresh_ttl_minutes: 60,
            access_cookie: "X-wt-token".to_string(),
            refresh_cookie: "X-wt-refresh".to_string(),
        })
    }

    #[test]
    fn test_bearer_header_is_preferred_over_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer from-header"));
        headers.insert("cookie", HeaderValue::from_static("X-wt-token=from-cookie"));

        assert_eq!(
            extract_token(&headers, "X-wt-token").as_deref(),
            Some("from-header")
        );
    }

    #[test]
    fn test_cookie_is_used_without_header() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "cookie",
            HeaderValue::from_static("theme=dark; X-wt-token=from-cookie"),
        );

        assert_eq!(
            extract_token(&headers, "X-wt-token").as_deref(),
            Some("from-cookie")
        );
    }

    #[test]
    fn test_missing_credential() {
        let tokens = token_service("sekrit");
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic dXNlcjpwYXNz"));

        assert_eq!(
            authenticate(&headers, &tokens),
            Err(AuthError::MissingCredential)
        );
    }

    #[test]
    fn test_valid_token_yields_subject() {
        let tokens = token_service("sekrit");
        let issued = tokens.issue_access_token("1234").unwrap();

        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", issued.token)).unwrap(),
        );

        let user = authenticate(&headers, &tokens).unwrap();
        assert_eq!(user.subject, "1234");
    }

    #[test]
    fn test_foreign_secret_is_invalid() {
        let issued = token_service("sekrit").issue_access_token("1234").unwrap();

        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", issued.token)).unwrap(),
        );

        assert_eq!(
            authenticate(&headers, &token_service("sekrit1")),
            Err(AuthError::InvalidCredential)
        );
    }

    #[test]
    fn test_user_id_requires_uuid_subject() {
        let user = AuthenticatedUser {
            subject: "1234".to_string(),
        };
        assert!(user.user_id().is_err());

        let id = Uuid::now_v7();
        let user = AuthenticatedUser {
            subject: id.to_string(),
        };
        assert_eq!(user.user_id().unwrap(), id);
    }
}
