//! Session HTTP handlers
//!
//! Login, refresh and logout. Tokens are returned in the body and also set
//! as HttpOnly cookies.

use axum::{extract::State, http::StatusCode, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use std::sync::Arc;
use validator::Validate;

use crate::auth::{AuthService, SessionTokens, TokenService};
use crate::error::ApiError;
use crate::middleware::AuthenticatedUser;
use crate::users::{LoginRequest, RefreshTokenRequest, TokenResponse};

/// POST /auth/login
pub async fn login(
    State(service): State<Arc<AuthService>>,
    jar: CookieJar,
    Json(request): Json<LoginRequest>,
) -> Result<(CookieJar, Json<TokenResponse>), ApiError> {
    request.validate()?;

    let session = service.login(&request.username, &request.password).await?;

    Ok(session_response(jar, service.tokens(), session))
}

/// POST /auth/token - rotate the refresh token from the cookie or the body
pub async fn refresh_token(
    State(service): State<Arc<AuthService>>,
    jar: CookieJar,
    body: Option<Json<RefreshTokenRequest>>,
) -> Result<(CookieJar, Json<TokenResponse>), ApiError> {
    let from_cookie = jar
        .get(service.tokens().refresh_cookie())
        .map(|cookie| cookie.value().to_string());
    let from_body = body.and_then(|Json(body)| body.refresh_token);

    let refresh_token = from_cookie
        .or(from_body)
        .filter(|token| !token.is_empty())
        .ok_or(ApiError::Unauthorized)?;

    let session = service.refresh(&refresh_token).await?;

    Ok(session_response(jar, service.tokens(), session))
}

/// POST /logout
pub async fn logout(
    State(service): State<Arc<AuthService>>,
    _user: AuthenticatedUser,
    jar: CookieJar,
) -> Result<(CookieJar, StatusCode), ApiError> {
    let refresh_token = jar
        .get(service.tokens().refresh_cookie())
        .map(|cookie| cookie.value().to_string());

    service.logout(refresh_token.as_deref()).await?;

    Ok((clear_session_cookies(jar, service.tokens()), StatusCode::NO_CONTENT))
}

fn session_response(
    jar: CookieJar,
    tokens: &TokenService,
    session: SessionTokens,
) -> (CookieJar, Json<TokenResponse>) {
    let jar = jar
        .add(session_cookie(
            tokens.access_cookie(),
            session.access.token.clone(),
            tokens.access_ttl(),
        ))
        .add(session_cookie(
            tokens.refresh_cookie(),
            session.refresh.token.clone(),
            tokens.refresh_ttl(),
        ));

    let body = TokenResponse {
        access_token: session.access.token,
        refresh_token: session.refresh.token,
        token_type: "Bearer".to_string(),
        expires_in: tokens.access_ttl().num_seconds(),
    };

    (jar, Json(body))
}

fn session_cookie(name: &str, value: String, lifetime: chrono::Duration) -> Cookie<'static> {
    Cookie::build((name.to_string(), value))
        .path("/")
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::seconds(lifetime.num_seconds()))
        .build()
}

/// Expire both session cookies
pub(crate) fn clear_session_cookies(jar: CookieJar, tokens: &TokenService) -> CookieJar {
    jar.remove(Cookie::build((tokens.access_cookie().to_string(), String::new())).path("/"))
        .remove(Cookie::build((tokens.refresh_cookie().to_string(), String::new())).path("/"))
}
