//! Bearer and cookie authentication through the HTTP stack

mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::{
    http::{header, Request, StatusCode},
    middleware::from_fn_with_state,
    routing::get,
    Router,
};
use chrono::Utc;
use jsonwebtoken::{encode, EncodingKey, Header};
use tower::ServiceExt;

use common::{body_json, body_string, empty, jwt_config, offline_state, SIGN_KEY};
use weight_tracker::auth::{Claims, TokenService, TokenType};
use weight_tracker::middleware::{require_auth, AuthenticatedUser};
use weight_tracker::routes::api_routes;

/// Router with one protected handler echoing the caller's subject
fn whoami_router(tokens: Arc<TokenService>, calls: Arc<AtomicUsize>) -> Router {
    Router::new()
        .route(
            "/whoami",
            get(move |user: AuthenticatedUser| {
                let calls = calls.clone();
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    user.subject
                }
            }),
        )
        .route_layer(from_fn_with_state(tokens.clone(), require_auth))
        .with_state(tokens)
}

fn whoami(authorization: Option<String>) -> Request<axum::body::Body> {
    let mut builder = Request::builder().uri("/whoami");
    if let Some(value) = authorization {
        builder = builder.header(header::AUTHORIZATION, value);
    }
    builder.body(empty()).unwrap()
}

fn signed_claims(secret: &str, subject: &str, exp: i64) -> String {
    let claims = Claims {
        sub: subject.to_string(),
        iss: "weight-tracker".to_string(),
        aud: "weight-tracker".to_string(),
        iat: Utc::now().timestamp() - 60,
        exp,
        jti: "test".to_string(),
        token_type: TokenType::Access,
        email: None,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .unwrap()
}

#[tokio::test]
async fn test_valid_bearer_reaches_handler() {
    let tokens = Arc::new(TokenService::new(&jwt_config(SIGN_KEY)));
    let calls = Arc::new(AtomicUsize::new(0));
    let token = tokens.issue_access_token("1234").unwrap().token;

    let response = whoami_router(tokens, calls.clone())
        .oneshot(whoami(Some(format!("Bearer {}", token))))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "1234");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_token_signed_with_other_key_is_rejected() {
    let tokens = Arc::new(TokenService::new(&jwt_config(SIGN_KEY)));
    let calls = Arc::new(AtomicUsize::new(0));
    let forged = TokenService::new(&jwt_config("sekrit1"))
        .issue_access_token("1234")
        .unwrap()
        .token;

    let response = whoami_router(tokens, calls.clone())
        .oneshot(whoami(Some(format!("Bearer {}", forged))))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_expired_token_is_rejected() {
    let tokens = Arc::new(TokenService::new(&jwt_config(SIGN_KEY)));
    let calls = Arc::new(AtomicUsize::new(0));
    let expired = signed_claims(SIGN_KEY, "1234", Utc::now().timestamp() - 1);

    let response = whoami_router(tokens, calls.clone())
        .oneshot(whoami(Some(format!("Bearer {}", expired))))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_unexpired_hand_signed_token_is_accepted() {
    let tokens = Arc::new(TokenService::new(&jwt_config(SIGN_KEY)));
    let calls = Arc::new(AtomicUsize::new(0));
    let token = signed_claims(SIGN_KEY, "1234", Utc::now().timestamp() + 60);

    let response = whoami_router(tokens, calls)
        .oneshot(whoami(Some(format!("Bearer {}", token))))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "1234");
}

#[tokio::test]
async fn test_missing_credential_is_rejected() {
    let tokens = Arc::new(TokenService::new(&jwt_config(SIGN_KEY)));
    let calls = Arc::new(AtomicUsize::new(0));

    let response = whoami_router(tokens, calls.clone())
        .oneshot(whoami(None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_non_bearer_scheme_is_rejected() {
    let tokens = Arc::new(TokenService::new(&jwt_config(SIGN_KEY)));
    let calls = Arc::new(AtomicUsize::new(0));
    let token = tokens.issue_access_token("1234").unwrap().token;

    let response = whoami_router(tokens, calls.clone())
        .oneshot(whoami(Some(format!("Basic {}", token))))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_refresh_token_cannot_authenticate() {
    let tokens = Arc::new(TokenService::new(&jwt_config(SIGN_KEY)));
    let calls = Arc::new(AtomicUsize::new(0));
    let refresh = tokens.issue_refresh_token("1234").unwrap().token;

    let response = whoami_router(tokens, calls.clone())
        .oneshot(whoami(Some(format!("Bearer {}", refresh))))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_access_cookie_authenticates() {
    let tokens = Arc::new(TokenService::new(&jwt_config(SIGN_KEY)));
    let calls = Arc::new(AtomicUsize::new(0));
    let token = tokens.issue_access_token("1234").unwrap().token;

    let request = Request::builder()
        .uri("/whoami")
        .header(header::COOKIE, format!("X-wt-token={}", token))
        .body(empty())
        .unwrap();

    let response = whoami_router(tokens, calls.clone())
        .oneshot(request)
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "1234");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_protected_api_routes_require_a_token() {
    let app = api_routes(offline_state());

    for (method, uri) in [
        ("GET", "/me"),
        ("GET", "/workouts"),
        ("POST", "/workouts"),
        ("GET", "/exercise-types"),
        ("GET", "/statistics"),
        ("POST", "/logout"),
        ("PUT", "/workouts/0190b8c4-0000-7000-8000-000000000000/complete"),
        (
            "GET",
            "/workouts/0190b8c4-0000-7000-8000-000000000000/exercises/0190b8c4-0000-7000-8000-000000000001/sets",
        ),
    ] {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .body(empty())
            .unwrap();

        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(
            response.status(),
            StatusCode::UNAUTHORIZED,
            "{} {} should require a token",
            method,
            uri
        );
    }
}

#[tokio::test]
async fn test_refresh_without_token_is_unauthorized() {
    let app = api_routes(offline_state());

    let request = Request::builder()
        .method("POST")
        .uri("/auth/token")
        .body(empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_health_requires_api_key() {
    let app = api_routes(offline_state());

    let request = Request::builder().uri("/health").body(empty()).unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let request = Request::builder()
        .uri("/health")
        .header("x-wt-api-key", "wrong")
        .body(empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
