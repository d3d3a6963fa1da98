//! Account HTTP handlers

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::cookie::CookieJar;
use std::sync::Arc;
use validator::Validate;

use super::auth::clear_session_cookies;
use crate::auth::TokenService;
use crate::error::ApiError;
use crate::middleware::AuthenticatedUser;
use crate::models::{DataResponse, IdResponse};
use crate::users::{
    ChangeEmailRequest, ChangePasswordRequest, ConfirmPasswordResetRequest, CreateUserRequest,
    RegisterRequest, ResetPasswordRequest, TokenQuery, UserResponse, UserService,
};

/// POST /register
pub async fn register(
    State(service): State<Arc<UserService>>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<IdResponse>), ApiError> {
    request.validate()?;
    let id = service.register(request).await?;
    Ok((StatusCode::CREATED, Json(IdResponse { id })))
}

/// POST /register/confirm?token=
pub async fn confirm_registration(
    State(service): State<Arc<UserService>>,
    Query(query): Query<TokenQuery>,
) -> Result<StatusCode, ApiError> {
    service.confirm_registration(&query.token).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /users
pub async fn create_user(
    State(service): State<Arc<UserService>>,
    _user: AuthenticatedUser,
    Json(request): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<IdResponse>), ApiError> {
    request.validate()?;
    let id = service.create_user(request).await?;
    Ok((StatusCode::CREATED, Json(IdResponse { id })))
}

/// GET /me
pub async fn get_current_user(
    State(service): State<Arc<UserService>>,
    user: AuthenticatedUser,
) -> Result<Json<DataResponse<UserResponse>>, ApiError> {
    let profile = service.get_user(user.user_id()?).await?;
    Ok(Json(DataResponse::new(profile)))
}

/// PUT /me/password - also ends the current session
pub async fn change_password(
    State(service): State<Arc<UserService>>,
    State(tokens): State<Arc<TokenService>>,
    user: AuthenticatedUser,
    jar: CookieJar,
    Json(request): Json<ChangePasswordRequest>,
) -> Result<(CookieJar, StatusCode), ApiError> {
    request.validate()?;
    service.change_password(user.user_id()?, request).await?;
    Ok((clear_session_cookies(jar, &tokens), StatusCode::NO_CONTENT))
}

/// PUT /me/email
pub async fn change_email(
    State(service): State<Arc<UserService>>,
    user: AuthenticatedUser,
    Json(request): Json<ChangeEmailRequest>,
) -> Result<StatusCode, ApiError> {
    request.validate()?;
    service.request_email_change(user.user_id()?, request).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /confirm-email?token=
pub async fn confirm_email(
    State(service): State<Arc<UserService>>,
    Query(query): Query<TokenQuery>,
) -> Result<StatusCode, ApiError> {
    service.confirm_email(&query.token).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /reset-password
pub async fn reset_password(
    State(service): State<Arc<UserService>>,
    Json(request): Json<ResetPasswordRequest>,
) -> Result<StatusCode, ApiError> {
    request.validate()?;
    service.request_password_reset(request).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /reset-password/confirm
pub async fn confirm_password_reset(
    State(service): State<Arc<UserService>>,
    Json(request): Json<ConfirmPasswordResetRequest>,
) -> Result<StatusCode, ApiError> {
    request.validate()?;
    service.confirm_password_reset(request).await?;
    Ok(StatusCode::NO_CONTENT)
}
