//! Authentication and account routes

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::handlers::{auth, users};
use crate::state::AppState;

/// Routes reachable without a session
pub fn public_auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(auth::login))
        .route("/auth/token", post(auth::refresh_token))
        .route("/register", post(users::register))
        .route("/register/confirm", post(users::confirm_registration))
        .route("/confirm-email", post(users::confirm_email))
        .route("/reset-password", post(users::reset_password))
        .route("/reset-password/confirm", post(users::confirm_password_reset))
}

/// Routes acting on the caller's own account
pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/logout", post(auth::logout))
        .route("/users", post(users::create_user))
        .route("/me", get(users::get_current_user))
        .route("/me/password", put(users::change_password))
        .route("/me/email", put(users::change_email))
}
