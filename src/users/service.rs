use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use super::mailer::{Mailer, Notification, NotificationKind};
use super::model::{
    ChangeEmailRequest, ChangePasswordRequest, ConfirmPasswordResetRequest, CreateUserRequest,
    RegisterRequest, ResetPasswordRequest, User, UserResponse,
};
use crate::auth::{hash_password, verify_password, Claims, TokenService, TokenType};
use crate::error::ApiError;

const USER_COLUMNS: &str = "id, username, email, password_hash, verified, created_on, updated_on";

/// Account lifecycle: sign-up, profile and credential changes
#[derive(Clone)]
pub struct UserService {
    db_pool: PgPool,
    tokens: Arc<TokenService>,
    mailer: Arc<dyn Mailer>,
    base_url: String,
}

impl UserService {
    pub fn new(
        db_pool: PgPool,
        tokens: Arc<TokenService>,
        mailer: Arc<dyn Mailer>,
        base_url: String,
    ) -> Self {
        Self {
            db_pool,
            tokens,
            mailer,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Create an unverified account and send its confirmation link
    pub async fn register(&self, request: RegisterRequest) -> Result<Uuid, ApiError> {
        let password_hash = hash_password(&request.password).await?;
        let id = Uuid::now_v7();

        sqlx::query(
            r#"
            INSERT INTO users (id, username, email, password_hash, verified)
            VALUES ($1, $2, $3, $4, FALSE)
            "#,
        )
        .bind(id)
        .bind(request.username.trim())
        .bind(request.email.trim())
        .bind(&password_hash)
        .execute(&self.db_pool)
        .await?;

        let token = self
            .tokens
            .issue_account_confirmation_token(&id.to_string())?;

        self.mailer
            .send(Notification {
                kind: NotificationKind::ConfirmRegistration,
                to: request.email.trim().to_string(),
                link: format!("{}/confirm-registration?token={}", self.base_url, token.token),
            })
            .await?;

        tracing::info!(user_id = %id, "User registered");

        Ok(id)
    }

    pub async fn confirm_registration(&self, token: &str) -> Result<(), ApiError> {
        let user_id = self.purpose_subject(token, TokenType::AccountConfirmation)?.0;

        let result = sqlx::query(
            "UPDATE users SET verified = TRUE, updated_on = NOW() WHERE id = $1",
        )
        .bind(user_id)
        .execute(&self.db_pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(ApiError::BadRequest("Invalid or expired token".to_string()));
        }

        tracing::info!(user_id = %user_id, "Registration confirmed");

        Ok(())
    }

    /// Create an already verified account
    pub async fn create_user(&self, request: CreateUserRequest) -> Result<Uuid, ApiError> {
        let password_hash = hash_password(&request.password).await?;
        let id = Uuid::now_v7();

        sqlx::query(
            r#"
            INSERT INTO users (id, username, password_hash, verified)
            VALUES ($1, $2, $3, TRUE)
            "#,
        )
        .bind(id)
        .bind(request.username.trim())
        .bind(&password_hash)
        .execute(&self.db_pool)
        .await?;

        tracing::info!(user_id = %id, "User created");

        Ok(id)
    }

    pub async fn get_user(&self, id: Uuid) -> Result<UserResponse, ApiError> {
        Ok(self.find_user(id).await?.into())
    }

    pub async fn change_password(
        &self,
        id: Uuid,
        request: ChangePasswordRequest,
    ) -> Result<(), ApiError> {
        let user = self.find_user(id).await?;

        if !verify_password(&request.old_password, &user.password_hash).await? {
            return Err(ApiError::BadRequest("Current password is incorrect".to_string()));
        }

        self.store_password(id, &request.new_password).await
    }

    /// Send a confirmation link to the new address; the change applies once confirmed
    pub async fn request_email_change(
        &self,
        id: Uuid,
        request: ChangeEmailRequest,
    ) -> Result<(), ApiError> {
        let user = self.find_user(id).await?;
        let new_email = request.email.trim();

        if user.email.as_deref() == Some(new_email) {
            return Err(ApiError::BadRequest(
                "New email is the same as the current one".to_string(),
            ));
        }

        let token = self
            .tokens
            .issue_email_confirmation_token(&id.to_string(), new_email)?;

        self.mailer
            .send(Notification {
                kind: NotificationKind::ConfirmEmail,
                to: new_email.to_string(),
                link: format!("{}/confirm-email?token={}", self.base_url, token.token),
            })
            .await
    }

    pub async fn confirm_email(&self, token: &str) -> Result<(), ApiError> {
        let (user_id, claims) = self.purpose_subject(token, TokenType::EmailConfirmation)?;
        let email = claims
            .email
            .ok_or_else(|| ApiError::BadRequest("Invalid or expired token".to_string()))?;

        let result =
            sqlx::query("UPDATE users SET email = $1, updated_on = NOW() WHERE id = $2")
                .bind(&email)
                .bind(user_id)
                .execute(&self.db_pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(ApiError::not_found("User"));
        }

        tracing::info!(user_id = %user_id, "Email changed");

        Ok(())
    }

    /// Send a reset link if the address belongs to an account
    pub async fn request_password_reset(
        &self,
        request: ResetPasswordRequest,
    ) -> Result<(), ApiError> {
        let email = request.email.trim();
        let user: Option<User> =
            sqlx::query_as(&format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS))
                .bind(email)
                .fetch_optional(&self.db_pool)
                .await?;

        // Unknown addresses get the same answer as known ones
        let Some(user) = user else {
            tracing::debug!("Password reset requested for unknown email");
            return Ok(());
        };

        let token = self.tokens.issue_password_reset_token(&user.id.to_string())?;

        self.mailer
            .send(Notification {
                kind: NotificationKind::ResetPassword,
                to: email.to_string(),
                link: format!("{}/password-reset/{}", self.base_url, token.token),
            })
            .await
    }

    pub async fn confirm_password_reset(
        &self,
        request: ConfirmPasswordResetRequest,
    ) -> Result<(), ApiError> {
        let user_id = self
            .purpose_subject(&request.token, TokenType::PasswordReset)?
            .0;

        self.store_password(user_id, &request.password).await
    }

    /// Remove accounts that never confirmed their registration
    pub async fn delete_unverified_users(&self, older_than: Duration) -> Result<u64, ApiError> {
        let seconds = i64::try_from(older_than.as_secs()).unwrap_or(i64::MAX);

        let result = sqlx::query(
            r#"
            DELETE FROM users
            WHERE verified = FALSE
              AND created_on < NOW() - make_interval(secs => $1::double precision)
            "#,
        )
        .bind(seconds as f64)
        .execute(&self.db_pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn find_user(&self, id: Uuid) -> Result<User, ApiError> {
        sqlx::query_as(&format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS))
            .bind(id)
            .fetch_optional(&self.db_pool)
            .await?
            .ok_or_else(|| ApiError::not_found("User"))
    }

    async fn store_password(&self, id: Uuid, password: &str) -> Result<(), ApiError> {
        let password_hash = hash_password(password).await?;

        let result = sqlx::query(
            "UPDATE users SET password_hash = $1, updated_on = NOW() WHERE id = $2",
        )
        .bind(&password_hash)
        .bind(id)
        .execute(&self.db_pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(ApiError::not_found("User"));
        }

        tracing::info!(user_id = %id, "Password changed");

        Ok(())
    }

    /// Verify a purpose token and parse its subject
    fn purpose_subject(
        &self,
        token: &str,
        expected: TokenType,
    ) -> Result<(Uuid, Claims), ApiError> {
        let invalid = || ApiError::BadRequest("Invalid or expired token".to_string());

        let claims = self
            .tokens
            .verify_purpose_token(token, expected)
            .map_err(|e| {
                tracing::debug!(error = %e, token_type = expected.as_str(), "Token rejected");
                invalid()
            })?;

        let user_id = Uuid::parse_str(&claims.sub).map_err(|_| invalid())?;

        Ok((user_id, claims))
    }
}
