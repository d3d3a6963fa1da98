//! Authentication service
//!
//! Password login, refresh token rotation and logout.

use chrono::{DateTime, TimeZone, Utc};
use sha2::{Digest, Sha256};
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use super::jwt::{IssuedToken, TokenService, TokenType};
use super::password::verify_password;
use crate::error::ApiError;

/// Access and refresh token pair handed out on login
#[derive(Debug, Clone)]
pub struct SessionTokens {
    pub access: IssuedToken,
    pub refresh: IssuedToken,
}

#[derive(sqlx::FromRow)]
struct Credentials {
    id: Uuid,
    password_hash: String,
}

/// Authentication service
#[derive(Clone)]
pub struct AuthService {
    db_pool: PgPool,
    tokens: Arc<TokenService>,
}

impl AuthService {
    pub fn new(db_pool: PgPool, tokens: Arc<TokenService>) -> Self {
        Self { db_pool, tokens }
    }

    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }

    /// Check a username and password and start a session
    pub async fn login(&self, username: &str, password: &str) -> Result<SessionTokens, ApiError> {
        let credentials: Option<Credentials> =
            sqlx::query_as("SELECT id, password_hash FROM users WHERE username = $1")
                .bind(username)
                .fetch_optional(&self.db_pool)
                .await?;

        let Some(credentials) = credentials else {
            tracing::debug!(username, "Login for unknown user");
            return Err(ApiError::Unauthorized);
        };

        if !verify_password(password, &credentials.password_hash).await? {
            tracing::debug!(user_id = %credentials.id, "Login with wrong password");
            return Err(ApiError::Unauthorized);
        }

        tracing::info!(user_id = %credentials.id, "User logged in");

        self.issue_session(credentials.id)
    }

    /// Trade a refresh token for a new session, revoking the old token
    pub async fn refresh(&self, refresh_token: &str) -> Result<SessionTokens, ApiError> {
        let claims = self.tokens.verify_refresh_token(refresh_token)?;

        let user_id = Uuid::parse_str(&claims.sub).map_err(|_| ApiError::Unauthorized)?;

        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)")
            .bind(user_id)
            .fetch_one(&self.db_pool)
            .await?;

        if !exists {
            return Err(ApiError::Unauthorized);
        }

        // The insert is the only gate: of concurrent redemptions exactly one revokes
        let revoked = self
            .revoke(refresh_token, TokenType::Refresh, expiry_of(claims.exp))
            .await?;

        if revoked == 0 {
            tracing::warn!(subject = %claims.sub, "Revoked refresh token presented");
            return Err(ApiError::Unauthorized);
        }

        self.issue_session(user_id)
    }

    /// Revoke the refresh token of the session being closed, if it is still valid
    pub async fn logout(&self, refresh_token: Option<&str>) -> Result<(), ApiError> {
        let Some(token) = refresh_token else {
            return Ok(());
        };

        match self.tokens.verify_refresh_token(token) {
            Ok(claims) => {
                self.revoke(token, TokenType::Refresh, expiry_of(claims.exp))
                    .await?;
                tracing::info!(subject = %claims.sub, "User logged out");
            }
            Err(e) => {
                tracing::debug!(error = %e, "Logout with unusable refresh token");
            }
        }

        Ok(())
    }

    /// Remove revocation records of tokens that have expired anyway
    pub async fn delete_expired_revocations(&self) -> Result<u64, ApiError> {
        let result = sqlx::query("DELETE FROM revoked_tokens WHERE remove_on <= NOW()")
            .execute(&self.db_pool)
            .await?;

        Ok(result.rows_affected())
    }

    fn issue_session(&self, user_id: Uuid) -> Result<SessionTokens, ApiError> {
        let subject = user_id.to_string();

        Ok(SessionTokens {
            access: self.tokens.issue_access_token(&subject)?,
            refresh: self.tokens.issue_refresh_token(&subject)?,
        })
    }

    async fn revoke(
        &self,
        token: &str,
        token_type: TokenType,
        remove_on: DateTime<Utc>,
    ) -> Result<u64, ApiError> {
        let result = sqlx::query(
            r#"
            INSERT INTO revoked_tokens (id, token_hash, token_type, remove_on)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (token_hash) DO NOTHING
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(hash_token(token))
        .bind(token_type.as_str())
        .bind(remove_on)
        .execute(&self.db_pool)
        .await?;

        Ok(result.rows_affected())
    }
}

/// Tokens are stored hashed, never in the clear
fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

fn expiry_of(exp: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(exp, 0).single().unwrap_or_else(Utc::now)
}
