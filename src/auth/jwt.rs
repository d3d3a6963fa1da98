//! JWT token generation and validation
//!
//! Handles creation and verification of access, refresh and single-purpose tokens.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::config::JwtConfig;

const ACCOUNT_CONFIRMATION_TTL_MINUTES: i64 = 30;
const EMAIL_CONFIRMATION_TTL_MINUTES: i64 = 10;
const PASSWORD_RESET_TTL_MINUTES: i64 = 10;

/// JWT-related errors
#[derive(Error, Debug)]
pub enum JwtError {
    #[error("Token encoding failed: {0}")]
    EncodingFailed(String),

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Unexpected token type: {0}")]
    WrongTokenType(&'static str),
}

/// What a token may be used for
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenType {
    #[default]
    Access,
    Refresh,
    AccountConfirmation,
    EmailConfirmation,
    PasswordReset,
}

impl TokenType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenType::Access => "access",
            TokenType::Refresh => "refresh",
            TokenType::AccountConfirmation => "account_confirmation",
            TokenType::EmailConfirmation => "email_confirmation",
            TokenType::PasswordReset => "password_reset",
        }
    }
}

/// JWT claims shared by every token type
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    pub iss: String,
    pub aud: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration (Unix timestamp)
    pub exp: i64,
    /// Unique token ID, so two tokens minted in the same second differ
    #[serde(default)]
    pub jti: String,
    /// Tokens minted without a type are access tokens
    #[serde(default)]
    pub token_type: TokenType,
    /// New address carried by email confirmation tokens
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// A signed token together with its expiry
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Signs and verifies every token the service hands out
pub struct TokenService {
    sign_key: String,
    refresh_sign_key: String,
    issuer: String,
    access_ttl: Duration,
    refresh_ttl: Duration,
    access_cookie: String,
    refresh_cookie: String,
}

impl TokenService {
    pub fn new(config: &JwtConfig) -> Self {
        Self {
            sign_key: config.sign_key.clone(),
            refresh_sign_key: config.refresh_sign_key.clone(),
            issuer: config.issuer.clone(),
            access_ttl: Duration::minutes(config.access_ttl_minutes),
            refresh_ttl: Duration::minutes(config.refresh_ttl_minutes),
            access_cookie: config.access_cookie.clone(),
            refresh_cookie: config.refresh_cookie.clone(),
        }
    }

    pub fn access_ttl(&self) -> Duration {
        self.access_ttl
    }

    pub fn refresh_ttl(&self) -> Duration {
        self.refresh_ttl
    }

    /// Name of the cookie carrying the access token
    pub fn access_cookie(&self) -> &str {
        &self.access_cookie
    }

    /// Name of the cookie carrying the refresh token
    pub fn refresh_cookie(&self) -> &str {
        &self.refresh_cookie
    }

    pub fn issue_access_token(&self, subject: &str) -> Result<IssuedToken, JwtError> {
        self.issue(
            subject,
            TokenType::Access,
            self.access_ttl,
            None,
            &self.sign_key,
        )
    }

    pub fn issue_refresh_token(&self, subject: &str) -> Result<IssuedToken, JwtError> {
        self.issue(
            subject,
            TokenType::Refresh,
            self.refresh_ttl,
            None,
            &self.refresh_sign_key,
        )
    }

    pub fn issue_account_confirmation_token(
        &self,
        subject: &str,
    ) -> Result<IssuedToken, JwtError> {
        self.issue(
            subject,
            TokenType::AccountConfirmation,
            Duration::minutes(ACCOUNT_CONFIRMATION_TTL_MINUTES),
            None,
            &self.sign_key,
        )
    }

    pub fn issue_email_confirmation_token(
        &self,
        subject: &str,
        new_email: &str,
    ) -> Result<IssuedToken, JwtError> {
        self.issue(
            subject,
            TokenType::EmailConfirmation,
            Duration::minutes(EMAIL_CONFIRMATION_TTL_MINUTES),
            Some(new_email.to_string()),
            &self.sign_key,
        )
    }

    pub fn issue_password_reset_token(&self, subject: &str) -> Result<IssuedToken, JwtError> {
        self.issue(
            subject,
            TokenType::PasswordReset,
            Duration::minutes(PASSWORD_RESET_TTL_MINUTES),
            None,
            &self.sign_key,
        )
    }

    /// Verify a token presented to a protected route
    pub fn verify_access_token(&self, token: &str) -> Result<Claims, JwtError> {
        self.verify(token, TokenType::Access, &self.sign_key)
    }

    pub fn verify_refresh_token(&self, token: &str) -> Result<Claims, JwtError> {
        self.verify(token, TokenType::Refresh, &self.refresh_sign_key)
    }

    /// Verify a confirmation or reset token of the expected type
    pub fn verify_purpose_token(
        &self,
        token: &str,
        expected: TokenType,
    ) -> Result<Claims, JwtError> {
        self.verify(token, expected, &self.sign_key)
    }

    fn issue(
        &self,
        subject: &str,
        token_type: TokenType,
        ttl: Duration,
        email: Option<String>,
        secret: &str,
    ) -> Result<IssuedToken, JwtError> {
        let now = Utc::now();
        let expires_at = now + ttl;

        let claims = Claims {
            sub: subject.to_string(),
            iss: self.issuer.clone(),
            aud: self.issuer.clone(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
            jti: Uuid::now_v7().to_string(),
            token_type,
            email,
        };

        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .map_err(|e| JwtError::EncodingFailed(e.to_string()))?;

        Ok(IssuedToken { token, expires_at })
    }

    fn verify(&self, token: &str, expected: TokenType, secret: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[&self.issuer]);
        validation.set_required_spec_claims(&["exp", "iss", "aud", "sub"]);

        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &validation,
        )
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => JwtError::TokenExpired,
            _ => JwtError::InvalidToken(e.to_string()),
        })?;

        let claims = token_data.claims;

        // The decoder accepts exp == now; expiry must be strictly in the future
        if claims.exp <= Utc::now().timestamp() {
            return Err(JwtError::TokenExpired);
        }

        if claims.token_type != expected {
            return Err(JwtError::WrongTokenType(claims.token_type.as_str()));
        }

        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config(secret: &str) -> JwtConfig {
        JwtConfig {
            sign_key: secret.to_string(),
            refresh_sign_key: format!("{}-refresh", secret),
            issuer: "weight-tracker".to_string(),
            access_ttl_minutes: 1,
            refresh_ttl_minutes: 60,
            access_cookie: "X-wt-token".to_string(),
            refresh_cookie: "X-wt-refresh".to_string(),
        }
    }

    #[derive(Serialize)]
    struct UntypedClaims<'a> {
        sub: &'a str,
        iss: &'a str,
        aud: &'a str,
        exp: i64,
    }

    fn sign_untyped(secret: &str, iss: &str, exp: i64, alg: Algorithm) -> String {
        let claims = UntypedClaims {
            sub: "1234",
            iss,
            aud: iss,
            exp,
        };
        encode(
            &Header::new(alg),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn test_tokens_issued_together_differ() {
        let service = TokenService::new(&test_config("secret"));
        let first = service.issue_refresh_token("1234").unwrap().token;
        let second = service.issue_refresh_token("1234").unwrap().token;
        assert_ne!(first, second);
    }

    #[test]
    fn test_access_token_round_trip() {
        let tokens = TokenService::new(&test_config("sekrit"));
        let issued = tokens.issue_access_token("1234").unwrap();

        let claims = tokens.verify_access_token(&issued.token).unwrap();
        assert_eq!(claims.sub, "1234");
        assert_eq!(claims.iss, "weight-tracker");
        assert_eq!(claims.aud, "weight-tracker");
        assert_eq!(claims.token_type, TokenType::Access);
        assert!(issued.expires_at > Utc::now());
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let issuer = TokenService::new(&test_config("sekrit"));
        let verifier = TokenService::new(&test_config("sekrit1"));

        let issued = issuer.issue_access_token("1234").unwrap();
        assert!(verifier.verify_access_token(&issued.token).is_err());
    }

    #[test]
    fn test_expired_by_one_second_is_rejected() {
        let tokens = TokenService::new(&test_config("sekrit"));
        let token = sign_untyped(
            "sekrit",
            "weight-tracker",
            Utc::now().timestamp() - 1,
            Algorithm::HS256,
        );

        assert!(matches!(
            tokens.verify_access_token(&token),
            Err(JwtError::TokenExpired)
        ));
    }

    #[test]
    fn test_token_without_type_counts_as_access() {
        let tokens = TokenService::new(&test_config("sekrit"));
        let token = sign_untyped(
            "sekrit",
            "weight-tracker",
            Utc::now().timestamp() + 60,
            Algorithm::HS256,
        );

        let claims = tokens.verify_access_token(&token).unwrap();
        assert_eq!(claims.sub, "1234");
    }

    #[test]
    fn test_issuer_mismatch_is_rejected() {
        let tokens = TokenService::new(&test_config("sekrit"));
        let token = sign_untyped(
            "sekrit",
            "someone-else",
            Utc::now().timestamp() + 60,
            Algorithm::HS256,
        );

        assert!(tokens.verify_access_token(&token).is_err());
    }

    #[test]
    fn test_other_algorithm_is_rejected() {
        let tokens = TokenService::new(&test_config("sekrit"));
        let token = sign_untyped(
            "sekrit",
            "weight-tracker",
            Utc::now().timestamp() + 60,
            Algorithm::HS512,
        );

        assert!(tokens.verify_access_token(&token).is_err());
    }

    #[test]
    fn test_refresh_token_uses_its_own_key() {
        let tokens = TokenService::new(&test_config("sekrit"));
        let refresh = tokens.issue_refresh_token("1234").unwrap();

        assert!(tokens.verify_refresh_token(&refresh.token).is_ok());
        assert!(tokens.verify_access_token(&refresh.token).is_err());
    }

    #[test]
    fn test_purpose_tokens_are_not_access_tokens() {
        let tokens = TokenService::new(&test_config("sekrit"));
        let reset = tokens.issue_password_reset_token("1234").unwrap();

        assert!(matches!(
            tokens.verify_access_token(&reset.token),
            Err(JwtError::WrongTokenType("password_reset"))
        ));
        assert!(tokens
            .verify_purpose_token(&reset.token, TokenType::PasswordReset)
            .is_ok());
        assert!(tokens
            .verify_purpose_token(&reset.token, TokenType::AccountConfirmation)
            .is_err());
    }

    #[test]
    fn test_email_confirmation_carries_address() {
        let tokens = TokenService::new(&test_config("sekrit"));
        let issued = tokens
            .issue_email_confirmation_token("1234", "new@example.com")
            .unwrap();

        let claims = tokens
            .verify_purpose_token(&issued.token, TokenType::EmailConfirmation)
            .unwrap();
        assert_eq!(claims.email.as_deref(), Some("new@example.com"));
    }
}
