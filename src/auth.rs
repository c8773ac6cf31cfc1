// ABOUTME: JWT-based authentication with HS256 access and refresh tokens
// ABOUTME: Handles token issuance, detailed validation errors, and bcrypt password hashing
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Authentication
//!
//! Two stateless token types share one signing secret:
//!
//! - **access**: short-lived, sent as `Authorization: Bearer <jwt>`
//! - **refresh**: longer-lived, exchanged for new access tokens until it
//!   expires or its `jti` lands in the revocation table
//!
//! Both carry the user id in `sub`, a `token_type`, and a unique `jti`.

use std::error::Error as StdError;
use std::fmt::{self, Display, Formatter};

use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::{Error as JwtError, ErrorKind};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tokio::task;
use uuid::Uuid;

use crate::config::environment::AuthConfig;
use crate::constants::tokens;
use crate::errors::{AppError, AppResult};

/// bcrypt work factor
const BCRYPT_COST: u32 = bcrypt::DEFAULT_COST;

/// Kind of JWT issued by the server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    /// Bearer token for API calls
    Access,
    /// Token exchanged for new access tokens
    Refresh,
}

impl TokenType {
    /// Claim value
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Access => tokens::ACCESS,
            Self::Refresh => tokens::REFRESH,
        }
    }
}

impl Display for TokenType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `JWT` validation error with detailed information
#[derive(Debug, Clone)]
pub enum JwtValidationError {
    /// Token has expired
    TokenExpired {
        /// When the token expired
        expired_at: DateTime<Utc>,
    },
    /// Token signature or claims are invalid
    TokenInvalid {
        /// Reason for invalidity
        reason: String,
    },
    /// Token is malformed (not proper `JWT` format)
    TokenMalformed {
        /// Details about malformation
        details: String,
    },
    /// Token is valid but of the other type
    WrongTokenType {
        /// Type the endpoint accepts
        expected: TokenType,
    },
}

impl Display for JwtValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::TokenExpired { expired_at } => write!(
                f,
                "JWT token expired at {}",
                expired_at.format("%Y-%m-%d %H:%M:%S UTC")
            ),
            Self::TokenInvalid { reason } => write!(f, "JWT token is invalid: {reason}"),
            Self::TokenMalformed { details } => write!(f, "JWT token is malformed: {details}"),
            Self::WrongTokenType { expected } => {
                write!(f, "Token has wrong type, expected {expected} token")
            }
        }
    }
}

impl StdError for JwtValidationError {}

impl From<JwtValidationError> for AppError {
    fn from(error: JwtValidationError) -> Self {
        match &error {
            JwtValidationError::TokenExpired { .. } => Self::auth_expired(),
            _ => Self::auth_invalid(error.to_string()),
        }
    }
}

/// `JWT` claims shared by access and refresh tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub sub: String,
    /// Access or refresh
    pub token_type: TokenType,
    /// Unique token id, used for revocation
    pub jti: String,
    /// Issued at timestamp
    pub iat: i64,
    /// Expiration timestamp
    pub exp: i64,
    /// Audience
    pub aud: String,
}

impl Claims {
    /// Parse the subject as a user id
    ///
    /// # Errors
    ///
    /// Returns an error if `sub` is not an integer
    pub fn user_id(&self) -> Result<i64, JwtValidationError> {
        self.sub
            .parse()
            .map_err(|_| JwtValidationError::TokenMalformed {
                details: format!("Subject is not a user id: {}", self.sub),
            })
    }

    /// Expiry as a timestamp
    #[must_use]
    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.exp, 0).unwrap_or_else(Utc::now)
    }
}

/// Access and refresh tokens issued together at login
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    /// Access token
    pub access: String,
    /// Refresh token
    pub refresh: String,
}

/// Issues and validates HS256 tokens
#[derive(Clone)]
pub struct AuthManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_token_expiry: Duration,
    refresh_token_expiry: Duration,
}

impl AuthManager {
    /// Create a new authentication manager from the token configuration
    #[must_use]
    pub fn new(config: &AuthConfig) -> Self {
        let secret = config.jwt_secret.as_bytes();
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            access_token_expiry: Duration::minutes(config.access_token_expiry_minutes),
            refresh_token_expiry: Duration::hours(config.refresh_token_expiry_hours),
        }
    }

    /// Generate a signed token of the given type for a user
    ///
    /// # Errors
    ///
    /// Returns an error if JWT encoding fails
    pub fn generate_token(&self, user_id: i64, token_type: TokenType) -> AppResult<String> {
        let now = Utc::now();
        let lifetime = match token_type {
            TokenType::Access => self.access_token_expiry,
            TokenType::Refresh => self.refresh_token_expiry,
        };

        let claims = Claims {
            sub: user_id.to_string(),
            token_type,
            jti: Uuid::new_v4().to_string(),
            iat: now.timestamp(),
            exp: (now + lifetime).timestamp(),
            aud: tokens::AUDIENCE.to_owned(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to sign {token_type} token: {e}")))
    }

    /// Issue an access and refresh token pair
    ///
    /// # Errors
    ///
    /// Returns an error if JWT encoding fails
    pub fn generate_token_pair(&self, user_id: i64) -> AppResult<TokenPair> {
        Ok(TokenPair {
            access: self.generate_token(user_id, TokenType::Access)?,
            refresh: self.generate_token(user_id, TokenType::Refresh)?,
        })
    }

    /// Validate a token and require the given type
    ///
    /// # Errors
    ///
    /// Returns a [`JwtValidationError`] if the token is malformed, has an
    /// invalid signature or audience, has expired, or is of the other type
    pub fn validate_token(
        &self,
        token: &str,
        expected: TokenType,
    ) -> Result<Claims, JwtValidationError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[tokens::AUDIENCE]);
        validation.leeway = 0;

        let claims = decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| Self::convert_jwt_error(token, &e))?;

        if claims.token_type != expected {
            tracing::debug!(
                user_id = %claims.sub,
                actual = %claims.token_type,
                expected = %expected,
                "Token type mismatch"
            );
            return Err(JwtValidationError::WrongTokenType { expected });
        }

        Ok(claims)
    }

    /// Convert JWT library errors to detailed validation errors
    fn convert_jwt_error(token: &str, e: &JwtError) -> JwtValidationError {
        tracing::debug!("JWT token validation failed: {e:?}");

        match e.kind() {
            ErrorKind::ExpiredSignature => JwtValidationError::TokenExpired {
                expired_at: Self::unverified_expiry(token).unwrap_or_else(Utc::now),
            },
            ErrorKind::InvalidSignature => JwtValidationError::TokenInvalid {
                reason: "Token signature verification failed".into(),
            },
            ErrorKind::InvalidAudience => JwtValidationError::TokenInvalid {
                reason: "Token audience mismatch".into(),
            },
            ErrorKind::InvalidToken => JwtValidationError::TokenMalformed {
                details: "Token format is invalid".into(),
            },
            ErrorKind::Base64(base64_err) => JwtValidationError::TokenMalformed {
                details: format!("Token contains invalid base64: {base64_err}"),
            },
            ErrorKind::Json(json_err) => JwtValidationError::TokenMalformed {
                details: format!("Token contains invalid JSON: {json_err}"),
            },
            ErrorKind::Utf8(utf8_err) => JwtValidationError::TokenMalformed {
                details: format!("Token contains invalid UTF-8: {utf8_err}"),
            },
            _ => JwtValidationError::TokenInvalid {
                reason: format!("Token validation failed: {e}"),
            },
        }
    }

    /// Read `exp` from a token whose signature already failed the expiry check
    fn unverified_expiry(token: &str) -> Option<DateTime<Utc>> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;
        validation.validate_aud = false;
        decode::<Claims>(token, &DecodingKey::from_secret(&[]), &validation)
            .ok()
            .map(|data| data.claims.expires_at())
    }
}

/// Hash a password with bcrypt off the async executor
///
/// # Errors
///
/// Returns an error if hashing fails or the blocking task panics
pub async fn hash_password(password: String) -> AppResult<String> {
    task::spawn_blocking(move || bcrypt::hash(password, BCRYPT_COST))
        .await
        .map_err(|e| AppError::internal(format!("Password hashing task failed: {e}")))?
        .map_err(|e| AppError::internal(format!("Failed to hash password: {e}")))
}

/// Verify a password against a stored bcrypt hash off the async executor
///
/// # Errors
///
/// Returns an error if the stored hash is unreadable or the blocking task panics
pub async fn verify_password(password: String, password_hash: String) -> AppResult<bool> {
    task::spawn_blocking(move || bcrypt::verify(password, &password_hash))
        .await
        .map_err(|e| AppError::internal(format!("Password verification task failed: {e}")))?
        .map_err(|e| AppError::internal(format!("Failed to verify password: {e}")))
}

/// Generate a random `JWT` secret
///
/// # Errors
/// Returns an error if system RNG fails - the server cannot operate securely
/// without working RNG
pub fn generate_jwt_secret() -> Result<[u8; 64]> {
    use ring::rand::{SecureRandom, SystemRandom};

    let rng = SystemRandom::new();
    let mut secret = [0u8; 64];

    rng.fill(&mut secret).map_err(|e| {
        tracing::error!("CRITICAL: Failed to generate cryptographically secure JWT secret: {e}");
        anyhow::anyhow!("System RNG failure - cannot generate secure JWT secret")
    })?;

    Ok(secret)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::environment::JwtSecret;

    fn manager(access_minutes: i64) -> AuthManager {
        AuthManager::new(&AuthConfig {
            jwt_secret: JwtSecret::new(b"unit-test-secret".to_vec()),
            access_token_expiry_minutes: access_minutes,
            refresh_token_expiry_hours: 24,
        })
    }

    #[test]
    fn test_access_token_round_trip() {
        let auth = manager(60);
        let token = auth.generate_token(42, TokenType::Access).unwrap();
        let claims = auth.validate_token(&token, TokenType::Access).unwrap();
        assert_eq!(claims.user_id().unwrap(), 42);
        assert_eq!(claims.aud, tokens::AUDIENCE);
    }

    #[test]
    fn test_token_type_enforced() {
        let auth = manager(60);
        let pair = auth.generate_token_pair(7).unwrap();
        assert!(matches!(
            auth.validate_token(&pair.refresh, TokenType::Access),
            Err(JwtValidationError::WrongTokenType { .. })
        ));
        assert!(matches!(
            auth.validate_token(&pair.access, TokenType::Refresh),
            Err(JwtValidationError::WrongTokenType { .. })
        ));
    }

    #[test]
    fn test_unique_jti_per_token() {
        let auth = manager(60);
        let first = auth.generate_token(1, TokenType::Refresh).unwrap();
        let second = auth.generate_token(1, TokenType::Refresh).unwrap();
        let a = auth.validate_token(&first, TokenType::Refresh).unwrap();
        let b = auth.validate_token(&second, TokenType::Refresh).unwrap();
        assert_ne!(a.jti, b.jti);
    }

    #[test]
    fn test_expired_token_detected() {
        let auth = manager(-5);
        let token = auth.generate_token(3, TokenType::Access).unwrap();
        let error = auth.validate_token(&token, TokenType::Access).unwrap_err();
        assert!(matches!(error, JwtValidationError::TokenExpired { .. }));
        assert_eq!(AppError::from(error).http_status(), 401);
    }

    #[test]
    fn test_foreign_secret_rejected() {
        let token = manager(60).generate_token(3, TokenType::Access).unwrap();
        let other = AuthManager::new(&AuthConfig {
            jwt_secret: JwtSecret::new(b"another-secret".to_vec()),
            access_token_expiry_minutes: 60,
            refresh_token_expiry_hours: 24,
        });
        assert!(matches!(
            other.validate_token(&token, TokenType::Access),
            Err(JwtValidationError::TokenInvalid { .. })
        ));
    }

    #[test]
    fn test_garbage_is_malformed() {
        let error = manager(60)
            .validate_token("not.a.jwt", TokenType::Access)
            .unwrap_err();
        assert!(matches!(error, JwtValidationError::TokenMalformed { .. }));
    }

    #[tokio::test]
    async fn test_password_hashing() {
        let hash = hash_password("correct horse".to_owned()).await.unwrap();
        assert!(verify_password("correct horse".to_owned(), hash.clone())
            .await
            .unwrap());
        assert!(!verify_password("wrong".to_owned(), hash).await.unwrap());
    }
}
