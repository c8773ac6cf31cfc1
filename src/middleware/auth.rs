// ABOUTME: Bearer-token authentication turning an Authorization header into a Subject
// ABOUTME: Strict and optional variants for endpoints that require or merely accept a caller
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use axum::http::{header, HeaderMap};

use crate::auth::{AuthManager, TokenType};
use crate::errors::{AppError, AppResult};
use crate::logging::AppLogger;
use crate::permissions::Subject;

/// Resolves the request subject from an access token
#[derive(Clone)]
pub struct AuthMiddleware {
    auth_manager: Arc<AuthManager>,
}

impl AuthMiddleware {
    /// Create the middleware over a shared token manager
    #[must_use]
    pub const fn new(auth_manager: Arc<AuthManager>) -> Self {
        Self { auth_manager }
    }

    /// Authenticate a request that must carry an access token
    ///
    /// # Errors
    ///
    /// Returns `AuthRequired` when the header is missing, and `AuthInvalid`
    /// or `AuthExpired` when the token does not validate
    #[tracing::instrument(
        skip(self, headers),
        fields(user_id = tracing::field::Empty, success = tracing::field::Empty)
    )]
    pub fn authenticate(&self, headers: &HeaderMap) -> AppResult<Subject> {
        let Some(value) = headers.get(header::AUTHORIZATION) else {
            tracing::Span::current().record("success", false);
            return Err(AppError::auth_required());
        };
        let value = value
            .to_str()
            .map_err(|_| AppError::auth_invalid("Authorization header is not valid text"))?;
        self.authenticate_header(value)
    }

    /// Authenticate a request where the caller may be anonymous
    ///
    /// A present but invalid token is still rejected.
    ///
    /// # Errors
    ///
    /// Returns `AuthInvalid` or `AuthExpired` when a token is supplied and
    /// does not validate
    pub fn authenticate_optional(&self, headers: &HeaderMap) -> AppResult<Option<Subject>> {
        if headers.contains_key(header::AUTHORIZATION) {
            self.authenticate(headers).map(Some)
        } else {
            Ok(None)
        }
    }

    /// Validate a raw `Authorization` header value
    ///
    /// # Errors
    ///
    /// Returns `AuthInvalid` for a non-bearer scheme or a bad token and
    /// `AuthExpired` for an expired one
    pub fn authenticate_header(&self, value: &str) -> AppResult<Subject> {
        let Some(token) = value.strip_prefix("Bearer ").map(str::trim) else {
            AppLogger::log_security_event("unsupported_auth_scheme", "expected Bearer token", None);
            return Err(AppError::auth_invalid(
                "Authorization header must use the Bearer scheme",
            ));
        };

        let claims = self
            .auth_manager
            .validate_token(token, TokenType::Access)
            .inspect_err(|e| {
                tracing::Span::current().record("success", false);
                AppLogger::log_security_event("invalid_access_token", &e.to_string(), None);
            })?;
        let user_id = claims.user_id()?;

        tracing::Span::current()
            .record("user_id", user_id)
            .record("success", true);
        Ok(Subject::new(user_id))
    }
}
