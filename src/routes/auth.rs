// ABOUTME: Authentication route handlers for registration, login, refresh, and logout
// ABOUTME: Response DTOs never carry the password hash
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use super::{json_body, MessageResponse};
use crate::errors::AppError;
use crate::models::User;
use crate::resources::ServerResources;
use crate::services::identity::{self, Credentials, Registration, Session};

/// Newly registered user
#[derive(Debug, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: i64,
    pub email: String,
    pub username: String,
    pub photo: Option<String>,
    pub bio: Option<String>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            username: user.username,
            photo: user.photo,
            bio: user.bio,
        }
    }
}

/// Tokens issued at login alongside the user's id and name
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    /// User ID
    pub user: i64,
    pub username: String,
    pub refresh: String,
    pub access: String,
}

impl From<Session> for LoginResponse {
    fn from(session: Session) -> Self {
        Self {
            user: session.user.id,
            username: session.user.username,
            refresh: session.tokens.refresh,
            access: session.tokens.access,
        }
    }
}

/// Refresh request body
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh: String,
}

/// Fresh access token
#[derive(Debug, Serialize, Deserialize)]
pub struct RefreshResponse {
    pub access: String,
}

/// Logout request body
#[derive(Debug, Deserialize)]
pub struct LogoutRequest {
    pub refresh_token: String,
}

/// Authentication routes
pub struct AuthRoutes;

impl AuthRoutes {
    /// Create all authentication routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/auth/register", post(Self::handle_register))
            .route("/api/auth/login", post(Self::handle_login))
            .route("/api/auth/token/refresh", post(Self::handle_refresh))
            .route("/api/auth/logout", post(Self::handle_logout))
            .with_state(resources)
    }

    /// Handle POST /api/auth/register
    async fn handle_register(
        State(resources): State<Arc<ServerResources>>,
        body: Result<Json<Registration>, JsonRejection>,
    ) -> Result<Response, AppError> {
        let registration = json_body(body)?;
        let user = identity::register(&resources.database, registration).await?;
        Ok((StatusCode::CREATED, Json(UserResponse::from(user))).into_response())
    }

    /// Handle POST /api/auth/login
    async fn handle_login(
        State(resources): State<Arc<ServerResources>>,
        body: Result<Json<Credentials>, JsonRejection>,
    ) -> Result<Response, AppError> {
        let credentials = json_body(body)?;
        let session =
            identity::login(&resources.database, &resources.auth_manager, credentials).await?;
        Ok((StatusCode::OK, Json(LoginResponse::from(session))).into_response())
    }

    /// Handle POST /api/auth/token/refresh
    ///
    /// Every failure, including a malformed body, is reported as 401.
    async fn handle_refresh(
        State(resources): State<Arc<ServerResources>>,
        body: Result<Json<RefreshRequest>, JsonRejection>,
    ) -> Result<Response, AppError> {
        let request = json_body(body)
            .map_err(|e| AppError::auth_invalid(format!("Refresh token required: {}", e.message)))?;
        let access =
            identity::refresh(&resources.database, &resources.auth_manager, &request.refresh)
                .await?;
        Ok((StatusCode::OK, Json(RefreshResponse { access })).into_response())
    }

    /// Handle POST /api/auth/logout
    async fn handle_logout(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        body: Result<Json<LogoutRequest>, JsonRejection>,
    ) -> Result<Response, AppError> {
        let subject = resources.auth_middleware.authenticate(&headers)?;
        let request = json_body(body)?;
        identity::logout(
            &resources.database,
            &resources.auth_manager,
            &subject,
            &request.refresh_token,
        )
        .await?;
        Ok((
            StatusCode::OK,
            Json(MessageResponse::new("You have successfully logged out.")),
        )
            .into_response())
    }
}
