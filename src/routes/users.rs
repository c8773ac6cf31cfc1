// ABOUTME: User route handlers for profiles, user listing, and the follow graph
// ABOUTME: Every endpoint requires an access token; profile updates are owner-only
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{json_body, query_params};
use crate::errors::AppError;
use crate::filters::UserFilter;
use crate::models::{Follow, InteractionKind, UserSummary};
use crate::pagination::{Page, PageQuery};
use crate::resources::ServerResources;
use crate::services::{identity, identity::ProfileUpdate, ledger};

/// Public profile with derived counts
#[derive(Debug, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub id: i64,
    pub email: String,
    pub username: String,
    pub photo: Option<String>,
    pub bio: Option<String>,
    pub followers_count: i64,
    pub following_count: i64,
    pub recipes_count: i64,
}

impl From<UserSummary> for ProfileResponse {
    fn from(user: UserSummary) -> Self {
        Self {
            id: user.id,
            email: user.email,
            username: user.username,
            photo: user.photo,
            bio: user.bio,
            followers_count: user.followers_count,
            following_count: user.following_count,
            recipes_count: user.recipes_count,
        }
    }
}

/// A follow row
#[derive(Debug, Serialize, Deserialize)]
pub struct FollowResponse {
    pub id: i64,
    pub follower: i64,
    pub followed: i64,
    pub followed_on: DateTime<Utc>,
}

impl From<Follow> for FollowResponse {
    fn from(follow: Follow) -> Self {
        Self {
            id: follow.id,
            follower: follow.follower_id,
            followed: follow.followed_id,
            followed_on: follow.followed_on,
        }
    }
}

/// User routes
pub struct UserRoutes;

impl UserRoutes {
    /// Create all user routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/users", get(Self::handle_list_users))
            .route(
                "/api/users/:id",
                get(Self::handle_get_profile).put(Self::handle_update_profile),
            )
            .route("/api/users/:id/followers", get(Self::handle_followers))
            .route("/api/users/:id/following", get(Self::handle_following))
            .route(
                "/api/users/:id/follow",
                post(Self::handle_follow).delete(Self::handle_unfollow),
            )
            .with_state(resources)
    }

    /// Handle GET /api/users
    async fn handle_list_users(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        filter: Result<Query<UserFilter>, QueryRejection>,
        page: Result<Query<PageQuery>, QueryRejection>,
    ) -> Result<Response, AppError> {
        resources.auth_middleware.authenticate(&headers)?;
        let filter = query_params(filter)?;
        let page = resources.page_request(query_params(page)?)?;

        let users = identity::list_users(&resources.database, &filter, page).await?;
        let body: Page<ProfileResponse> = users.map(Into::into);
        Ok((StatusCode::OK, Json(body)).into_response())
    }

    /// Handle GET /api/users/:id
    async fn handle_get_profile(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(user_id): Path<i64>,
    ) -> Result<Response, AppError> {
        resources.auth_middleware.authenticate(&headers)?;
        let profile = identity::get_profile(&resources.database, user_id).await?;
        Ok((StatusCode::OK, Json(ProfileResponse::from(profile))).into_response())
    }

    /// Handle PUT /api/users/:id
    async fn handle_update_profile(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(user_id): Path<i64>,
        body: Result<Json<ProfileUpdate>, JsonRejection>,
    ) -> Result<Response, AppError> {
        let subject = resources.auth_middleware.authenticate(&headers)?;
        let update = json_body(body)?;

        let profile =
            identity::update_profile(&resources.database, &subject, user_id, update).await?;
        Ok((StatusCode::OK, Json(ProfileResponse::from(profile))).into_response())
    }

    /// Handle GET /api/users/:id/followers
    async fn handle_followers(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(user_id): Path<i64>,
        page: Result<Query<PageQuery>, QueryRejection>,
    ) -> Result<Response, AppError> {
        resources.auth_middleware.authenticate(&headers)?;
        let page = resources.page_request(query_params(page)?)?;

        let users = ledger::followers(&resources.database, user_id, page).await?;
        let body: Page<ProfileResponse> = users.map(Into::into);
        Ok((StatusCode::OK, Json(body)).into_response())
    }

    /// Handle GET /api/users/:id/following
    async fn handle_following(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(user_id): Path<i64>,
        page: Result<Query<PageQuery>, QueryRejection>,
    ) -> Result<Response, AppError> {
        resources.auth_middleware.authenticate(&headers)?;
        let page = resources.page_request(query_params(page)?)?;

        let users = ledger::following(&resources.database, user_id, page).await?;
        let body: Page<ProfileResponse> = users.map(Into::into);
        Ok((StatusCode::OK, Json(body)).into_response())
    }

    /// Handle POST /api/users/:id/follow
    async fn handle_follow(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(user_id): Path<i64>,
    ) -> Result<Response, AppError> {
        let subject = resources.auth_middleware.authenticate(&headers)?;
        let entry =
            ledger::add(&resources.database, &subject, InteractionKind::Follow, user_id).await?;
        Ok((
            StatusCode::CREATED,
            Json(FollowResponse::from(Follow::from(entry))),
        )
            .into_response())
    }

    /// Handle DELETE /api/users/:id/follow
    async fn handle_unfollow(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(user_id): Path<i64>,
    ) -> Result<Response, AppError> {
        let subject = resources.auth_middleware.authenticate(&headers)?;
        ledger::remove_for_target(&resources.database, &subject, InteractionKind::Follow, user_id)
            .await?;
        Ok(StatusCode::NO_CONTENT.into_response())
    }
}
