// ABOUTME: Route handlers for the caller's own likes, saves, and follows
// ABOUTME: Listing is scoped to the caller; deletion by row id is owner-only
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get},
    Json, Router,
};

use super::query_params;
use super::recipes::{LikeResponse, SaveResponse};
use super::users::FollowResponse;
use crate::errors::AppError;
use crate::models::{Follow, InteractionKind, LikedRecipe, SavedRecipe};
use crate::pagination::PageQuery;
use crate::resources::ServerResources;
use crate::services::ledger;

/// Ledger row routes
pub struct InteractionRoutes;

impl InteractionRoutes {
    /// Create all ledger row routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/likes", get(Self::handle_list_likes))
            .route("/api/likes/:id", delete(Self::handle_delete_like))
            .route("/api/saves", get(Self::handle_list_saves))
            .route("/api/saves/:id", delete(Self::handle_delete_save))
            .route("/api/follows", get(Self::handle_list_follows))
            .route("/api/follows/:id", delete(Self::handle_delete_follow))
            .with_state(resources)
    }

    /// Handle GET /api/likes
    async fn handle_list_likes(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        page: Result<Query<PageQuery>, QueryRejection>,
    ) -> Result<Response, AppError> {
        let subject = resources.auth_middleware.authenticate(&headers)?;
        let page = resources.page_request(query_params(page)?)?;

        let entries =
            ledger::list_own(&resources.database, &subject, InteractionKind::Like, page).await?;
        let body = entries.map(|entry| LikeResponse::from(LikedRecipe::from(entry)));
        Ok((StatusCode::OK, Json(body)).into_response())
    }

    /// Handle GET /api/saves
    async fn handle_list_saves(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        page: Result<Query<PageQuery>, QueryRejection>,
    ) -> Result<Response, AppError> {
        let subject = resources.auth_middleware.authenticate(&headers)?;
        let page = resources.page_request(query_params(page)?)?;

        let entries =
            ledger::list_own(&resources.database, &subject, InteractionKind::Save, page).await?;
        let body = entries.map(|entry| SaveResponse::from(SavedRecipe::from(entry)));
        Ok((StatusCode::OK, Json(body)).into_response())
    }

    /// Handle GET /api/follows
    async fn handle_list_follows(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        page: Result<Query<PageQuery>, QueryRejection>,
    ) -> Result<Response, AppError> {
        let subject = resources.auth_middleware.authenticate(&headers)?;
        let page = resources.page_request(query_params(page)?)?;

        let entries =
            ledger::list_own(&resources.database, &subject, InteractionKind::Follow, page).await?;
        let body = entries.map(|entry| FollowResponse::from(Follow::from(entry)));
        Ok((StatusCode::OK, Json(body)).into_response())
    }

    /// Handle DELETE /api/likes/:id
    async fn handle_delete_like(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(entry_id): Path<i64>,
    ) -> Result<Response, AppError> {
        Self::delete_entry(&resources, &headers, InteractionKind::Like, entry_id).await
    }

    /// Handle DELETE /api/saves/:id
    async fn handle_delete_save(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(entry_id): Path<i64>,
    ) -> Result<Response, AppError> {
        Self::delete_entry(&resources, &headers, InteractionKind::Save, entry_id).await
    }

    /// Handle DELETE /api/follows/:id
    async fn handle_delete_follow(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(entry_id): Path<i64>,
    ) -> Result<Response, AppError> {
        Self::delete_entry(&resources, &headers, InteractionKind::Follow, entry_id).await
    }

    async fn delete_entry(
        resources: &ServerResources,
        headers: &HeaderMap,
        kind: InteractionKind,
        entry_id: i64,
    ) -> Result<Response, AppError> {
        let subject = resources.auth_middleware.authenticate(headers)?;
        ledger::delete_entry(&resources.database, &subject, kind, entry_id).await?;
        Ok(StatusCode::NO_CONTENT.into_response())
    }
}
