// ABOUTME: Route module organization for the Cooks Corner HTTP API
// ABOUTME: Assembles domain routers with tracing and CORS layers around them
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! HTTP routes
//!
//! Each domain module holds thin handlers that authenticate, parse, and
//! delegate to the service layer, plus the response DTOs for its entities.

use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::Query;
use axum::{Json, Router};
use serde::Serialize;
use tower_http::trace::TraceLayer;

use crate::errors::{AppError, AppResult, ErrorCode};
use crate::middleware::setup_cors;
use crate::resources::ServerResources;

/// Registration, login, refresh, and logout
pub mod auth;
/// Category listing and creation
pub mod categories;
/// Liveness endpoint
pub mod health;
/// Own likes, saves, and follows by row id
pub mod interactions;
/// Recipes, images, likes, and saves
pub mod recipes;
/// Profiles, user listing, follows
pub mod users;

pub use auth::AuthRoutes;
pub use categories::CategoryRoutes;
pub use health::HealthRoutes;
pub use interactions::InteractionRoutes;
pub use recipes::RecipeRoutes;
pub use users::UserRoutes;

/// Build the complete application router
#[must_use]
pub fn build_router(resources: Arc<ServerResources>) -> Router {
    let cors = setup_cors(&resources.config);

    Router::new()
        .merge(HealthRoutes::routes())
        .merge(AuthRoutes::routes(Arc::clone(&resources)))
        .merge(UserRoutes::routes(Arc::clone(&resources)))
        .merge(CategoryRoutes::routes(Arc::clone(&resources)))
        .merge(RecipeRoutes::routes(Arc::clone(&resources)))
        .merge(InteractionRoutes::routes(resources))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// Unwrap a JSON body, reporting malformed payloads as `InvalidInput`
/// and absent fields as `MissingRequiredField`
///
/// # Errors
///
/// Returns a 400-class error carrying the rejection text
pub(crate) fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> AppResult<T> {
    body.map(|Json(value)| value).map_err(|rejection| {
        let text = rejection.body_text();
        let missing_field = matches!(rejection, JsonRejection::JsonDataError(_))
            && text.contains("missing field");
        if missing_field {
            AppError::new(ErrorCode::MissingRequiredField, text)
        } else {
            AppError::invalid_input(text)
        }
    })
}

/// Unwrap query parameters, reporting unparseable values as `InvalidInput`
///
/// # Errors
///
/// Returns `InvalidInput` carrying the rejection text
pub(crate) fn query_params<T>(query: Result<Query<T>, QueryRejection>) -> AppResult<T> {
    query
        .map(|Query(value)| value)
        .map_err(|rejection| AppError::invalid_input(rejection.body_text()))
}

/// Plain confirmation body
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
