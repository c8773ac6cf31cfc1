// ABOUTME: Category route handlers: open listing and authenticated creation
// ABOUTME: Duplicate names surface as 400 with a fixed message
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use super::json_body;
use crate::errors::AppError;
use crate::models::Category;
use crate::resources::ServerResources;
use crate::services::content::{self, CategoryPayload};

#[derive(Debug, Serialize, Deserialize)]
pub struct CategoryResponse {
    pub id: i64,
    pub name: String,
}

impl From<Category> for CategoryResponse {
    fn from(category: Category) -> Self {
        Self {
            id: category.id,
            name: category.name,
        }
    }
}

/// Category routes
pub struct CategoryRoutes;

impl CategoryRoutes {
    /// Create all category routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(
                "/api/categories",
                get(Self::handle_list).post(Self::handle_create),
            )
            .with_state(resources)
    }

    /// Handle GET /api/categories
    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
    ) -> Result<Response, AppError> {
        let categories: Vec<CategoryResponse> = content::list_categories(&resources.database)
            .await?
            .into_iter()
            .map(Into::into)
            .collect();
        Ok((StatusCode::OK, Json(categories)).into_response())
    }

    /// Handle POST /api/categories
    async fn handle_create(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        body: Result<Json<CategoryPayload>, JsonRejection>,
    ) -> Result<Response, AppError> {
        let subject = resources.auth_middleware.authenticate(&headers)?;
        let payload = json_body(body)?;

        let category = content::create_category(&resources.database, &subject, payload).await?;
        Ok((StatusCode::CREATED, Json(CategoryResponse::from(category))).into_response())
    }
}
