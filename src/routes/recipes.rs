// ABOUTME: Recipe route handlers for CRUD, filtered listing, images, likes, and saves
// ABOUTME: Listing and detail reads are open; every mutation needs an access token
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
    routing::{delete, get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{json_body, query_params};
use crate::errors::AppError;
use crate::filters::RecipeFilter;
use crate::models::{
    Ingredient, InteractionKind, LikedRecipe, RecipeDetail, RecipeImage, RecipeSummary,
    SavedRecipe,
};
use crate::pagination::{Page, PageQuery};
use crate::resources::ServerResources;
use crate::services::content::{self, ImagePayload, RecipePayload, RecipeUpdatePayload};
use crate::services::ledger;

#[derive(Debug, Serialize, Deserialize)]
pub struct IngredientResponse {
    pub id: i64,
    pub name: String,
    pub quantity: i64,
    pub unit: String,
}

impl From<Ingredient> for IngredientResponse {
    fn from(ingredient: Ingredient) -> Self {
        Self {
            id: ingredient.id,
            name: ingredient.name,
            quantity: ingredient.quantity,
            unit: ingredient.unit,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ImageResponse {
    pub id: i64,
    pub recipe: i64,
    pub image: String,
    pub created_at: DateTime<Utc>,
}

impl From<RecipeImage> for ImageResponse {
    fn from(image: RecipeImage) -> Self {
        Self {
            id: image.id,
            recipe: image.recipe_id,
            image: image.image,
            created_at: image.created_at,
        }
    }
}

/// Full recipe as returned by detail, create, and update
#[derive(Debug, Serialize, Deserialize)]
pub struct RecipeDetailResponse {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub cook_time: String,
    pub difficulty: String,
    pub author: i64,
    pub author_username: String,
    pub category: i64,
    pub category_name: String,
    pub ingredients: Vec<IngredientResponse>,
    pub images: Vec<ImageResponse>,
    pub likes_count: i64,
    pub saves_count: i64,
    pub created_at: DateTime<Utc>,
}

impl From<RecipeDetail> for RecipeDetailResponse {
    fn from(detail: RecipeDetail) -> Self {
        let recipe = detail.recipe;
        Self {
            id: recipe.id,
            title: recipe.title,
            description: recipe.description,
            cook_time: recipe.cook_time,
            difficulty: recipe.difficulty.as_str().to_owned(),
            author: recipe.author_id,
            author_username: detail.author_username,
            category: recipe.category_id,
            category_name: detail.category_name,
            ingredients: detail.ingredients.into_iter().map(Into::into).collect(),
            images: detail.images.into_iter().map(Into::into).collect(),
            likes_count: detail.likes_count,
            saves_count: detail.saves_count,
            created_at: recipe.created_at,
        }
    }
}

/// Listing row
#[derive(Debug, Serialize, Deserialize)]
pub struct RecipeSummaryResponse {
    pub id: i64,
    pub title: String,
    pub cook_time: String,
    pub difficulty: String,
    pub author: i64,
    pub author_username: String,
    pub category: i64,
    pub category_name: String,
    /// First attached image, if any
    pub image: Option<String>,
    pub likes_count: i64,
    pub saves_count: i64,
}

impl From<RecipeSummary> for RecipeSummaryResponse {
    fn from(summary: RecipeSummary) -> Self {
        Self {
            id: summary.id,
            title: summary.title,
            cook_time: summary.cook_time,
            difficulty: summary.difficulty.as_str().to_owned(),
            author: summary.author_id,
            author_username: summary.author_username,
            category: summary.category_id,
            category_name: summary.category_name,
            image: summary.image,
            likes_count: summary.likes_count,
            saves_count: summary.saves_count,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LikeResponse {
    pub id: i64,
    pub user: i64,
    pub recipe: i64,
    pub liked_on: DateTime<Utc>,
}

impl From<LikedRecipe> for LikeResponse {
    fn from(like: LikedRecipe) -> Self {
        Self {
            id: like.id,
            user: like.user_id,
            recipe: like.recipe_id,
            liked_on: like.liked_on,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SaveResponse {
    pub id: i64,
    pub user: i64,
    pub recipe: i64,
    pub saved_on: DateTime<Utc>,
}

impl From<SavedRecipe> for SaveResponse {
    fn from(save: SavedRecipe) -> Self {
        Self {
            id: save.id,
            user: save.user_id,
            recipe: save.recipe_id,
            saved_on: save.saved_on,
        }
    }
}

/// Recipe routes
pub struct RecipeRoutes;

impl RecipeRoutes {
    /// Create all recipe routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(
                "/api/recipes",
                get(Self::handle_list).post(Self::handle_create),
            )
            .route(
                "/api/recipes/:id",
                get(Self::handle_get)
                    .put(Self::handle_update)
                    .delete(Self::handle_delete),
            )
            .route("/api/recipes/:id/images", post(Self::handle_attach_image))
            .route(
                "/api/recipes/:id/images/:image_id",
                delete(Self::handle_detach_image),
            )
            .route(
                "/api/recipes/:id/like",
                post(Self::handle_like).delete(Self::handle_unlike),
            )
            .route(
                "/api/recipes/:id/save",
                post(Self::handle_save).delete(Self::handle_unsave),
            )
            .with_state(resources)
    }

    /// Handle GET /api/recipes
    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        filter: Result<Query<RecipeFilter>, QueryRejection>,
        page: Result<Query<PageQuery>, QueryRejection>,
    ) -> Result<Response, AppError> {
        let subject = resources.auth_middleware.authenticate_optional(&headers)?;
        let filter = query_params(filter)?;
        let page = resources.page_request(query_params(page)?)?;

        let recipes =
            content::list_recipes(&resources.database, &filter, subject.as_ref(), page).await?;
        let body: Page<RecipeSummaryResponse> = recipes.map(Into::into);
        Ok((StatusCode::OK, Json(body)).into_response())
    }

    /// Handle POST /api/recipes
    async fn handle_create(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        body: Result<Json<RecipePayload>, JsonRejection>,
    ) -> Result<Response, AppError> {
        let subject = resources.auth_middleware.authenticate(&headers)?;
        let payload = json_body(body)?;

        let recipe = content::create_recipe(&resources.database, &subject, payload).await?;
        Ok((StatusCode::CREATED, Json(RecipeDetailResponse::from(recipe))).into_response())
    }

    /// Handle GET /api/recipes/:id
    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        Path(recipe_id): Path<i64>,
    ) -> Result<Response, AppError> {
        let recipe = content::get_recipe(&resources.database, recipe_id).await?;
        Ok((StatusCode::OK, Json(RecipeDetailResponse::from(recipe))).into_response())
    }

    /// Handle PUT /api/recipes/:id
    async fn handle_update(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(recipe_id): Path<i64>,
        body: Result<Json<RecipeUpdatePayload>, JsonRejection>,
    ) -> Result<Response, AppError> {
        let subject = resources.auth_middleware.authenticate(&headers)?;
        let payload = json_body(body)?;

        let recipe =
            content::update_recipe(&resources.database, &subject, recipe_id, payload).await?;
        Ok((StatusCode::OK, Json(RecipeDetailResponse::from(recipe))).into_response())
    }

    /// Handle DELETE /api/recipes/:id
    async fn handle_delete(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(recipe_id): Path<i64>,
    ) -> Result<Response, AppError> {
        let subject = resources.auth_middleware.authenticate(&headers)?;
        content::delete_recipe(&resources.database, &subject, recipe_id).await?;
        Ok(StatusCode::NO_CONTENT.into_response())
    }

    /// Handle POST /api/recipes/:id/images
    async fn handle_attach_image(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(recipe_id): Path<i64>,
        body: Result<Json<ImagePayload>, JsonRejection>,
    ) -> Result<Response, AppError> {
        let subject = resources.auth_middleware.authenticate(&headers)?;
        let payload = json_body(body)?;

        let image =
            content::attach_image(&resources.database, &subject, recipe_id, payload).await?;
        Ok((StatusCode::CREATED, Json(ImageResponse::from(image))).into_response())
    }

    /// Handle DELETE /api/recipes/:id/images/:image_id
    async fn handle_detach_image(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path((recipe_id, image_id)): Path<(i64, i64)>,
    ) -> Result<Response, AppError> {
        let subject = resources.auth_middleware.authenticate(&headers)?;
        content::detach_image(&resources.database, &subject, recipe_id, image_id).await?;
        Ok(StatusCode::NO_CONTENT.into_response())
    }

    /// Handle POST /api/recipes/:id/like
    async fn handle_like(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(recipe_id): Path<i64>,
    ) -> Result<Response, AppError> {
        let subject = resources.auth_middleware.authenticate(&headers)?;
        let entry =
            ledger::add(&resources.database, &subject, InteractionKind::Like, recipe_id).await?;
        Ok((
            StatusCode::CREATED,
            Json(LikeResponse::from(LikedRecipe::from(entry))),
        )
            .into_response())
    }

    /// Handle DELETE /api/recipes/:id/like
    async fn handle_unlike(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(recipe_id): Path<i64>,
    ) -> Result<Response, AppError> {
        let subject = resources.auth_middleware.authenticate(&headers)?;
        ledger::remove_for_target(&resources.database, &subject, InteractionKind::Like, recipe_id)
            .await?;
        Ok(StatusCode::NO_CONTENT.into_response())
    }

    /// Handle POST /api/recipes/:id/save
    async fn handle_save(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(recipe_id): Path<i64>,
    ) -> Result<Response, AppError> {
        let subject = resources.auth_middleware.authenticate(&headers)?;
        let entry =
            ledger::add(&resources.database, &subject, InteractionKind::Save, recipe_id).await?;
        Ok((
            StatusCode::CREATED,
            Json(SaveResponse::from(SavedRecipe::from(entry))),
        )
            .into_response())
    }

    /// Handle DELETE /api/recipes/:id/save
    async fn handle_unsave(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(recipe_id): Path<i64>,
    ) -> Result<Response, AppError> {
        let subject = resources.auth_middleware.authenticate(&headers)?;
        ledger::remove_for_target(&resources.database, &subject, InteractionKind::Save, recipe_id)
            .await?;
        Ok(StatusCode::NO_CONTENT.into_response())
    }
}
