// ABOUTME: Content store business logic for recipes, ingredients, images, and categories
// ABOUTME: Validates payloads and applies the ownership check before every mutation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::str::FromStr;

use serde::Deserialize;
use tracing::info;
use validator::Validate;

use crate::database::Database;
use crate::errors::{validate_input, AppError, AppResult};
use crate::filters::RecipeFilter;
use crate::models::{
    Category, Difficulty, IngredientInput, NewRecipe, Recipe, RecipeChanges, RecipeDetail,
    RecipeImage, RecipeSummary,
};
use crate::pagination::{Page, PageRequest};
use crate::permissions::{authorize, Action, Subject};

/// One ingredient line of a recipe payload
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct IngredientPayload {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(range(min = 0))]
    pub quantity: i64,
    #[validate(length(min = 1, max = 10))]
    pub unit: String,
}

impl From<IngredientPayload> for IngredientInput {
    fn from(payload: IngredientPayload) -> Self {
        Self {
            name: payload.name.trim().to_owned(),
            quantity: payload.quantity,
            unit: payload.unit.trim().to_owned(),
        }
    }
}

/// Recipe creation payload
///
/// Any client-supplied author is ignored; the subject becomes the author.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RecipePayload {
    #[validate(length(min = 1, max = 100))]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[validate(length(min = 1, max = 20))]
    pub cook_time: String,
    pub difficulty: String,
    #[serde(alias = "category")]
    pub category_id: i64,
    #[serde(default)]
    #[validate(nested)]
    pub ingredients: Vec<IngredientPayload>,
}

impl RecipePayload {
    fn into_new_recipe(self) -> AppResult<NewRecipe> {
        Ok(NewRecipe {
            title: self.title,
            description: self.description,
            cook_time: self.cook_time,
            difficulty: Difficulty::from_str(&self.difficulty)?,
            category_id: self.category_id,
            ingredients: self.ingredients.into_iter().map(Into::into).collect(),
        })
    }
}

/// Partial recipe update; `ingredients: []` clears every association
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct RecipeUpdatePayload {
    #[validate(length(min = 1, max = 100))]
    pub title: Option<String>,
    pub description: Option<String>,
    #[validate(length(min = 1, max = 20))]
    pub cook_time: Option<String>,
    pub difficulty: Option<String>,
    #[serde(alias = "category")]
    pub category_id: Option<i64>,
    #[validate(nested)]
    pub ingredients: Option<Vec<IngredientPayload>>,
}

impl RecipeUpdatePayload {
    fn into_changes(self) -> AppResult<RecipeChanges> {
        Ok(RecipeChanges {
            title: self.title,
            description: self.description,
            cook_time: self.cook_time,
            difficulty: self
                .difficulty
                .as_deref()
                .map(Difficulty::from_str)
                .transpose()?,
            category_id: self.category_id,
            ingredients: self
                .ingredients
                .map(|list| list.into_iter().map(Into::into).collect()),
        })
    }
}

/// Image attachment payload holding an opaque image reference
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ImagePayload {
    #[validate(length(min = 1, max = 255))]
    pub image: String,
}

/// Category creation payload
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CategoryPayload {
    #[validate(length(min = 1, max = 50))]
    pub name: String,
}

/// Create a recipe authored by the subject
///
/// # Errors
///
/// Returns `InvalidInput` for a bad payload and `ResourceNotFound` when the
/// category does not exist
#[tracing::instrument(skip(database, payload), fields(user_id = subject.user_id))]
pub async fn create_recipe(
    database: &Database,
    subject: &Subject,
    payload: RecipePayload,
) -> AppResult<RecipeDetail> {
    validate_input(&payload)?;
    let recipe = payload.into_new_recipe()?;

    let created = database.create_recipe(subject.user_id, &recipe).await?;
    info!(recipe_id = created.id, "Recipe created");
    get_recipe(database, created.id).await
}

/// Full recipe with ingredients, images, and live counts
///
/// # Errors
///
/// Returns `ResourceNotFound` when the recipe does not exist
pub async fn get_recipe(database: &Database, recipe_id: i64) -> AppResult<RecipeDetail> {
    database
        .get_recipe_detail(recipe_id)
        .await?
        .ok_or_else(|| AppError::not_found("Recipe").with_resource_id(recipe_id.to_string()))
}

/// Partially update the subject's recipe
///
/// # Errors
///
/// Returns `ResourceNotFound` for a missing recipe or category and
/// `PermissionDenied` when the subject is not the author
#[tracing::instrument(skip(database, payload), fields(user_id = subject.user_id))]
pub async fn update_recipe(
    database: &Database,
    subject: &Subject,
    recipe_id: i64,
    payload: RecipeUpdatePayload,
) -> AppResult<RecipeDetail> {
    validate_input(&payload)?;
    let changes = payload.into_changes()?;

    let recipe = owned_recipe(database, subject, Action::Update, recipe_id).await?;
    database.update_recipe(recipe.id, &changes).await?;
    info!(recipe_id, "Recipe updated");
    get_recipe(database, recipe_id).await
}

/// Delete the subject's recipe and everything hanging off it
///
/// # Errors
///
/// Returns `ResourceNotFound` for a missing recipe and `PermissionDenied`
/// when the subject is not the author
#[tracing::instrument(skip(database), fields(user_id = subject.user_id))]
pub async fn delete_recipe(database: &Database, subject: &Subject, recipe_id: i64) -> AppResult<()> {
    owned_recipe(database, subject, Action::Delete, recipe_id).await?;
    if !database.delete_recipe(recipe_id).await? {
        return Err(AppError::not_found("Recipe").with_resource_id(recipe_id.to_string()));
    }
    info!(recipe_id, "Recipe deleted");
    Ok(())
}

/// Paginated, filtered recipe listing
///
/// # Errors
///
/// Returns `FilterConflict` or `InvalidInput` for bad filters and
/// `ResourceNotFound` for a page past the end
pub async fn list_recipes(
    database: &Database,
    filter: &RecipeFilter,
    subject: Option<&Subject>,
    page: PageRequest,
) -> AppResult<Page<RecipeSummary>> {
    filter.ensure_valid()?;
    let (recipes, total) = database.list_recipes(filter, subject, page).await?;
    page.ensure_in_range(total)?;
    Ok(Page::new(recipes, total, page))
}

/// Attach an image reference to the subject's recipe
///
/// # Errors
///
/// Returns `ResourceNotFound` for a missing recipe and `PermissionDenied`
/// when the subject is not the author
#[tracing::instrument(skip(database, payload), fields(user_id = subject.user_id))]
pub async fn attach_image(
    database: &Database,
    subject: &Subject,
    recipe_id: i64,
    payload: ImagePayload,
) -> AppResult<RecipeImage> {
    validate_input(&payload)?;
    owned_recipe(database, subject, Action::Update, recipe_id).await?;
    database.add_recipe_image(recipe_id, payload.image.trim()).await
}

/// Remove an image from the subject's recipe
///
/// # Errors
///
/// Returns `ResourceNotFound` when the recipe or image is missing, or the
/// image belongs to a different recipe, and `PermissionDenied` when the
/// subject is not the author
#[tracing::instrument(skip(database), fields(user_id = subject.user_id))]
pub async fn detach_image(
    database: &Database,
    subject: &Subject,
    recipe_id: i64,
    image_id: i64,
) -> AppResult<()> {
    owned_recipe(database, subject, Action::Update, recipe_id).await?;

    let image_missing = || AppError::not_found("Image").with_resource_id(image_id.to_string());
    let image = database
        .get_recipe_image(image_id)
        .await?
        .filter(|image| image.recipe_id == recipe_id)
        .ok_or_else(image_missing)?;

    if !database.delete_recipe_image(image.id).await? {
        return Err(image_missing());
    }
    Ok(())
}

/// Create a category
///
/// # Errors
///
/// Returns `InvalidInput` for a bad name and `ResourceAlreadyExists` when
/// the name is taken
#[tracing::instrument(skip(database, payload), fields(user_id = subject.user_id))]
pub async fn create_category(
    database: &Database,
    subject: &Subject,
    payload: CategoryPayload,
) -> AppResult<Category> {
    validate_input(&payload)?;
    let name = payload.name.trim();
    if name.is_empty() {
        return Err(AppError::invalid_input("Category name must not be blank"));
    }
    database.create_category(name).await
}

/// Every category, ordered by id
///
/// # Errors
///
/// Returns an error if the database query fails
pub async fn list_categories(database: &Database) -> AppResult<Vec<Category>> {
    database.list_categories().await
}

/// Load a recipe and check the subject may mutate it
async fn owned_recipe(
    database: &Database,
    subject: &Subject,
    action: Action,
    recipe_id: i64,
) -> AppResult<Recipe> {
    let recipe = database
        .get_recipe(recipe_id)
        .await?
        .ok_or_else(|| AppError::not_found("Recipe").with_resource_id(recipe_id.to_string()))?;
    authorize(subject, action, &recipe)?;
    Ok(recipe)
}
