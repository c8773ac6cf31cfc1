// ABOUTME: Recipe content models: recipes, categories, ingredients, and images
// ABOUTME: Includes the difficulty enum and the create/update inputs used by the content store
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::permissions::Owned;

/// How hard a recipe is to cook
#[non_exhaustive]
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Difficulty {
    /// Beginner friendly
    Easy,
    /// Some experience needed
    Medium,
    /// Demanding
    Hard,
}

impl Difficulty {
    /// Database string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Easy => "Easy",
            Self::Medium => "Medium",
            Self::Hard => "Hard",
        }
    }
}

impl Display for Difficulty {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Easy" => Ok(Self::Easy),
            "Medium" => Ok(Self::Medium),
            "Hard" => Ok(Self::Hard),
            _ => Err(AppError::invalid_input(format!("Invalid difficulty: {s}"))),
        }
    }
}

/// Named recipe tag
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Category {
    /// Unique identifier
    pub id: i64,
    /// Unique name
    pub name: String,
}

/// Stored ingredient row, shared between recipes with the same tuple
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Ingredient {
    /// Unique identifier
    pub id: i64,
    /// Ingredient name
    pub name: String,
    /// Amount in `unit`
    pub quantity: i64,
    /// Unit label such as "g" or "pcs"
    pub unit: String,
}

/// Ingredient as supplied on recipe create/update
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngredientInput {
    /// Ingredient name
    pub name: String,
    /// Non-negative amount
    pub quantity: i64,
    /// Unit label
    pub unit: String,
}

/// Stored recipe scalar fields
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipe {
    /// Unique identifier
    pub id: i64,
    /// Title
    pub title: String,
    /// Preparation description
    pub description: String,
    /// Free-form cook time such as "45 min"
    pub cook_time: String,
    /// Difficulty level
    pub difficulty: Difficulty,
    /// Authoring user; immutable after creation
    pub author_id: i64,
    /// Category
    pub category_id: i64,
    /// When the recipe was published
    pub created_at: DateTime<Utc>,
}

impl Owned for Recipe {
    fn owner_id(&self) -> i64 {
        self.author_id
    }

    fn resource_name(&self) -> &'static str {
        "recipe"
    }
}

/// Data required to insert a recipe; the author comes from the subject
#[derive(Debug, Clone)]
pub struct NewRecipe {
    /// Title
    pub title: String,
    /// Description
    pub description: String,
    /// Cook time
    pub cook_time: String,
    /// Difficulty
    pub difficulty: Difficulty,
    /// Category
    pub category_id: i64,
    /// Ordered ingredient list
    pub ingredients: Vec<IngredientInput>,
}

/// Partial recipe update
///
/// Scalar fields left as `None` keep their value. `ingredients` replaces the
/// whole association set when present, including `Some(vec![])`.
#[derive(Debug, Clone, Default)]
pub struct RecipeChanges {
    /// New title
    pub title: Option<String>,
    /// New description
    pub description: Option<String>,
    /// New cook time
    pub cook_time: Option<String>,
    /// New difficulty
    pub difficulty: Option<Difficulty>,
    /// New category
    pub category_id: Option<i64>,
    /// Replacement ingredient list
    pub ingredients: Option<Vec<IngredientInput>>,
}

/// Image attached to a recipe
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecipeImage {
    /// Unique identifier
    pub id: i64,
    /// Owning recipe
    pub recipe_id: i64,
    /// Opaque storage reference (path or object key)
    pub image: String,
    /// Upload time
    pub created_at: DateTime<Utc>,
}

/// Recipe with everything needed for a detail view
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeDetail {
    /// Scalar fields
    pub recipe: Recipe,
    /// Author handle
    pub author_username: String,
    /// Category name
    pub category_name: String,
    /// Ingredients in recipe order
    pub ingredients: Vec<Ingredient>,
    /// Attached images
    pub images: Vec<RecipeImage>,
    /// Live like count
    pub likes_count: i64,
    /// Live save count
    pub saves_count: i64,
}

/// Row of a recipe listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeSummary {
    /// Unique identifier
    pub id: i64,
    /// Title
    pub title: String,
    /// Cook time
    pub cook_time: String,
    /// Difficulty
    pub difficulty: Difficulty,
    /// Author
    pub author_id: i64,
    /// Author handle
    pub author_username: String,
    /// Category
    pub category_id: i64,
    /// Category name
    pub category_name: String,
    /// First attached image, if any
    pub image: Option<String>,
    /// Live like count
    pub likes_count: i64,
    /// Live save count
    pub saves_count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_difficulty_round_trip() {
        for difficulty in [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard] {
            assert_eq!(difficulty.as_str().parse::<Difficulty>().unwrap(), difficulty);
        }
        assert!("Impossible".parse::<Difficulty>().is_err());
    }

    #[test]
    fn test_difficulty_serializes_capitalized() {
        let json = serde_json::to_string(&Difficulty::Medium).unwrap();
        assert_eq!(json, "\"Medium\"");
    }
}
