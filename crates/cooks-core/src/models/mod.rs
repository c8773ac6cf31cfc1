// ABOUTME: Core data models for users, recipes, and the interaction ledger
// ABOUTME: Re-exports all model types from focused submodules
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Recipes, categories, ingredients, and images
pub mod recipe;

/// Likes, saves, and follows
pub mod interaction;

/// User accounts and profile summaries
pub mod user;

pub use interaction::{Follow, InteractionKind, LedgerEntry, LikedRecipe, SavedRecipe};
pub use recipe::{
    Category, Difficulty, Ingredient, IngredientInput, NewRecipe, Recipe, RecipeChanges,
    RecipeDetail, RecipeImage, RecipeSummary,
};
pub use user::{NewUser, ProfileChanges, User, UserSummary};
