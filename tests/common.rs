// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: In-memory database, server resources, router, and user/recipe factories
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate
)]
//! Shared test utilities for `cooks_corner`

use std::collections::HashMap;
use std::sync::{Arc, Once};

use anyhow::Result;
use axum::Router;
use cooks_corner::{
    auth::TokenType,
    config::environment::ServerConfig,
    database::Database,
    logging::LoggingConfig,
    models::{Category, Difficulty, IngredientInput, NewRecipe, NewUser, Recipe, User},
    resources::ServerResources,
    routes,
};

static INIT_LOGGER: Once = Once::new();

/// Password every factory-made user shares
pub const TEST_PASSWORD: &str = "correct-horse-battery";

/// Cheap bcrypt cost for factory users; login accepts any cost
const TEST_BCRYPT_COST: u32 = 4;

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        // Another harness may already own the global subscriber
        let _ = LoggingConfig::for_tests().init();
    });
}

/// Configuration with a fixed secret and an in-memory database
pub fn test_config() -> ServerConfig {
    test_config_with(&[])
}

/// Test configuration with extra variable overrides
pub fn test_config_with(overrides: &[(&str, &str)]) -> ServerConfig {
    let mut vars: HashMap<String, String> = HashMap::from([
        ("ENVIRONMENT".to_owned(), "testing".to_owned()),
        ("DATABASE_URL".to_owned(), "sqlite::memory:".to_owned()),
        (
            "JWT_SECRET".to_owned(),
            "integration-test-secret-that-is-long-enough".to_owned(),
        ),
    ]);
    for (key, value) in overrides {
        vars.insert((*key).to_owned(), (*value).to_owned());
    }
    ServerConfig::from_lookup(|key| vars.get(key).cloned()).expect("valid test configuration")
}

/// Standard test database setup
pub async fn create_test_database() -> Result<Database> {
    init_test_logging();
    Ok(Database::new(&test_config().database_url).await?)
}

/// Server resources over a fresh in-memory database
pub async fn create_test_resources() -> Result<Arc<ServerResources>> {
    create_test_resources_with(test_config()).await
}

/// Server resources with a custom configuration
pub async fn create_test_resources_with(config: ServerConfig) -> Result<Arc<ServerResources>> {
    init_test_logging();
    let database = Database::new(&config.database_url).await?;
    Ok(Arc::new(ServerResources::new(database, config)))
}

/// Full application router over the given resources
pub fn test_router(resources: &Arc<ServerResources>) -> Router {
    routes::build_router(Arc::clone(resources))
}

/// Insert a user directly, bypassing the registration endpoint
pub async fn create_test_user(database: &Database, username: &str) -> Result<User> {
    let password_hash = bcrypt::hash(TEST_PASSWORD, TEST_BCRYPT_COST)?;
    Ok(database
        .create_user(&NewUser {
            email: format!("{username}@example.com"),
            username: username.to_owned(),
            password_hash,
            photo: None,
            bio: None,
        })
        .await?)
}

/// Insert a user and mint an access token for them
pub async fn create_authenticated_user(
    resources: &ServerResources,
    username: &str,
) -> Result<(User, String)> {
    let user = create_test_user(&resources.database, username).await?;
    let token = resources
        .auth_manager
        .generate_token(user.id, TokenType::Access)?;
    Ok((user, token))
}

/// Create a category with the given name
pub async fn create_test_category(database: &Database, name: &str) -> Result<Category> {
    Ok(database.create_category(name).await?)
}

/// Create a recipe with two ingredients
pub async fn create_test_recipe(
    database: &Database,
    author_id: i64,
    category_id: i64,
    title: &str,
) -> Result<Recipe> {
    let recipe = NewRecipe {
        title: title.to_owned(),
        description: format!("How to make {title}"),
        cook_time: "30 min".to_owned(),
        difficulty: Difficulty::Easy,
        category_id,
        ingredients: vec![
            IngredientInput {
                name: "Flour".to_owned(),
                quantity: 200,
                unit: "g".to_owned(),
            },
            IngredientInput {
                name: "Milk".to_owned(),
                quantity: 300,
                unit: "ml".to_owned(),
            },
        ],
    };
    Ok(database.create_recipe(author_id, &recipe).await?)
}
