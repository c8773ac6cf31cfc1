// ABOUTME: SQLite database management for users, recipes, and the interaction ledger
// ABOUTME: Owns the connection pool and creates the schema with its unique and cascade rules
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Database Management
//!
//! Operations are split by area, each file adding an `impl Database` block:
//!
//! - `users`: accounts, profiles, and profile summaries with live counts
//! - `tokens`: revoked refresh token ids
//! - `categories`: recipe categories
//! - `recipes`: recipes, shared ingredients, and images
//! - `interactions`: likes, saves, and follows
//!
//! Uniqueness and referential integrity are enforced by the schema. Callers
//! translate constraint violations through [`errors`].

/// Constraint violation detection and error translation
pub mod errors;

mod categories;
mod interactions;
mod recipes;
mod tokens;
mod users;

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use tracing::{debug, info};

use crate::config::environment::DatabaseUrl;
use crate::errors::AppResult;
use errors::database_error;

/// Database manager for all persistent state
#[derive(Clone)]
pub struct Database {
    pool: Pool<Sqlite>,
}

impl Database {
    /// Connect to the database and create the schema
    ///
    /// In-memory databases use a single long-lived connection so every query
    /// sees the same data.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection or schema creation fails
    pub async fn new(url: &DatabaseUrl) -> AppResult<Self> {
        let connection_string = url.to_connection_string();
        let options = SqliteConnectOptions::from_str(&connection_string)
            .map_err(database_error("parse database URL"))?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool_options = if url.is_memory() {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(8)
        };

        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(database_error("connect to database"))?;

        info!(database = %url, "Database connection established");

        let db = Self { pool };
        db.migrate().await?;
        Ok(db)
    }

    /// Get a reference to the database pool for advanced operations
    #[must_use]
    pub const fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    /// Create all tables and indexes
    ///
    /// # Errors
    ///
    /// Returns an error if any DDL statement fails
    pub async fn migrate(&self) -> AppResult<()> {
        for statement in SCHEMA {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(database_error("create schema"))?;
        }
        debug!(statements = SCHEMA.len(), "Database schema ready");
        Ok(())
    }
}

/// Schema statements, applied in order
const SCHEMA: &[&str] = &[
    r"
    CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        email TEXT NOT NULL UNIQUE,
        username TEXT NOT NULL UNIQUE,
        username_folded TEXT NOT NULL,
        password_hash TEXT NOT NULL,
        photo TEXT,
        bio TEXT,
        created_at TEXT NOT NULL
    )
    ",
    r"
    CREATE TABLE IF NOT EXISTS revoked_tokens (
        jti TEXT PRIMARY KEY,
        user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        expires_at TEXT NOT NULL,
        revoked_at TEXT NOT NULL
    )
    ",
    r"
    CREATE TABLE IF NOT EXISTS categories (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE,
        name_folded TEXT NOT NULL
    )
    ",
    r"
    CREATE TABLE IF NOT EXISTS recipes (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT NOT NULL,
        title_folded TEXT NOT NULL,
        description TEXT NOT NULL,
        cook_time TEXT NOT NULL,
        difficulty TEXT NOT NULL CHECK (difficulty IN ('Easy', 'Medium', 'Hard')),
        author_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        category_id INTEGER NOT NULL REFERENCES categories(id) ON DELETE RESTRICT,
        created_at TEXT NOT NULL
    )
    ",
    "CREATE INDEX IF NOT EXISTS idx_recipes_author ON recipes(author_id)",
    "CREATE INDEX IF NOT EXISTS idx_recipes_category ON recipes(category_id)",
    r"
    CREATE TABLE IF NOT EXISTS ingredients (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        quantity INTEGER NOT NULL CHECK (quantity >= 0),
        unit TEXT NOT NULL
    )
    ",
    "CREATE INDEX IF NOT EXISTS idx_ingredients_tuple ON ingredients(name, quantity, unit)",
    r"
    CREATE TABLE IF NOT EXISTS recipe_ingredients (
        recipe_id INTEGER NOT NULL REFERENCES recipes(id) ON DELETE CASCADE,
        ingredient_id INTEGER NOT NULL REFERENCES ingredients(id) ON DELETE CASCADE,
        position INTEGER NOT NULL,
        PRIMARY KEY (recipe_id, position)
    )
    ",
    r"
    CREATE TABLE IF NOT EXISTS recipe_images (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        recipe_id INTEGER NOT NULL REFERENCES recipes(id) ON DELETE CASCADE,
        image TEXT NOT NULL,
        created_at TEXT NOT NULL
    )
    ",
    "CREATE INDEX IF NOT EXISTS idx_recipe_images_recipe ON recipe_images(recipe_id)",
    r"
    CREATE TABLE IF NOT EXISTS liked_recipes (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        recipe_id INTEGER NOT NULL REFERENCES recipes(id) ON DELETE CASCADE,
        liked_on TEXT NOT NULL,
        UNIQUE (user_id, recipe_id)
    )
    ",
    "CREATE INDEX IF NOT EXISTS idx_liked_recipes_recipe ON liked_recipes(recipe_id)",
    r"
    CREATE TABLE IF NOT EXISTS saved_recipes (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        recipe_id INTEGER NOT NULL REFERENCES recipes(id) ON DELETE CASCADE,
        saved_on TEXT NOT NULL,
        UNIQUE (user_id, recipe_id)
    )
    ",
    "CREATE INDEX IF NOT EXISTS idx_saved_recipes_recipe ON saved_recipes(recipe_id)",
    r"
    CREATE TABLE IF NOT EXISTS follows (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        follower_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        followed_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        followed_on TEXT NOT NULL,
        UNIQUE (follower_id, followed_id),
        CHECK (follower_id <> followed_id)
    )
    ",
    "CREATE INDEX IF NOT EXISTS idx_follows_followed ON follows(followed_id)",
];
