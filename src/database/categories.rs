// ABOUTME: Recipe category database operations
// ABOUTME: Unique-name inserts, lookups, and the open category listing
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use sqlx::Row;

use super::errors::{database_error, is_unique_violation};
use super::Database;
use crate::constants::messages;
use crate::errors::{AppError, AppResult};
use crate::filters::fold_case;
use crate::models::Category;

impl Database {
    /// Create a category
    ///
    /// # Errors
    ///
    /// Returns `ResourceAlreadyExists` if the name is taken
    pub async fn create_category(&self, name: &str) -> AppResult<Category> {
        let result = sqlx::query("INSERT INTO categories (name, name_folded) VALUES ($1, $2)")
            .bind(name)
            .bind(fold_case(name))
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    AppError::already_exists(messages::CATEGORY_TAKEN)
                } else {
                    database_error("create category")(e)
                }
            })?;

        Ok(Category {
            id: result.last_insert_rowid(),
            name: name.to_owned(),
        })
    }

    /// Get a category by ID
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_category(&self, category_id: i64) -> AppResult<Option<Category>> {
        let row = sqlx::query("SELECT id, name FROM categories WHERE id = $1")
            .bind(category_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(database_error("get category"))?;

        Ok(row.map(|r| Category {
            id: r.get("id"),
            name: r.get("name"),
        }))
    }

    /// List all categories ordered by id
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn list_categories(&self) -> AppResult<Vec<Category>> {
        let rows = sqlx::query("SELECT id, name FROM categories ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(database_error("list categories"))?;

        Ok(rows
            .iter()
            .map(|r| Category {
                id: r.get("id"),
                name: r.get("name"),
            })
            .collect())
    }
}
