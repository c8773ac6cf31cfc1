// ABOUTME: Listing filters for recipes and users translated into SQL predicates
// ABOUTME: Case-insensitive containment, exact id matches, and the saved-by-me restriction
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Query/Filter Layer
//!
//! Filters AND together and absent or blank filters are no-ops. Text
//! filters match case-insensitively anywhere in the value, comparing the
//! folded needle against the `*_folded` columns written alongside each
//! searchable field. SQLite's `lower()` only folds ASCII. Predicates are
//! appended to a `QueryBuilder` whose query already ends in a `WHERE`
//! clause, with every value passed as a bind parameter.

use serde::Deserialize;
use sqlx::{QueryBuilder, Sqlite};
use validator::Validate;

use crate::errors::{validate_input, AppError, AppResult};
use crate::permissions::Subject;

/// Recipe listing filters
///
/// Query aliases: `title`, `author_username`, `author_id`, `category_id`,
/// `category_name`, `saved_by_user`.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct RecipeFilter {
    /// Title contains (case-insensitive)
    #[validate(length(max = 100))]
    pub title: Option<String>,
    /// Author username contains (case-insensitive)
    #[validate(length(max = 150))]
    pub author_username: Option<String>,
    /// Exact author
    pub author_id: Option<i64>,
    /// Exact category; conflicts with `category_name`
    pub category_id: Option<i64>,
    /// Category name contains (case-insensitive); conflicts with `category_id`
    #[validate(length(max = 50))]
    pub category_name: Option<String>,
    /// Only recipes the caller has saved; ignored for anonymous callers
    pub saved_by_user: Option<bool>,
}

impl RecipeFilter {
    /// Reject invalid or conflicting filter combinations
    ///
    /// # Errors
    ///
    /// Returns `FilterConflict` when `category_id` and `category_name` are
    /// both given, and `InvalidInput` for over-long text filters
    pub fn ensure_valid(&self) -> AppResult<()> {
        if self.category_id.is_some() && non_blank(self.category_name.as_deref()).is_some() {
            return Err(AppError::filter_conflict(
                "Filter by either category_id or category_name, not both",
            ));
        }
        validate_input(self)
    }

    /// Whether the listing is restricted to the subject's saved recipes
    #[must_use]
    pub fn saved_only_for<'a>(&self, subject: Option<&'a Subject>) -> Option<&'a Subject> {
        subject.filter(|_| self.saved_by_user.unwrap_or(false))
    }

    /// Append predicates for a query over `recipes r` joined to `users u`
    /// and `categories c`
    pub fn push_predicates(&self, query: &mut QueryBuilder<'_, Sqlite>, subject: Option<&Subject>) {
        if let Some(title) = non_blank(self.title.as_deref()) {
            push_contains(query, "r.title_folded", title);
        }
        if let Some(username) = non_blank(self.author_username.as_deref()) {
            push_contains(query, "u.username_folded", username);
        }
        if let Some(author_id) = self.author_id {
            query.push(" AND r.author_id = ").push_bind(author_id);
        }
        if let Some(category_id) = self.category_id {
            query.push(" AND r.category_id = ").push_bind(category_id);
        }
        if let Some(category_name) = non_blank(self.category_name.as_deref()) {
            push_contains(query, "c.name_folded", category_name);
        }
        if let Some(subject) = self.saved_only_for(subject) {
            query
                .push(" AND EXISTS (SELECT 1 FROM saved_recipes s WHERE s.recipe_id = r.id AND s.user_id = ")
                .push_bind(subject.user_id)
                .push(")");
        }
    }
}

/// User listing filters
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UserFilter {
    /// Username contains (case-insensitive)
    #[validate(length(max = 150))]
    pub username: Option<String>,
}

impl UserFilter {
    /// Reject over-long filter values
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` when a filter value is too long
    pub fn ensure_valid(&self) -> AppResult<()> {
        validate_input(self)
    }

    /// Append predicates for a query over `users u`
    pub fn push_predicates(&self, query: &mut QueryBuilder<'_, Sqlite>) {
        if let Some(username) = non_blank(self.username.as_deref()) {
            push_contains(query, "u.username_folded", username);
        }
    }
}

/// Treat blank query values as absent
fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Case folding shared by stored search columns and filter needles
#[must_use]
pub fn fold_case(value: &str) -> String {
    value.to_lowercase()
}

/// Case-insensitive containment without LIKE wildcard semantics
fn push_contains(
    query: &mut QueryBuilder<'_, Sqlite>,
    folded_column: &'static str,
    needle: &str,
) {
    query
        .push(" AND instr(")
        .push(folded_column)
        .push(", ")
        .push_bind(fold_case(needle))
        .push(") > 0");
}
