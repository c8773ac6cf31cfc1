// ABOUTME: User account database operations
// ABOUTME: Registration inserts, lookups, partial profile updates, and summaries with live counts
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::{Error as SqlxError, QueryBuilder, Row, Sqlite};

use super::errors::{database_error, is_unique_violation, violates_unique_column};
use super::Database;
use crate::constants::messages;
use crate::errors::{AppError, AppResult};
use crate::filters::{fold_case, UserFilter};
use crate::models::{NewUser, ProfileChanges, User, UserSummary};
use crate::pagination::PageRequest;

/// Summary projection shared by profile reads and user listings
pub(super) const USER_SUMMARY_SELECT: &str = r"
    SELECT u.id, u.email, u.username, u.photo, u.bio,
           (SELECT COUNT(*) FROM follows f WHERE f.followed_id = u.id) AS followers_count,
           (SELECT COUNT(*) FROM follows f WHERE f.follower_id = u.id) AS following_count,
           (SELECT COUNT(*) FROM recipes r WHERE r.author_id = u.id) AS recipes_count
    FROM users u
";

impl Database {
    /// Insert a new user
    ///
    /// # Errors
    ///
    /// Returns `ResourceAlreadyExists` if the email or username is taken
    pub async fn create_user(&self, user: &NewUser) -> AppResult<User> {
        let created_at = Utc::now();
        let result = sqlx::query(
            r"
            INSERT INTO users (email, username, username_folded, password_hash, photo, bio, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ",
        )
        .bind(&user.email)
        .bind(&user.username)
        .bind(fold_case(&user.username))
        .bind(&user.password_hash)
        .bind(&user.photo)
        .bind(&user.bio)
        .bind(created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| Self::translate_user_conflict(e, "create user"))?;

        Ok(User {
            id: result.last_insert_rowid(),
            email: user.email.clone(),
            username: user.username.clone(),
            password_hash: user.password_hash.clone(),
            photo: user.photo.clone(),
            bio: user.bio.clone(),
            created_at,
        })
    }

    /// Get a user by ID
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_user(&self, user_id: i64) -> AppResult<Option<User>> {
        let row = sqlx::query(
            "SELECT id, email, username, password_hash, photo, bio, created_at FROM users WHERE id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(database_error("get user"))?;

        Ok(row.map(|r| Self::row_to_user(&r)))
    }

    /// Get a user by email address
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let row = sqlx::query(
            "SELECT id, email, username, password_hash, photo, bio, created_at FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(database_error("get user by email"))?;

        Ok(row.map(|r| Self::row_to_user(&r)))
    }

    /// Check whether a user exists
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn user_exists(&self, user_id: i64) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
            .map_err(database_error("check user"))?;
        Ok(exists)
    }

    /// Apply a partial profile update; omitted fields keep their values
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` if the user is missing and
    /// `ResourceAlreadyExists` if the new username is taken
    pub async fn update_profile(&self, user_id: i64, changes: &ProfileChanges) -> AppResult<User> {
        let result = sqlx::query(
            r"
            UPDATE users SET
                username = COALESCE($2, username),
                photo = COALESCE($3, photo),
                bio = COALESCE($4, bio),
                username_folded = COALESCE($5, username_folded)
            WHERE id = $1
            ",
        )
        .bind(user_id)
        .bind(&changes.username)
        .bind(&changes.photo)
        .bind(&changes.bio)
        .bind(changes.username.as_deref().map(fold_case))
        .execute(&self.pool)
        .await
        .map_err(|e| Self::translate_user_conflict(e, "update profile"))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("User").with_resource_id(user_id.to_string()));
        }

        self.get_user(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User").with_resource_id(user_id.to_string()))
    }

    /// Get the public summary of a user with live counts
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_user_summary(&self, user_id: i64) -> AppResult<Option<UserSummary>> {
        let query = format!("{USER_SUMMARY_SELECT} WHERE u.id = $1");
        let row = sqlx::query(&query)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(database_error("get user summary"))?;

        Ok(row.map(|r| Self::row_to_user_summary(&r)))
    }

    /// List users matching a filter, ordered by id
    ///
    /// Returns the page of summaries and the total match count.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn list_users(
        &self,
        filter: &UserFilter,
        page: PageRequest,
    ) -> AppResult<(Vec<UserSummary>, i64)> {
        let mut count_query = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM users u WHERE 1 = 1");
        filter.push_predicates(&mut count_query);
        let total: i64 = count_query
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(database_error("count users"))?;

        let mut list_query = QueryBuilder::<Sqlite>::new(USER_SUMMARY_SELECT);
        list_query.push(" WHERE 1 = 1");
        filter.push_predicates(&mut list_query);
        list_query
            .push(" ORDER BY u.id LIMIT ")
            .push_bind(page.limit())
            .push(" OFFSET ")
            .push_bind(page.offset());

        let rows = list_query
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(database_error("list users"))?;

        Ok((rows.iter().map(Self::row_to_user_summary).collect(), total))
    }

    /// Map email/username collisions to their resource-specific messages
    fn translate_user_conflict(error: SqlxError, action: &'static str) -> AppError {
        if violates_unique_column(&error, "users.email") {
            AppError::already_exists(messages::EMAIL_TAKEN)
        } else if violates_unique_column(&error, "users.username") {
            AppError::already_exists(messages::USERNAME_TAKEN)
        } else if is_unique_violation(&error) {
            AppError::already_exists("A user with these details already exists.")
        } else {
            database_error(action)(error)
        }
    }

    pub(super) fn row_to_user(row: &SqliteRow) -> User {
        User {
            id: row.get("id"),
            email: row.get("email"),
            username: row.get("username"),
            password_hash: row.get("password_hash"),
            photo: row.get("photo"),
            bio: row.get("bio"),
            created_at: row.get("created_at"),
        }
    }

    pub(super) fn row_to_user_summary(row: &SqliteRow) -> UserSummary {
        UserSummary {
            id: row.get("id"),
            email: row.get("email"),
            username: row.get("username"),
            photo: row.get("photo"),
            bio: row.get("bio"),
            followers_count: row.get("followers_count"),
            following_count: row.get("following_count"),
            recipes_count: row.get("recipes_count"),
        }
    }
}
