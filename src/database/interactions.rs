// ABOUTME: Interaction ledger database operations for likes, saves, and follows
// ABOUTME: The (owner, target) unique index decides duplicates, including concurrent ones
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use super::errors::{database_error, is_foreign_key_violation, is_unique_violation};
use super::users::USER_SUMMARY_SELECT;
use super::Database;
use crate::errors::{AppError, AppResult};
use crate::models::{InteractionKind, LedgerEntry, UserSummary};
use crate::pagination::PageRequest;

impl Database {
    /// Insert a ledger row
    ///
    /// # Errors
    ///
    /// Returns `ResourceAlreadyExists` with the kind's message when the pair
    /// exists and `ResourceNotFound` when the target is missing
    pub async fn create_ledger_entry(
        &self,
        kind: InteractionKind,
        owner_id: i64,
        target_id: i64,
    ) -> AppResult<LedgerEntry> {
        let created_at = Utc::now();
        let query = format!(
            "INSERT INTO {table} ({owner}, {target}, {timestamp}) VALUES ($1, $2, $3)",
            table = kind.table(),
            owner = kind.owner_column(),
            target = kind.target_column(),
            timestamp = kind.timestamp_column(),
        );

        let result = sqlx::query(&query)
            .bind(owner_id)
            .bind(target_id)
            .bind(created_at)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    AppError::already_exists(kind.duplicate_message()).with_user_id(owner_id)
                } else if is_foreign_key_violation(&e) {
                    AppError::not_found(kind.target_name()).with_resource_id(target_id.to_string())
                } else {
                    database_error("create ledger entry")(e)
                }
            })?;

        Ok(LedgerEntry {
            kind,
            id: result.last_insert_rowid(),
            owner_id,
            target_id,
            created_at,
        })
    }

    /// Get a ledger row by ID
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_ledger_entry(
        &self,
        kind: InteractionKind,
        entry_id: i64,
    ) -> AppResult<Option<LedgerEntry>> {
        let query = format!("{} WHERE id = $1", Self::ledger_select(kind));
        let row = sqlx::query(&query)
            .bind(entry_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(database_error("get ledger entry"))?;

        Ok(row.map(|r| Self::row_to_ledger_entry(kind, &r)))
    }

    /// Delete a ledger row by ID
    ///
    /// # Errors
    ///
    /// Returns an error if the database delete fails
    pub async fn delete_ledger_entry(&self, kind: InteractionKind, entry_id: i64) -> AppResult<bool> {
        let query = format!("DELETE FROM {} WHERE id = $1", kind.table());
        let result = sqlx::query(&query)
            .bind(entry_id)
            .execute(&self.pool)
            .await
            .map_err(database_error("delete ledger entry"))?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete the owner's row for a target
    ///
    /// # Errors
    ///
    /// Returns an error if the database delete fails
    pub async fn delete_ledger_entry_for_target(
        &self,
        kind: InteractionKind,
        owner_id: i64,
        target_id: i64,
    ) -> AppResult<bool> {
        let query = format!(
            "DELETE FROM {} WHERE {} = $1 AND {} = $2",
            kind.table(),
            kind.owner_column(),
            kind.target_column()
        );
        let result = sqlx::query(&query)
            .bind(owner_id)
            .bind(target_id)
            .execute(&self.pool)
            .await
            .map_err(database_error("delete ledger entry"))?;
        Ok(result.rows_affected() > 0)
    }

    /// List an owner's ledger rows, ordered by id
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn list_ledger_entries(
        &self,
        kind: InteractionKind,
        owner_id: i64,
        page: PageRequest,
    ) -> AppResult<(Vec<LedgerEntry>, i64)> {
        let total = self.count_for_owner(kind, owner_id).await?;

        let query = format!(
            "{} WHERE {} = $1 ORDER BY id LIMIT $2 OFFSET $3",
            Self::ledger_select(kind),
            kind.owner_column()
        );
        let rows = sqlx::query(&query)
            .bind(owner_id)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await
            .map_err(database_error("list ledger entries"))?;

        let entries = rows
            .iter()
            .map(|r| Self::row_to_ledger_entry(kind, r))
            .collect();
        Ok((entries, total))
    }

    /// Count rows pointing at a target (likes or saves of a recipe, followers of a user)
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn count_for_target(&self, kind: InteractionKind, target_id: i64) -> AppResult<i64> {
        let query = format!(
            "SELECT COUNT(*) FROM {} WHERE {} = $1",
            kind.table(),
            kind.target_column()
        );
        sqlx::query_scalar(&query)
            .bind(target_id)
            .fetch_one(&self.pool)
            .await
            .map_err(database_error("count ledger entries"))
    }

    /// Count rows owned by a user (likes, saves, or followees)
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn count_for_owner(&self, kind: InteractionKind, owner_id: i64) -> AppResult<i64> {
        let query = format!(
            "SELECT COUNT(*) FROM {} WHERE {} = $1",
            kind.table(),
            kind.owner_column()
        );
        sqlx::query_scalar(&query)
            .bind(owner_id)
            .fetch_one(&self.pool)
            .await
            .map_err(database_error("count ledger entries"))
    }

    /// Users following `user_id`, ordered by follow time
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn list_followers(
        &self,
        user_id: i64,
        page: PageRequest,
    ) -> AppResult<(Vec<UserSummary>, i64)> {
        let total = self.count_for_target(InteractionKind::Follow, user_id).await?;
        let query = format!(
            "{USER_SUMMARY_SELECT} JOIN follows fl ON fl.follower_id = u.id \
             WHERE fl.followed_id = $1 ORDER BY fl.id LIMIT $2 OFFSET $3"
        );
        let users = self.fetch_user_page(&query, user_id, page).await?;
        Ok((users, total))
    }

    /// Users followed by `user_id`, ordered by follow time
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn list_following(
        &self,
        user_id: i64,
        page: PageRequest,
    ) -> AppResult<(Vec<UserSummary>, i64)> {
        let total = self.count_for_owner(InteractionKind::Follow, user_id).await?;
        let query = format!(
            "{USER_SUMMARY_SELECT} JOIN follows fl ON fl.followed_id = u.id \
             WHERE fl.follower_id = $1 ORDER BY fl.id LIMIT $2 OFFSET $3"
        );
        let users = self.fetch_user_page(&query, user_id, page).await?;
        Ok((users, total))
    }

    async fn fetch_user_page(
        &self,
        query: &str,
        user_id: i64,
        page: PageRequest,
    ) -> AppResult<Vec<UserSummary>> {
        let rows = sqlx::query(query)
            .bind(user_id)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await
            .map_err(database_error("list related users"))?;
        Ok(rows.iter().map(Self::row_to_user_summary).collect())
    }

    fn ledger_select(kind: InteractionKind) -> String {
        format!(
            "SELECT id, {} AS owner_id, {} AS target_id, {} AS created_at FROM {}",
            kind.owner_column(),
            kind.target_column(),
            kind.timestamp_column(),
            kind.table()
        )
    }

    fn row_to_ledger_entry(kind: InteractionKind, row: &SqliteRow) -> LedgerEntry {
        LedgerEntry {
            kind,
            id: row.get("id"),
            owner_id: row.get("owner_id"),
            target_id: row.get("target_id"),
            created_at: row.get("created_at"),
        }
    }
}
