// ABOUTME: Refresh token revocation storage
// ABOUTME: Records revoked token ids at logout and answers revocation checks on refresh
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Utc};

use super::errors::database_error;
use super::Database;
use crate::errors::AppResult;

impl Database {
    /// Record a refresh token id as revoked
    ///
    /// Revoking an id twice is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails
    pub async fn revoke_token(
        &self,
        jti: &str,
        user_id: i64,
        expires_at: DateTime<Utc>,
    ) -> AppResult<()> {
        sqlx::query(
            r"
            INSERT INTO revoked_tokens (jti, user_id, expires_at, revoked_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (jti) DO NOTHING
            ",
        )
        .bind(jti)
        .bind(user_id)
        .bind(expires_at)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(database_error("revoke token"))?;

        Ok(())
    }

    /// Check whether a token id has been revoked
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn is_token_revoked(&self, jti: &str) -> AppResult<bool> {
        let revoked: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM revoked_tokens WHERE jti = $1)")
                .bind(jti)
                .fetch_one(&self.pool)
                .await
                .map_err(database_error("check token revocation"))?;
        Ok(revoked)
    }

    /// Drop revocation records whose tokens have expired anyway
    ///
    /// # Errors
    ///
    /// Returns an error if the database delete fails
    pub async fn purge_expired_revocations(&self, now: DateTime<Utc>) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM revoked_tokens WHERE expires_at < $1")
            .bind(now)
            .execute(&self.pool)
            .await
            .map_err(database_error("purge expired revocations"))?;
        Ok(result.rows_affected())
    }
}
