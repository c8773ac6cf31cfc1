// ABOUTME: Translation of sqlx errors into application errors at the storage boundary
// ABOUTME: Detects unique and foreign key violations so callers can map them to 400/404
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use sqlx::Error as SqlxError;

use crate::errors::AppError;

/// Whether the error is a unique constraint violation
#[must_use]
pub fn is_unique_violation(error: &SqlxError) -> bool {
    error
        .as_database_error()
        .is_some_and(|db_err| db_err.is_unique_violation())
}

/// Whether the error is a foreign key violation
#[must_use]
pub fn is_foreign_key_violation(error: &SqlxError) -> bool {
    error
        .as_database_error()
        .is_some_and(|db_err| db_err.is_foreign_key_violation())
}

/// Whether a unique violation names the given `table.column`
///
/// SQLite reports the failing columns in the message, e.g.
/// `UNIQUE constraint failed: users.email`.
#[must_use]
pub fn violates_unique_column(error: &SqlxError, column: &str) -> bool {
    error
        .as_database_error()
        .is_some_and(|db_err| db_err.is_unique_violation() && db_err.message().contains(column))
}

/// Build a mapper that wraps a raw sqlx error as a database error
///
/// The message is logged server-side; clients only ever see the generic
/// description for 5xx codes.
pub fn database_error(action: &'static str) -> impl FnOnce(SqlxError) -> AppError {
    move |error| {
        tracing::error!(error = %error, "Failed to {action}");
        AppError::database(format!("Failed to {action}: {error}")).with_source(error)
    }
}
