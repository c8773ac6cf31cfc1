// ABOUTME: Interaction ledger business logic for likes, saves, and follows
// ABOUTME: Target checks, self-follow rejection, ownership on delete, and live counts
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Interaction Ledger
//!
//! Likes and saves target recipes, follows target users. The `(owner, target)`
//! unique index is the only duplicate guard: callers racing on the same pair
//! get exactly one insert and the losers see `ResourceAlreadyExists`.

use crate::database::Database;
use crate::errors::{AppError, AppResult};
use crate::logging::AppLogger;
use crate::models::{InteractionKind, LedgerEntry, UserSummary};
use crate::pagination::{Page, PageRequest};
use crate::permissions::{authorize, Action, Subject};

/// Record a like, save, or follow owned by the subject
///
/// # Errors
///
/// Returns `InvalidInput` for a self-follow, `ResourceNotFound` when the
/// target is missing, and `ResourceAlreadyExists` for a duplicate pair
#[tracing::instrument(skip(database), fields(user_id = subject.user_id, kind = %kind))]
pub async fn add(
    database: &Database,
    subject: &Subject,
    kind: InteractionKind,
    target_id: i64,
) -> AppResult<LedgerEntry> {
    if kind == InteractionKind::Follow && target_id == subject.user_id {
        return Err(AppError::invalid_input("You cannot follow yourself."));
    }
    ensure_target_exists(database, kind, target_id).await?;

    let entry = database
        .create_ledger_entry(kind, subject.user_id, target_id)
        .await?;
    AppLogger::log_ledger_event(subject.user_id, kind, target_id, true);
    Ok(entry)
}

/// Remove the subject's row for a target (unlike, unsave, unfollow)
///
/// # Errors
///
/// Returns `ResourceNotFound` when the subject has no such row
#[tracing::instrument(skip(database), fields(user_id = subject.user_id, kind = %kind))]
pub async fn remove_for_target(
    database: &Database,
    subject: &Subject,
    kind: InteractionKind,
    target_id: i64,
) -> AppResult<()> {
    if !database
        .delete_ledger_entry_for_target(kind, subject.user_id, target_id)
        .await?
    {
        return Err(AppError::not_found(kind.row_name()).with_resource_id(target_id.to_string()));
    }
    AppLogger::log_ledger_event(subject.user_id, kind, target_id, false);
    Ok(())
}

/// Delete a ledger row by its own id
///
/// # Errors
///
/// Returns `ResourceNotFound` when the row does not exist and
/// `PermissionDenied` when it belongs to another user
#[tracing::instrument(skip(database), fields(user_id = subject.user_id, kind = %kind))]
pub async fn delete_entry(
    database: &Database,
    subject: &Subject,
    kind: InteractionKind,
    entry_id: i64,
) -> AppResult<()> {
    let not_found = || AppError::not_found(kind.row_name()).with_resource_id(entry_id.to_string());
    let entry = database
        .get_ledger_entry(kind, entry_id)
        .await?
        .ok_or_else(not_found)?;
    authorize(subject, Action::Delete, &entry)?;

    if !database.delete_ledger_entry(kind, entry.id).await? {
        return Err(not_found());
    }
    AppLogger::log_ledger_event(subject.user_id, kind, entry.target_id, false);
    Ok(())
}

/// The subject's own rows of one kind, oldest first
///
/// # Errors
///
/// Returns `ResourceNotFound` for a page past the end
pub async fn list_own(
    database: &Database,
    subject: &Subject,
    kind: InteractionKind,
    page: PageRequest,
) -> AppResult<Page<LedgerEntry>> {
    let (entries, total) = database
        .list_ledger_entries(kind, subject.user_id, page)
        .await?;
    page.ensure_in_range(total)?;
    Ok(Page::new(entries, total, page))
}

/// Users following `user_id`
///
/// # Errors
///
/// Returns `ResourceNotFound` for an unknown user or a page past the end
pub async fn followers(
    database: &Database,
    user_id: i64,
    page: PageRequest,
) -> AppResult<Page<UserSummary>> {
    ensure_target_exists(database, InteractionKind::Follow, user_id).await?;
    let (users, total) = database.list_followers(user_id, page).await?;
    page.ensure_in_range(total)?;
    Ok(Page::new(users, total, page))
}

/// Users that `user_id` follows
///
/// # Errors
///
/// Returns `ResourceNotFound` for an unknown user or a page past the end
pub async fn following(
    database: &Database,
    user_id: i64,
    page: PageRequest,
) -> AppResult<Page<UserSummary>> {
    ensure_target_exists(database, InteractionKind::Follow, user_id).await?;
    let (users, total) = database.list_following(user_id, page).await?;
    page.ensure_in_range(total)?;
    Ok(Page::new(users, total, page))
}

/// Live number of likes on a recipe
///
/// # Errors
///
/// Returns an error if the database query fails
pub async fn count_likes(database: &Database, recipe_id: i64) -> AppResult<i64> {
    database.count_for_target(InteractionKind::Like, recipe_id).await
}

/// Live number of saves of a recipe
///
/// # Errors
///
/// Returns an error if the database query fails
pub async fn count_saves(database: &Database, recipe_id: i64) -> AppResult<i64> {
    database.count_for_target(InteractionKind::Save, recipe_id).await
}

/// Live number of users following `user_id`
///
/// # Errors
///
/// Returns an error if the database query fails
pub async fn count_followers(database: &Database, user_id: i64) -> AppResult<i64> {
    database.count_for_target(InteractionKind::Follow, user_id).await
}

/// Live number of users `user_id` follows
///
/// # Errors
///
/// Returns an error if the database query fails
pub async fn count_following(database: &Database, user_id: i64) -> AppResult<i64> {
    database.count_for_owner(InteractionKind::Follow, user_id).await
}

async fn ensure_target_exists(
    database: &Database,
    kind: InteractionKind,
    target_id: i64,
) -> AppResult<()> {
    let exists = match kind {
        InteractionKind::Follow => database.user_exists(target_id).await?,
        InteractionKind::Like | InteractionKind::Save => database.recipe_exists(target_id).await?,
    };
    if exists {
        Ok(())
    } else {
        Err(AppError::not_found(kind.target_name()).with_resource_id(target_id.to_string()))
    }
}
