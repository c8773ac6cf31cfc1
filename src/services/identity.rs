// ABOUTME: Identity business logic: registration, login, token refresh, logout, and profiles
// ABOUTME: Protocol-agnostic so route handlers stay thin and tests can drive it directly
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::Deserialize;
use tracing::info;
use validator::Validate;

use crate::auth::{hash_password, verify_password, AuthManager, JwtValidationError, TokenPair, TokenType};
use crate::database::Database;
use crate::errors::{validate_input, AppError, AppResult};
use crate::filters::UserFilter;
use crate::logging::AppLogger;
use crate::models::{NewUser, ProfileChanges, User, UserSummary};
use crate::pagination::{Page, PageRequest};
use crate::permissions::{authorize, Action, Subject};

/// Registration payload
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct Registration {
    /// Login email, unique
    #[validate(email, length(max = 254))]
    pub email: String,
    /// Display name, unique
    #[validate(length(min = 1, max = 150))]
    pub username: String,
    /// Plain-text password, only ever hashed
    #[validate(length(min = 8, max = 128))]
    pub password: String,
    /// Opaque photo reference
    #[validate(length(max = 255))]
    pub photo: Option<String>,
    /// Free-form biography
    #[serde(alias = "user_bio")]
    #[validate(length(max = 1000))]
    pub bio: Option<String>,
}

/// Login payload
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct Credentials {
    /// Login email
    #[validate(length(min = 1))]
    pub email: String,
    /// Plain-text password
    #[validate(length(min = 1))]
    pub password: String,
}

/// Profile update payload; omitted fields keep their value
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ProfileUpdate {
    #[validate(length(min = 1, max = 150))]
    pub username: Option<String>,
    #[validate(length(max = 255))]
    pub photo: Option<String>,
    #[serde(alias = "user_bio")]
    #[validate(length(max = 1000))]
    pub bio: Option<String>,
}

impl From<ProfileUpdate> for ProfileChanges {
    fn from(update: ProfileUpdate) -> Self {
        Self {
            username: update.username,
            photo: update.photo,
            bio: update.bio,
        }
    }
}

/// Successful login
#[derive(Debug, Clone)]
pub struct Session {
    /// Authenticated user
    pub user: User,
    /// Issued tokens
    pub tokens: TokenPair,
}

/// Register a new account
///
/// # Errors
///
/// Returns `InvalidInput` for malformed fields and `ResourceAlreadyExists`
/// when the email or username is taken
#[tracing::instrument(skip(database, registration), fields(username = %registration.username))]
pub async fn register(database: &Database, registration: Registration) -> AppResult<User> {
    validate_input(&registration)?;

    let password_hash = hash_password(registration.password).await?;
    let user = database
        .create_user(&NewUser {
            email: registration.email.trim().to_lowercase(),
            username: registration.username,
            password_hash,
            photo: registration.photo,
            bio: registration.bio,
        })
        .await
        .inspect_err(|e| AppLogger::log_auth_event(None, "register", false, Some(&e.message)))?;

    AppLogger::log_auth_event(Some(user.id), "register", true, None);
    Ok(user)
}

/// Check credentials and issue an access/refresh token pair
///
/// # Errors
///
/// Returns `ResourceNotFound` when no user has the email and `AuthInvalid`
/// when the password does not match
#[tracing::instrument(skip(database, auth_manager, credentials))]
pub async fn login(
    database: &Database,
    auth_manager: &AuthManager,
    credentials: Credentials,
) -> AppResult<Session> {
    validate_input(&credentials)?;

    let email = credentials.email.trim().to_lowercase();
    let Some(user) = database.get_user_by_email(&email).await? else {
        AppLogger::log_auth_event(None, "login", false, Some("unknown email"));
        return Err(AppError::not_found("User"));
    };

    if !verify_password(credentials.password, user.password_hash.clone()).await? {
        AppLogger::log_auth_event(Some(user.id), "login", false, Some("password mismatch"));
        return Err(AppError::auth_invalid("Invalid email or password"));
    }

    let tokens = auth_manager.generate_token_pair(user.id)?;
    AppLogger::log_auth_event(Some(user.id), "login", true, None);
    Ok(Session { user, tokens })
}

/// Exchange a refresh token for a fresh access token
///
/// # Errors
///
/// Returns an authentication error when the token is malformed, expired,
/// not a refresh token, or revoked
#[tracing::instrument(skip_all)]
pub async fn refresh(
    database: &Database,
    auth_manager: &AuthManager,
    refresh_token: &str,
) -> AppResult<String> {
    let claims = auth_manager
        .validate_token(refresh_token, TokenType::Refresh)
        .inspect_err(|e| AppLogger::log_auth_event(None, "refresh", false, Some(&e.to_string())))?;
    let user_id = claims.user_id()?;

    if database.is_token_revoked(&claims.jti).await? {
        AppLogger::log_security_event("revoked_refresh_token", &claims.jti, Some(user_id));
        return Err(AppError::auth_invalid("Refresh token has been revoked"));
    }

    let access = auth_manager.generate_token(user_id, TokenType::Access)?;
    AppLogger::log_auth_event(Some(user_id), "refresh", true, None);
    Ok(access)
}

/// Revoke a refresh token so it can no longer be exchanged
///
/// Revoking an already-revoked token succeeds again.
///
/// # Errors
///
/// Returns `InvalidInput` when the token is malformed, expired, or not a
/// refresh token, and `PermissionDenied` when it belongs to another user
#[tracing::instrument(skip(database, auth_manager, refresh_token), fields(user_id = subject.user_id))]
pub async fn logout(
    database: &Database,
    auth_manager: &AuthManager,
    subject: &Subject,
    refresh_token: &str,
) -> AppResult<()> {
    let claims = auth_manager
        .validate_token(refresh_token, TokenType::Refresh)
        .map_err(|e| {
            AppLogger::log_auth_event(Some(subject.user_id), "logout", false, Some(&e.to_string()));
            invalid_refresh_token(&e)
        })?;
    let owner_id = claims.user_id().map_err(|e| invalid_refresh_token(&e))?;

    if owner_id != subject.user_id {
        AppLogger::log_security_event(
            "foreign_refresh_token",
            "logout attempted with another user's refresh token",
            Some(subject.user_id),
        );
        return Err(AppError::permission_denied(
            "Refresh token belongs to another user",
        ));
    }

    database
        .revoke_token(&claims.jti, owner_id, claims.expires_at())
        .await?;
    AppLogger::log_auth_event(Some(owner_id), "logout", true, None);
    Ok(())
}

fn invalid_refresh_token(error: &JwtValidationError) -> AppError {
    AppError::invalid_input(format!("Invalid refresh token: {error}"))
}

/// Public profile with follower, following, and recipe counts
///
/// # Errors
///
/// Returns `ResourceNotFound` when the user does not exist
pub async fn get_profile(database: &Database, user_id: i64) -> AppResult<UserSummary> {
    database
        .get_user_summary(user_id)
        .await?
        .ok_or_else(|| AppError::not_found("User").with_resource_id(user_id.to_string()))
}

/// Update the subject's own profile
///
/// # Errors
///
/// Returns `ResourceNotFound` for an unknown user, `PermissionDenied` when
/// the subject is someone else, and `ResourceAlreadyExists` for a taken username
#[tracing::instrument(skip(database, update), fields(user_id = subject.user_id))]
pub async fn update_profile(
    database: &Database,
    subject: &Subject,
    user_id: i64,
    update: ProfileUpdate,
) -> AppResult<UserSummary> {
    validate_input(&update)?;

    let user = database
        .get_user(user_id)
        .await?
        .ok_or_else(|| AppError::not_found("User").with_resource_id(user_id.to_string()))?;
    authorize(subject, Action::Update, &user)?;

    let changes = ProfileChanges::from(update);
    if !changes.is_empty() {
        database.update_profile(user_id, &changes).await?;
        info!(user_id, "Profile updated");
    }

    get_profile(database, user_id).await
}

/// Paginated user listing with the username filter
///
/// # Errors
///
/// Returns `InvalidInput` for a bad filter and `ResourceNotFound` for a page
/// past the end
pub async fn list_users(
    database: &Database,
    filter: &UserFilter,
    page: PageRequest,
) -> AppResult<Page<UserSummary>> {
    filter.ensure_valid()?;
    let (users, total) = database.list_users(filter, page).await?;
    page.ensure_in_range(total)?;
    Ok(Page::new(users, total, page))
}
