// ABOUTME: User account model and the public profile summary with derived counts
// ABOUTME: The password hash lives only on User and is never serialized
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::permissions::Owned;

/// Stored user account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier
    pub id: i64,
    /// Unique email address used to log in
    pub email: String,
    /// Unique public handle
    pub username: String,
    /// bcrypt hash of the password
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    /// Reference to the profile photo
    pub photo: Option<String>,
    /// Free-form profile text
    pub bio: Option<String>,
    /// When the account was registered
    pub created_at: DateTime<Utc>,
}

impl Owned for User {
    fn owner_id(&self) -> i64 {
        self.id
    }

    fn resource_name(&self) -> &'static str {
        "profile"
    }
}

/// Data required to insert a user
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Email address
    pub email: String,
    /// Public handle
    pub username: String,
    /// Already-hashed password
    pub password_hash: String,
    /// Photo reference
    pub photo: Option<String>,
    /// Profile text
    pub bio: Option<String>,
}

/// Partial profile update; `None` keeps the stored value
#[derive(Debug, Clone, Default)]
pub struct ProfileChanges {
    /// New username
    pub username: Option<String>,
    /// New photo reference
    pub photo: Option<String>,
    /// New profile text
    pub bio: Option<String>,
}

impl ProfileChanges {
    /// Whether the update touches no field
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.username.is_none() && self.photo.is_none() && self.bio.is_none()
    }
}

/// Public view of a user with live social counts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSummary {
    /// Unique identifier
    pub id: i64,
    /// Email address
    pub email: String,
    /// Public handle
    pub username: String,
    /// Photo reference
    pub photo: Option<String>,
    /// Profile text
    pub bio: Option<String>,
    /// Users following this user
    pub followers_count: i64,
    /// Users this user follows
    pub following_count: i64,
    /// Recipes authored by this user
    pub recipes_count: i64,
}
