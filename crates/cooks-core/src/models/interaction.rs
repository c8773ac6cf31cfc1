// ABOUTME: Interaction ledger models: liked recipes, saved recipes, and follows
// ABOUTME: Each row has one owner and a (owner, target) pair that must be unique
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::fmt::{Display, Formatter, Result as FmtResult};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::messages;
use crate::permissions::Owned;

/// The three kinds of ledger relation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionKind {
    /// User likes a recipe
    Like,
    /// User bookmarks a recipe
    Save,
    /// User follows another user
    Follow,
}

impl InteractionKind {
    /// Ledger table backing this kind
    #[must_use]
    pub const fn table(&self) -> &'static str {
        match self {
            Self::Like => "liked_recipes",
            Self::Save => "saved_recipes",
            Self::Follow => "follows",
        }
    }

    /// Column holding the owning user
    #[must_use]
    pub const fn owner_column(&self) -> &'static str {
        match self {
            Self::Like | Self::Save => "user_id",
            Self::Follow => "follower_id",
        }
    }

    /// Column holding the target (recipe or followed user)
    #[must_use]
    pub const fn target_column(&self) -> &'static str {
        match self {
            Self::Like | Self::Save => "recipe_id",
            Self::Follow => "followed_id",
        }
    }

    /// Column holding the creation timestamp
    #[must_use]
    pub const fn timestamp_column(&self) -> &'static str {
        match self {
            Self::Like => "liked_on",
            Self::Save => "saved_on",
            Self::Follow => "followed_on",
        }
    }

    /// Message returned when the pair already exists
    #[must_use]
    pub const fn duplicate_message(&self) -> &'static str {
        match self {
            Self::Like => messages::ALREADY_LIKED,
            Self::Save => messages::ALREADY_SAVED,
            Self::Follow => messages::ALREADY_FOLLOWED,
        }
    }

    /// Human name of a ledger row
    #[must_use]
    pub const fn row_name(&self) -> &'static str {
        match self {
            Self::Like => "Liked recipe",
            Self::Save => "Saved recipe",
            Self::Follow => "Follow",
        }
    }

    /// Human name of the target
    #[must_use]
    pub const fn target_name(&self) -> &'static str {
        match self {
            Self::Like | Self::Save => "Recipe",
            Self::Follow => "User",
        }
    }
}

impl Display for InteractionKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Like => write!(f, "like"),
            Self::Save => write!(f, "save"),
            Self::Follow => write!(f, "follow"),
        }
    }
}

/// A ledger row in its generic shape
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Kind of relation
    pub kind: InteractionKind,
    /// Row identifier
    pub id: i64,
    /// Owning user
    pub owner_id: i64,
    /// Recipe or followed user
    pub target_id: i64,
    /// When the row was created
    pub created_at: DateTime<Utc>,
}

impl Owned for LedgerEntry {
    fn owner_id(&self) -> i64 {
        self.owner_id
    }

    fn resource_name(&self) -> &'static str {
        match self.kind {
            InteractionKind::Like => "like",
            InteractionKind::Save => "saved recipe",
            InteractionKind::Follow => "follow",
        }
    }
}

/// A user liking a recipe
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LikedRecipe {
    /// Row identifier
    pub id: i64,
    /// Liking user
    pub user_id: i64,
    /// Liked recipe
    pub recipe_id: i64,
    /// When the like happened
    pub liked_on: DateTime<Utc>,
}

/// A user saving a recipe
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedRecipe {
    /// Row identifier
    pub id: i64,
    /// Saving user
    pub user_id: i64,
    /// Saved recipe
    pub recipe_id: i64,
    /// When the save happened
    pub saved_on: DateTime<Utc>,
}

/// A user following another user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Follow {
    /// Row identifier
    pub id: i64,
    /// Following user
    pub follower_id: i64,
    /// Followed user
    pub followed_id: i64,
    /// When the follow happened
    pub followed_on: DateTime<Utc>,
}

impl From<LedgerEntry> for LikedRecipe {
    fn from(entry: LedgerEntry) -> Self {
        Self {
            id: entry.id,
            user_id: entry.owner_id,
            recipe_id: entry.target_id,
            liked_on: entry.created_at,
        }
    }
}

impl From<LedgerEntry> for SavedRecipe {
    fn from(entry: LedgerEntry) -> Self {
        Self {
            id: entry.id,
            user_id: entry.owner_id,
            recipe_id: entry.target_id,
            saved_on: entry.created_at,
        }
    }
}

impl From<LedgerEntry> for Follow {
    fn from(entry: LedgerEntry) -> Self {
        Self {
            id: entry.id,
            follower_id: entry.owner_id,
            followed_id: entry.target_id,
            followed_on: entry.created_at,
        }
    }
}

impl Owned for LikedRecipe {
    fn owner_id(&self) -> i64 {
        self.user_id
    }

    fn resource_name(&self) -> &'static str {
        "like"
    }
}

impl Owned for SavedRecipe {
    fn owner_id(&self) -> i64 {
        self.user_id
    }

    fn resource_name(&self) -> &'static str {
        "saved recipe"
    }
}

impl Owned for Follow {
    fn owner_id(&self) -> i64 {
        self.follower_id
    }

    fn resource_name(&self) -> &'static str {
        "follow"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::permissions::{is_allowed, Action, Subject};

    #[test]
    fn test_owner_field_per_kind() {
        let follow = Follow {
            id: 1,
            follower_id: 10,
            followed_id: 20,
            followed_on: Utc::now(),
        };
        assert!(is_allowed(Some(&Subject::new(10)), Action::Delete, Some(&follow)));
        assert!(!is_allowed(Some(&Subject::new(20)), Action::Delete, Some(&follow)));

        let like = LikedRecipe {
            id: 2,
            user_id: 20,
            recipe_id: 5,
            liked_on: Utc::now(),
        };
        assert!(is_allowed(Some(&Subject::new(20)), Action::Delete, Some(&like)));
    }

    #[test]
    fn test_duplicate_messages() {
        assert_eq!(
            InteractionKind::Follow.duplicate_message(),
            "You have already followed this author."
        );
        assert_eq!(InteractionKind::Save.table(), "saved_recipes");
    }
}
