// ABOUTME: Ownership-based authorization policy shared by every mutating operation
// ABOUTME: Pure functions over (subject, action, resource) so the rule is testable in isolation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Authorization Policy
//!
//! One rule covers recipes, ledger rows, and user profiles:
//!
//! - reads are always allowed (endpoints may still require authentication)
//! - creates need an authenticated subject, who becomes the owner
//! - updates and deletes need `resource.owner_id() == subject.user_id`

use std::fmt::{self, Display, Formatter};

use crate::errors::{AppError, AppResult};

/// The authenticated caller identity attached to a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subject {
    /// Authenticated user ID
    pub user_id: i64,
}

impl Subject {
    /// Subject for the given user
    #[must_use]
    pub const fn new(user_id: i64) -> Self {
        Self { user_id }
    }
}

/// Kind of operation being authorized
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Safe read
    Read,
    /// Create a new resource owned by the subject
    Create,
    /// Modify an existing resource
    Update,
    /// Remove an existing resource
    Delete,
}

impl Action {
    /// Whether the action changes state
    #[must_use]
    pub const fn is_mutating(&self) -> bool {
        !matches!(self, Self::Read)
    }
}

impl Display for Action {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read => write!(f, "read"),
            Self::Create => write!(f, "create"),
            Self::Update => write!(f, "update"),
            Self::Delete => write!(f, "delete"),
        }
    }
}

/// A resource with a single owning user
pub trait Owned {
    /// ID of the owning user (author, liker, saver, follower, or the user itself)
    fn owner_id(&self) -> i64;

    /// Resource name used in denial messages
    fn resource_name(&self) -> &'static str;
}

/// Decide whether `subject` may perform `action` on `resource`
///
/// `resource` is `None` for creates and collection reads.
#[must_use]
pub fn is_allowed<R: Owned + ?Sized>(
    subject: Option<&Subject>,
    action: Action,
    resource: Option<&R>,
) -> bool {
    match (action, subject, resource) {
        (Action::Read, _, _) | (Action::Create, Some(_), _) => true,
        (Action::Update | Action::Delete, Some(subject), Some(resource)) => {
            resource.owner_id() == subject.user_id
        }
        _ => false,
    }
}

/// Authorize a mutation on an existing resource
///
/// # Errors
///
/// Returns a permission-denied error when the subject does not own the resource
pub fn authorize<R: Owned + ?Sized>(subject: &Subject, action: Action, resource: &R) -> AppResult<()> {
    if is_allowed(Some(subject), action, Some(resource)) {
        return Ok(());
    }

    tracing::warn!(
        user_id = subject.user_id,
        owner_id = resource.owner_id(),
        action = %action,
        resource = resource.resource_name(),
        "Ownership check failed"
    );

    Err(AppError::permission_denied(format!(
        "You do not have permission to {action} this {}",
        resource.resource_name()
    ))
    .with_user_id(subject.user_id))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Note {
        author: i64,
    }

    impl Owned for Note {
        fn owner_id(&self) -> i64 {
            self.author
        }

        fn resource_name(&self) -> &'static str {
            "note"
        }
    }

    #[test]
    fn test_reads_always_allowed() {
        let note = Note { author: 1 };
        assert!(is_allowed(None, Action::Read, Some(&note)));
        assert!(is_allowed(Some(&Subject::new(2)), Action::Read, Some(&note)));
    }

    #[test]
    fn test_create_requires_subject() {
        assert!(!is_allowed::<Note>(None, Action::Create, None));
        assert!(is_allowed::<Note>(Some(&Subject::new(5)), Action::Create, None));
    }

    #[test]
    fn test_mutations_require_ownership() {
        let note = Note { author: 1 };
        let owner = Subject::new(1);
        let other = Subject::new(2);

        assert!(is_allowed(Some(&owner), Action::Update, Some(&note)));
        assert!(is_allowed(Some(&owner), Action::Delete, Some(&note)));
        assert!(!is_allowed(Some(&other), Action::Update, Some(&note)));
        assert!(!is_allowed(Some(&other), Action::Delete, Some(&note)));
        assert!(!is_allowed(None, Action::Delete, Some(&note)));
    }

    #[test]
    fn test_authorize_error_code() {
        let note = Note { author: 1 };
        let error = authorize(&Subject::new(9), Action::Delete, &note).unwrap_err();
        assert_eq!(error.http_status(), 403);
        assert!(error.message.contains("delete this note"));
    }
}
