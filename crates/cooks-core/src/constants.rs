// ABOUTME: Application constants for token lifetimes, pagination defaults, and messages
// ABOUTME: Shared by the server crate and its integration tests
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Token lifetimes
pub mod tokens {
    /// Default access token lifetime in minutes
    pub const DEFAULT_ACCESS_TOKEN_EXPIRY_MINUTES: i64 = 60;
    /// Default refresh token lifetime in hours
    pub const DEFAULT_REFRESH_TOKEN_EXPIRY_HOURS: i64 = 24;
    /// Token type claim value for access tokens
    pub const ACCESS: &str = "access";
    /// Token type claim value for refresh tokens
    pub const REFRESH: &str = "refresh";
    /// Audience claim for every token issued by the server
    pub const AUDIENCE: &str = "cooks-corner";
}

/// Pagination defaults
pub mod pagination {
    /// Page size when the client does not ask for one
    pub const DEFAULT_PAGE_SIZE: u32 = 10;
    /// Upper bound on client-requested page sizes
    pub const MAX_PAGE_SIZE: u32 = 100;
}

/// User-facing messages for ledger duplicates
pub mod messages {
    /// Second like of the same recipe
    pub const ALREADY_LIKED: &str = "You have already liked this recipe.";
    /// Second save of the same recipe
    pub const ALREADY_SAVED: &str = "You have already saved this recipe.";
    /// Second follow of the same author
    pub const ALREADY_FOLLOWED: &str = "You have already followed this author.";
    /// Registration with a taken email
    pub const EMAIL_TAKEN: &str = "A user with this email already exists.";
    /// Registration or profile update with a taken username
    pub const USERNAME_TAKEN: &str = "A user with this username already exists.";
    /// Category creation with a taken name
    pub const CATEGORY_TAKEN: &str = "A category with this name already exists.";
}

/// Service identity used in logs
pub mod service_names {
    /// Binary and log target name
    pub const COOKS_CORNER_SERVER: &str = "cooks-corner-server";
}
