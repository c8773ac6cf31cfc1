// ABOUTME: Domain service layer holding the business rules behind the HTTP routes
// ABOUTME: Identity, content, and interaction-ledger operations over the shared Database
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Domain service layer
//!
//! Route handlers parse requests and delegate here. Every mutating operation
//! runs the ownership policy before touching storage.

/// Recipes, ingredients, images, and categories
pub mod content;

/// Registration, login, token refresh and revocation, profiles
pub mod identity;

/// Likes, saves, and follows
pub mod ledger;
