// ABOUTME: Core types and constants for the Cooks Corner recipe-sharing platform
// ABOUTME: Foundation crate with error handling, pagination, ownership policy, and models
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Cooks Core
//!
//! Foundation crate providing shared types for the Cooks Corner server. It has
//! no storage or transport dependencies (apart from the optional
//! `http-response` feature), so everything in here can be unit tested without
//! a database.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError` and `ErrorCode`
//! - **constants**: Token lifetimes, pagination defaults, and user-facing messages
//! - **pagination**: Page-number pagination requests and responses
//! - **permissions**: Ownership-based authorization policy
//! - **models**: Users, recipes, categories, ingredients, and ledger rows

/// Unified error handling system with standard error codes and HTTP responses
pub mod errors;

/// Application constants organized by domain
pub mod constants;

/// Page-number pagination for listing endpoints
pub mod pagination;

/// Ownership-based authorization policy
pub mod permissions;

/// Core data models (User, Recipe, Category, ledger rows)
pub mod models;
