// ABOUTME: Main library entry point for the Cooks Corner recipe-sharing API
// ABOUTME: Wires identity, content, interaction ledger, and query layers behind axum routes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Cooks Corner Server
//!
//! A social recipe-sharing backend. Users register, authenticate, publish
//! recipes with ingredients and images, and interact through likes, saves,
//! and follows.
//!
//! ## Architecture
//!
//! - **Identity**: accounts, bcrypt credentials, JWT access/refresh tokens
//! - **Policy**: one ownership rule (`cooks_core::permissions`) checked before
//!   every mutation
//! - **Content**: recipes, categories, shared ingredients, images
//! - **Ledger**: likes, saves, follows guarded by unique indexes
//! - **Filters**: composable listing predicates with page-number pagination
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use cooks_corner::config::environment::ServerConfig;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::from_env()?;
//!     println!("Cooks Corner configured on port {}", config.http_port);
//!     Ok(())
//! }
//! ```

/// JWT token issuance and validation plus password hashing
pub mod auth;

/// Environment-based server configuration
pub mod config;

/// SQLite persistence for users, content, and the interaction ledger
pub mod database;

/// Error types re-exported from `cooks-core`
pub mod errors;

/// Listing filters translated into SQL predicates
pub mod filters;

/// Structured logging setup
pub mod logging;

/// Request authentication middleware
pub mod middleware;

/// Shared server resources handed to every route group
pub mod resources;

/// HTTP route groups and router assembly
pub mod routes;

/// Domain operations enforcing the ownership policy
pub mod services;

pub use cooks_core::{constants, models, pagination, permissions};
