// ABOUTME: HTTP middleware for bearer authentication and cross-origin access
// ABOUTME: Request tracing itself is layered on in the router via tower-http
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

pub mod auth;
pub mod cors;

pub use auth::AuthMiddleware;
pub use cors::setup_cors;
