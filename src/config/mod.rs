// ABOUTME: Configuration management module for server settings
// ABOUTME: Environment-only configuration covering ports, storage, tokens, and pagination
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Configuration module for the Cooks Corner server
//!
//! All settings come from environment variables; there is no config file.

/// Environment and server configuration
pub mod environment;
