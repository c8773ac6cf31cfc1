// ABOUTME: Shared server resources handed to every route as axum state
// ABOUTME: Database, token manager, auth middleware, and configuration behind Arcs
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use crate::auth::AuthManager;
use crate::config::environment::ServerConfig;
use crate::database::Database;
use crate::errors::AppResult;
use crate::middleware::AuthMiddleware;
use crate::pagination::{PageQuery, PageRequest};

/// Long-lived resources shared across requests
#[derive(Clone)]
pub struct ServerResources {
    pub database: Arc<Database>,
    pub auth_manager: Arc<AuthManager>,
    pub auth_middleware: Arc<AuthMiddleware>,
    pub config: Arc<ServerConfig>,
}

impl ServerResources {
    /// Wire resources together, sharing a single token manager
    #[must_use]
    pub fn new(database: Database, config: ServerConfig) -> Self {
        let auth_manager = Arc::new(AuthManager::new(&config.auth));
        Self {
            database: Arc::new(database),
            auth_middleware: Arc::new(AuthMiddleware::new(Arc::clone(&auth_manager))),
            auth_manager,
            config: Arc::new(config),
        }
    }

    /// Resolve pagination parameters against the configured bounds
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for a zero page or page size
    pub fn page_request(&self, query: PageQuery) -> AppResult<PageRequest> {
        PageRequest::from_query(query, self.config.pagination)
    }
}
