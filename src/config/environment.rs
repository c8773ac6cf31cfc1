// ABOUTME: Environment configuration management for deployment-specific settings
// ABOUTME: Parses ports, database URL, JWT settings, and pagination bounds from env vars
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Environment-based configuration management

use std::env;
use std::error::Error as StdError;
use std::fmt::{self, Debug, Display, Formatter};
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::auth::generate_jwt_secret;
use crate::constants::{pagination, tokens};
use crate::pagination::PaginationConfig;

/// Default HTTP port
pub const DEFAULT_HTTP_PORT: u16 = 8081;

/// Default database location
pub const DEFAULT_DATABASE_URL: &str = "sqlite:./data/cooks_corner.db";

/// Environment type for security and other configurations
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local development
    #[default]
    Development,
    /// Production deployment
    Production,
    /// Automated tests
    Testing,
}

impl Environment {
    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "testing" | "test" => Self::Testing,
            _ => Self::Development,
        }
    }

    /// Check if this is a production environment
    #[must_use]
    pub const fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    /// Check if this is a testing environment
    #[must_use]
    pub const fn is_testing(&self) -> bool {
        matches!(self, Self::Testing)
    }
}

impl Display for Environment {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
            Self::Testing => write!(f, "testing"),
        }
    }
}

/// Type-safe SQLite location
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseUrl {
    /// SQLite database with file path
    SQLite {
        /// Database file
        path: PathBuf,
    },
    /// In-memory SQLite (for testing)
    Memory,
}

impl DatabaseUrl {
    /// Parse from a `sqlite:` URL or a bare file path
    #[must_use]
    pub fn parse_url(s: &str) -> Self {
        let path_str = s.strip_prefix("sqlite://").or_else(|| s.strip_prefix("sqlite:")).unwrap_or(s);
        if path_str == ":memory:" {
            Self::Memory
        } else {
            Self::SQLite {
                path: PathBuf::from(path_str),
            }
        }
    }

    /// Convert to connection string
    #[must_use]
    pub fn to_connection_string(&self) -> String {
        match self {
            Self::SQLite { path } => format!("sqlite:{}", path.display()),
            Self::Memory => "sqlite::memory:".to_owned(),
        }
    }

    /// Check if this is an in-memory database
    #[must_use]
    pub const fn is_memory(&self) -> bool {
        matches!(self, Self::Memory)
    }
}

impl Default for DatabaseUrl {
    fn default() -> Self {
        Self::parse_url(DEFAULT_DATABASE_URL)
    }
}

impl Display for DatabaseUrl {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_connection_string())
    }
}

/// HS256 signing secret; never printed
#[derive(Clone)]
pub struct JwtSecret(Vec<u8>);

impl JwtSecret {
    /// Wrap raw secret bytes
    #[must_use]
    pub const fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// Raw secret bytes
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl Debug for JwtSecret {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("JwtSecret([REDACTED])")
    }
}

/// Token signing and lifetime settings
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Signing secret
    pub jwt_secret: JwtSecret,
    /// Access token lifetime in minutes
    pub access_token_expiry_minutes: i64,
    /// Refresh token lifetime in hours
    pub refresh_token_expiry_hours: i64,
}

/// Complete server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// HTTP listen port
    pub http_port: u16,
    /// Deployment environment
    pub environment: Environment,
    /// Database location
    pub database_url: DatabaseUrl,
    /// Token settings
    pub auth: AuthConfig,
    /// Listing page sizes
    pub pagination: PaginationConfig,
    /// Comma-separated CORS origins, `*` for any
    pub cors_allowed_origins: String,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if a variable holds an unparseable value, or if
    /// `JWT_SECRET` is missing in production
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source
    ///
    /// # Errors
    ///
    /// Same as [`ServerConfig::from_env`]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let environment = lookup("ENVIRONMENT")
            .map(|value| Environment::from_str_or_default(&value))
            .unwrap_or_default();

        let jwt_secret = match lookup("JWT_SECRET").filter(|value| !value.is_empty()) {
            Some(secret) => JwtSecret::new(secret.into_bytes()),
            None if environment.is_production() => {
                return Err(anyhow!("JWT_SECRET must be set in production"));
            }
            None => {
                warn!("JWT_SECRET not set, generating an ephemeral secret; tokens will not survive restarts");
                JwtSecret::new(generate_jwt_secret()?.to_vec())
            }
        };

        let config = Self {
            http_port: parse_or(&lookup, "HTTP_PORT", DEFAULT_HTTP_PORT)?,
            environment,
            database_url: lookup("DATABASE_URL")
                .map_or_else(DatabaseUrl::default, |url| DatabaseUrl::parse_url(&url)),
            auth: AuthConfig {
                jwt_secret,
                access_token_expiry_minutes: parse_or(
                    &lookup,
                    "ACCESS_TOKEN_EXPIRY_MINUTES",
                    tokens::DEFAULT_ACCESS_TOKEN_EXPIRY_MINUTES,
                )?,
                refresh_token_expiry_hours: parse_or(
                    &lookup,
                    "REFRESH_TOKEN_EXPIRY_HOURS",
                    tokens::DEFAULT_REFRESH_TOKEN_EXPIRY_HOURS,
                )?,
            },
            pagination: PaginationConfig {
                default_page_size: parse_or(
                    &lookup,
                    "DEFAULT_PAGE_SIZE",
                    pagination::DEFAULT_PAGE_SIZE,
                )?,
                max_page_size: parse_or(&lookup, "MAX_PAGE_SIZE", pagination::MAX_PAGE_SIZE)?,
            },
            cors_allowed_origins: lookup("CORS_ALLOWED_ORIGINS").unwrap_or_else(|| "*".to_owned()),
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns an error for non-positive token lifetimes or page sizes
    pub fn validate(&self) -> Result<()> {
        if self.auth.access_token_expiry_minutes <= 0 {
            return Err(anyhow!("ACCESS_TOKEN_EXPIRY_MINUTES must be positive"));
        }
        if self.auth.refresh_token_expiry_hours <= 0 {
            return Err(anyhow!("REFRESH_TOKEN_EXPIRY_HOURS must be positive"));
        }
        if self.pagination.default_page_size == 0 || self.pagination.max_page_size == 0 {
            return Err(anyhow!("Page sizes must be at least 1"));
        }
        if self.pagination.default_page_size > self.pagination.max_page_size {
            warn!(
                default = self.pagination.default_page_size,
                max = self.pagination.max_page_size,
                "DEFAULT_PAGE_SIZE exceeds MAX_PAGE_SIZE and will be clamped"
            );
        }
        Ok(())
    }

    /// Get a summary of the configuration for logging (without secrets)
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Cooks Corner Server Configuration:\n\
             - HTTP Port: {}\n\
             - Environment: {}\n\
             - Database: {}\n\
             - Access Token Lifetime: {} minutes\n\
             - Refresh Token Lifetime: {} hours\n\
             - Page Size: {} (max {})",
            self.http_port,
            self.environment,
            if self.database_url.is_memory() {
                "SQLite (in-memory)"
            } else {
                "SQLite"
            },
            self.auth.access_token_expiry_minutes,
            self.auth.refresh_token_expiry_hours,
            self.pagination.default_page_size,
            self.pagination.max_page_size,
        )
    }
}

/// Parse a variable or fall back to the default when unset
fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: StdError + Send + Sync + 'static,
{
    lookup(key).map_or(Ok(default), |value| {
        value
            .trim()
            .parse()
            .with_context(|| format!("Invalid {key} value: {value}"))
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_variables() {
        let config = ServerConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.http_port, DEFAULT_HTTP_PORT);
        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.pagination.default_page_size, 10);
        assert_eq!(config.auth.jwt_secret.as_bytes().len(), 64);
    }

    #[test]
    fn test_production_requires_secret() {
        let result = ServerConfig::from_lookup(lookup_from(&[("ENVIRONMENT", "production")]));
        assert!(result.is_err());

        let config = ServerConfig::from_lookup(lookup_from(&[
            ("ENVIRONMENT", "prod"),
            ("JWT_SECRET", "s3cret"),
        ]))
        .unwrap();
        assert_eq!(config.auth.jwt_secret.as_bytes(), b"s3cret");
    }

    #[test]
    fn test_invalid_port_rejected() {
        let result = ServerConfig::from_lookup(lookup_from(&[("HTTP_PORT", "not-a-port")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_database_url_parsing() {
        assert!(DatabaseUrl::parse_url("sqlite::memory:").is_memory());
        assert_eq!(
            DatabaseUrl::parse_url("sqlite:./data/app.db").to_connection_string(),
            "sqlite:./data/app.db"
        );
        assert_eq!(
            DatabaseUrl::parse_url("recipes.db").to_connection_string(),
            "sqlite:recipes.db"
        );
    }

    #[test]
    fn test_summary_hides_secret() {
        let config =
            ServerConfig::from_lookup(lookup_from(&[("JWT_SECRET", "do-not-print")])).unwrap();
        assert!(!config.summary().contains("do-not-print"));
        assert!(!format!("{config:?}").contains("do-not-print"));
    }
}
