// ABOUTME: Environment configuration management for the formulation server
// ABOUTME: Parses ports, database URL, CORS origins, and formulation overrides from env vars
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Environment-based configuration management

use crate::constants::{defaults, env_keys};
use anyhow::{anyhow, Context, Result};
use kibble_formulation::FormulationConfig;
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::path::PathBuf;
use tracing::info;

/// Deployment environment
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
    /// Parse from string with fallback to development
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
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
            Self::Testing => write!(f, "testing"),
        }
    }
}

/// Type-safe catalog database location
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DatabaseUrl {
    /// `SQLite` database file
    SQLite {
        /// Path to the database file
        path: PathBuf,
    },
    /// In-memory `SQLite` (for testing)
    Memory,
}

impl DatabaseUrl {
    /// Parse a `sqlite:` URL or bare file path
    #[must_use]
    pub fn parse_url(s: &str) -> Self {
        let path_str = s.strip_prefix("sqlite:").unwrap_or(s);
        let path_str = path_str.strip_prefix("//").unwrap_or(path_str);
        if path_str == ":memory:" {
            Self::Memory
        } else {
            Self::SQLite {
                path: PathBuf::from(path_str),
            }
        }
    }

    /// Connection string accepted by sqlx
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
        Self::parse_url(defaults::DATABASE_URL)
    }
}

impl fmt::Display for DatabaseUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_connection_string())
    }
}

/// Server configuration loaded from the environment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP API port
    pub http_port: u16,
    /// Deployment environment
    pub environment: Environment,
    /// Catalog database settings
    pub database: DatabaseConfig,
    /// CORS settings
    pub cors: CorsConfig,
    /// Formulation thresholds
    pub formulation: FormulationConfig,
}

/// Catalog database settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database location
    pub url: DatabaseUrl,
    /// Create catalog tables on startup
    pub auto_migrate: bool,
}

/// CORS settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Comma-separated allowed origins, or `*`
    pub allowed_origins: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_port: defaults::HTTP_PORT,
            environment: Environment::default(),
            database: DatabaseConfig {
                url: DatabaseUrl::default(),
                auto_migrate: true,
            },
            cors: CorsConfig {
                allowed_origins: defaults::CORS_ALLOWED_ORIGINS.to_owned(),
            },
            formulation: FormulationConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set but unparseable, or the resulting
    /// formulation thresholds are inconsistent
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");

        let mut formulation = FormulationConfig::default();
        apply_override(env_keys::TOTAL_DM_G, &mut formulation.total_dm_g)?;
        apply_override(env_keys::PROTEIN_MIN_PERCENT, &mut formulation.protein.min_percent)?;
        apply_override(env_keys::PROTEIN_MAX_PERCENT, &mut formulation.protein.max_percent)?;
        apply_override(env_keys::FIBER_MIN_PERCENT, &mut formulation.fiber.min_percent)?;
        apply_override(env_keys::FIBER_MAX_PERCENT, &mut formulation.fiber.max_percent)?;
        // Without an explicit trigger, a raised ceiling carries the trigger with it
        formulation.fiber.reduction_trigger_percent = formulation
            .fiber
            .reduction_trigger_percent
            .max(formulation.fiber.max_percent);
        apply_override(
            env_keys::FIBER_REDUCTION_TRIGGER_PERCENT,
            &mut formulation.fiber.reduction_trigger_percent,
        )?;

        let config = Self {
            http_port: env_var_or(env_keys::HTTP_PORT, &defaults::HTTP_PORT.to_string())
                .parse()
                .context("Invalid HTTP_PORT value")?,
            environment: Environment::from_str_or_default(&env_var_or(
                env_keys::ENVIRONMENT,
                "development",
            )),
            database: DatabaseConfig {
                url: DatabaseUrl::parse_url(&env_var_or(
                    env_keys::DATABASE_URL,
                    defaults::DATABASE_URL,
                )),
                auto_migrate: env_var_or(env_keys::AUTO_MIGRATE, "true")
                    .parse()
                    .context("Invalid AUTO_MIGRATE value")?,
            },
            cors: CorsConfig {
                allowed_origins: env_var_or(
                    env_keys::CORS_ALLOWED_ORIGINS,
                    defaults::CORS_ALLOWED_ORIGINS,
                ),
            },
            formulation,
        };

        config.validate()?;
        info!("Configuration loaded successfully");
        Ok(config)
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns an error if the port is zero or the formulation thresholds are invalid
    pub fn validate(&self) -> Result<()> {
        if self.http_port == 0 {
            return Err(anyhow!("HTTP_PORT cannot be 0"));
        }
        self.formulation
            .validate()
            .context("Invalid formulation configuration")?;
        Ok(())
    }

    /// Summary of the configuration for logging
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Kibble Formulation Server Configuration:\n\
             - HTTP Port: {}\n\
             - Environment: {}\n\
             - Database: {}\n\
             - Auto Migrate: {}\n\
             - CORS Origins: {}\n\
             - Total DM: {} g\n\
             - Protein Band: {}-{}%\n\
             - Fiber Band: {}-{}%",
            self.http_port,
            self.environment,
            self.database.url,
            self.database.auto_migrate,
            self.cors.allowed_origins,
            self.formulation.total_dm_g,
            self.formulation.protein.min_percent,
            self.formulation.protein.max_percent,
            self.formulation.fiber.min_percent,
            self.formulation.fiber.max_percent,
        )
    }
}

/// Get environment variable or default value
fn env_var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}

/// Replace `target` with the parsed value of `key` when it is set
fn apply_override(key: &str, target: &mut f64) -> Result<()> {
    if let Ok(raw) = env::var(key) {
        *target = raw
            .trim()
            .parse()
            .with_context(|| format!("Invalid {key} value: {raw}"))?;
    }
    Ok(())
}

/// Parse comma-separated CORS origins
#[must_use]
pub fn parse_origins(origins_str: &str) -> Vec<String> {
    if origins_str.trim() == "*" {
        vec!["*".to_owned()]
    } else {
        origins_str
            .split(',')
            .map(|s| s.trim().to_owned())
            .filter(|s| !s.is_empty())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_origins() {
        assert_eq!(parse_origins("*"), vec!["*"]);
        assert_eq!(
            parse_origins("http://localhost:3000, http://localhost:3001,"),
            vec!["http://localhost:3000", "http://localhost:3001"]
        );
    }

    #[test]
    fn test_environment_parsing() {
        assert_eq!(Environment::from_str_or_default("prod"), Environment::Production);
        assert_eq!(Environment::from_str_or_default("TEST"), Environment::Testing);
        assert_eq!(Environment::from_str_or_default("staging"), Environment::Development);
    }

    #[test]
    fn test_database_url_parsing() {
        assert_eq!(DatabaseUrl::parse_url("sqlite::memory:"), DatabaseUrl::Memory);
        assert_eq!(
            DatabaseUrl::parse_url("sqlite:./data/kibble.db").to_connection_string(),
            "sqlite:./data/kibble.db"
        );
        assert_eq!(
            DatabaseUrl::parse_url("/tmp/catalog.db"),
            DatabaseUrl::SQLite {
                path: PathBuf::from("/tmp/catalog.db")
            }
        );
    }

    #[test]
    fn test_default_config_validates() {
        assert!(ServerConfig::default().validate().is_ok());
    }
}
