//! Application configuration.

use serde::Deserialize;
use std::path::Path;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Redis configuration.
    pub redis: RedisConfig,
    /// Workflow engine configuration.
    #[serde(default)]
    pub workflow: WorkflowConfig,
}

/// Database connection configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// `PostgreSQL` connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

/// Redis configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct RedisConfig {
    /// Redis connection URL.
    pub url: String,
    /// Key prefix for all Redis keys.
    #[serde(default = "default_redis_prefix")]
    pub prefix: String,
}

/// Workflow engine configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct WorkflowConfig {
    /// TTL for idempotency cache entries, in seconds.
    #[serde(default = "default_idempotency_ttl_secs")]
    pub idempotency_ttl_secs: i64,
    /// Prefix for generated invoice numbers.
    #[serde(default = "default_invoice_prefix")]
    pub invoice_prefix: String,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            idempotency_ttl_secs: default_idempotency_ttl_secs(),
            invoice_prefix: default_invoice_prefix(),
        }
    }
}

const fn default_max_connections() -> u32 {
    100
}

const fn default_min_connections() -> u32 {
    5
}

fn default_redis_prefix() -> String {
    "campus".to_string()
}

const fn default_idempotency_ttl_secs() -> i64 {
    3600
}

fn default_invoice_prefix() -> String {
    "INV".to_string()
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Configuration is loaded in the following order:
    /// 1. `config/default.toml`
    /// 2. `config/{environment}.toml` (based on `CAMPUS_ENV`)
    /// 3. Environment variables with `CAMPUS_` prefix
    pub fn load() -> Result<Self, config::ConfigError> {
        let env = std::env::var("CAMPUS_ENV").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("CAMPUS")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Load configuration from a specific file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .add_source(
                config::Environment::with_prefix("CAMPUS")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn workflow_config_defaults() {
        let config = WorkflowConfig::default();
        assert_eq!(config.idempotency_ttl_secs, 3600);
        assert_eq!(config.invoice_prefix, "INV");
    }
}
