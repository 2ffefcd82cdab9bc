//! Database configuration
//!
//! PostgreSQL pool settings for SQLx.

use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;

use crate::config::environment::EnvironmentConfig;

/// Pool settings
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout: Duration,
    pub idle_timeout: Duration,
    pub max_lifetime: Duration,
}

impl From<&EnvironmentConfig> for DatabaseConfig {
    fn from(config: &EnvironmentConfig) -> Self {
        Self {
            url: config.database_url.clone(),
            max_connections: config.db_max_connections,
            min_connections: 1,
            connect_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(300),
            max_lifetime: Duration::from_secs(3600),
        }
    }
}

impl DatabaseConfig {
    /// Create the connection pool
    pub async fn create_pool(&self) -> Result<PgPool, sqlx::Error> {
        PgPoolOptions::new()
            .max_connections(self.max_connections)
            .min_connections(self.min_connections)
            .acquire_timeout(self.connect_timeout)
            .idle_timeout(self.idle_timeout)
            .max_lifetime(self.max_lifetime)
            .connect(&self.url)
            .await
    }
}
