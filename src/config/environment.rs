//! Environment configuration
//!
//! Everything the service needs is read from environment variables (a `.env`
//! file is honoured for local development).

use std::env;
use std::path::PathBuf;

use uuid::Uuid;

/// Configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Runtime configuration
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub port: u16,
    pub host: String,
    pub database_url: String,
    pub db_max_connections: u32,
    pub jwt_secret: String,
    /// Token lifetime in seconds.
    pub jwt_expiration: u64,
    pub cors_origins: Vec<String>,
    pub rate_limit_requests: u32,
    /// Rate limit window in seconds.
    pub rate_limit_window: u64,
    /// Key rate limits on `X-Forwarded-For` (set when behind a reverse proxy).
    pub trust_proxy: bool,
    pub bcrypt_cost: u32,
    /// Company used by the public visitor kiosk when no company is given.
    pub default_company_id: Option<Uuid>,
    /// Initial password for accounts provisioned on conversion.
    pub default_employee_password: String,
    pub storage_dir: PathBuf,
    pub public_files_url: String,
    pub run_migrations: bool,
}

impl EnvironmentConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            environment: var_or("ENVIRONMENT", "development"),
            port: parse_or("PORT", 5000)?,
            host: var_or("HOST", "0.0.0.0"),
            database_url: required("DATABASE_URL")?,
            db_max_connections: parse_or("DB_MAX_CONNECTIONS", 10)?,
            jwt_secret: required("JWT_SECRET")?,
            jwt_expiration: parse_or("JWT_EXPIRATION", 7 * 24 * 3600)?,
            cors_origins: env::var("CORS_ORIGINS")
                .map(|v| {
                    v.split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
            rate_limit_requests: parse_or("RATE_LIMIT_REQUESTS", 100)?,
            rate_limit_window: parse_or("RATE_LIMIT_WINDOW", 15 * 60)?,
            trust_proxy: parse_or("TRUST_PROXY", false)?,
            bcrypt_cost: parse_or("BCRYPT_COST", bcrypt::DEFAULT_COST)?,
            default_company_id: match env::var("DEFAULT_COMPANY_ID") {
                Ok(raw) if !raw.trim().is_empty() => Some(
                    Uuid::parse_str(raw.trim()).map_err(|e| {
                        ConfigError::InvalidValue("DEFAULT_COMPANY_ID".into(), e.to_string())
                    })?,
                ),
                _ => None,
            },
            default_employee_password: required("DEFAULT_EMPLOYEE_PASSWORD")?,
            storage_dir: PathBuf::from(var_or("STORAGE_DIR", "./storage")),
            public_files_url: var_or("PUBLIC_FILES_URL", "/files"),
            run_migrations: parse_or("RUN_MIGRATIONS", true)?,
        })
    }

    /// Configuration for tests: no database, cheap hashing, generous limits.
    pub fn for_tests() -> Self {
        Self {
            environment: "test".to_string(),
            port: 0,
            host: "127.0.0.1".to_string(),
            database_url: String::new(),
            db_max_connections: 1,
            jwt_secret: "test-secret".to_string(),
            jwt_expiration: 3600,
            cors_origins: Vec::new(),
            rate_limit_requests: 10_000,
            rate_limit_window: 60,
            trust_proxy: false,
            bcrypt_cost: 4,
            default_company_id: None,
            default_employee_password: "Welcome@2024".to_string(),
            storage_dir: env::temp_dir().join("hr_admin_test_storage"),
            public_files_url: "/files".to_string(),
            run_migrations: false,
        }
    }

    /// True when running in development mode
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// True when running in production mode
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// `host:port` the server binds to
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn required(name: &str) -> Result<String, ConfigError> {
    env::var(name).map_err(|_| ConfigError::MissingVar(name.to_string()))
}

fn var_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn parse_or<T>(name: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e: T::Err| ConfigError::InvalidValue(name.to_string(), e.to_string())),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_or_uses_default_when_unset() {
        let value: u32 = parse_or("HR_ADMIN_SURELY_UNSET_VAR", 42).unwrap();
        assert_eq!(value, 42);
    }

    #[test]
    fn test_server_url() {
        let mut config = EnvironmentConfig::for_tests();
        config.host = "0.0.0.0".into();
        config.port = 5000;
        assert_eq!(config.server_url(), "0.0.0.0:5000");
        assert!(!config.is_development());
        assert!(!config.is_production());
    }
}
