//! Shared application state
//!
//! Cloned into every handler by axum; everything inside is behind `Arc`.

use std::sync::Arc;

use crate::config::environment::EnvironmentConfig;
use crate::middleware::rate_limit::RateLimitState;
use crate::repositories::Repositories;
use crate::services::storage::{FileStorage, MemoryFileStorage};
use crate::utils::jwt::JwtConfig;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<EnvironmentConfig>,
    pub repos: Repositories,
    pub storage: Arc<dyn FileStorage>,
    pub rate_limit: RateLimitState,
}

impl AppState {
    pub fn new(config: EnvironmentConfig, repos: Repositories, storage: Arc<dyn FileStorage>) -> Self {
        let rate_limit = RateLimitState::new(&config);
        Self {
            config: Arc::new(config),
            repos,
            storage,
            rate_limit,
        }
    }

    /// In-memory repositories and storage with test settings
    pub fn in_memory() -> Self {
        let config = EnvironmentConfig::for_tests();
        let storage = Arc::new(MemoryFileStorage::new(config.public_files_url.clone()));
        Self::new(config, Repositories::in_memory(), storage)
    }

    pub fn jwt_config(&self) -> JwtConfig {
        JwtConfig::from(self.config.as_ref())
    }
}
