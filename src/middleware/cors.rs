//! CORS layer
//!
//! Configured origins only; with none configured every origin is allowed,
//! which is meant for local development.

use axum::http::{header, HeaderValue, Method};
use tower_http::cors::{Any, CorsLayer};

/// Permissive layer for development
pub fn cors_middleware() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Layer restricted to the given origins
pub fn cors_middleware_with_origins(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return cors_middleware();
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .allow_credentials(true)
        .max_age(std::time::Duration::from_secs(3600))
}
