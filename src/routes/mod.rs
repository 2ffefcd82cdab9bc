//! HTTP routing
//!
//! Every resource router is nested under `/api`. Stored files are served
//! from the storage directory at `/files`.

pub mod auth_routes;
pub mod company_routes;
pub mod employee_routes;
pub mod report_routes;
pub mod template_routes;
pub mod visitor_routes;

use axum::{middleware, response::Json, routing::get, Router};
use serde_json::{json, Value};
use tower_http::{compression::CompressionLayer, services::ServeDir, trace::TraceLayer};

use crate::middleware::{cors::cors_middleware_with_origins, rate_limit::rate_limit_middleware};
use crate::state::AppState;

pub fn create_api_router(state: AppState) -> Router<AppState> {
    Router::new()
        .nest("/auth", auth_routes::create_auth_router(state.clone()))
        .nest("/visitors", visitor_routes::create_visitor_router(state.clone()))
        .nest("/employees", employee_routes::create_employee_router(state.clone()))
        .nest("/templates", template_routes::create_template_router(state.clone()))
        .nest("/companies", company_routes::create_company_router(state.clone()))
        .nest("/reports", report_routes::create_report_router(state))
}

/// Full application: API, health check, static files and the global layers.
pub fn create_app_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/api", create_api_router(state.clone()))
        .nest_service("/files", ServeDir::new(&state.config.storage_dir))
        .layer(middleware::from_fn_with_state(
            state.rate_limit.clone(),
            rate_limit_middleware,
        ))
        .layer(cors_middleware_with_origins(&state.config.cors_origins))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({
        "success": true,
        "status": "ok",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
