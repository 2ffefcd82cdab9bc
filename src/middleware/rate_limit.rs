//! Rate limiting middleware
//!
//! Fixed window per client, keyed by the peer address. The first
//! `X-Forwarded-For` address is used instead only behind a trusted proxy.

use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::Response,
};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::warn;

use crate::config::EnvironmentConfig;
use crate::utils::errors::AppError;

/// Requests seen from one client in the current window
#[derive(Debug, Clone)]
struct RateLimitInfo {
    requests: u32,
    window_start: Instant,
}

/// Per-client counters shared by every request
#[derive(Clone)]
pub struct RateLimitState {
    requests: Arc<RwLock<HashMap<String, RateLimitInfo>>>,
    max_requests: u32,
    window_duration: Duration,
    trust_proxy: bool,
}

impl RateLimitState {
    pub fn new(config: &EnvironmentConfig) -> Self {
        Self::with_limits(config.rate_limit_requests, Duration::from_secs(config.rate_limit_window))
            .trusting_proxy(config.trust_proxy)
    }

    pub fn with_limits(max_requests: u32, window_duration: Duration) -> Self {
        Self {
            requests: Arc::new(RwLock::new(HashMap::new())),
            max_requests,
            window_duration,
            trust_proxy: false,
        }
    }

    pub fn trusting_proxy(mut self, trust_proxy: bool) -> Self {
        self.trust_proxy = trust_proxy;
        self
    }

    /// Count a request from `client`, failing once the window is full.
    pub async fn check_rate_limit(&self, client: &str) -> Result<(), AppError> {
        let mut requests = self.requests.write().await;
        let now = Instant::now();

        // Drop expired windows
        requests.retain(|_, info| now.duration_since(info.window_start) < self.window_duration);

        let info = requests.entry(client.to_string()).or_insert(RateLimitInfo {
            requests: 0,
            window_start: now,
        });

        if info.requests >= self.max_requests {
            return Err(AppError::RateLimitExceeded);
        }

        info.requests += 1;
        Ok(())
    }
}

fn forwarded_for(request: &Request) -> Option<String> {
    request
        .headers()
        .get("x-forwarded-for")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.split(',').next())
        .map(|ip| ip.trim().to_string())
        .filter(|ip| !ip.is_empty())
}

fn client_key(request: &Request, trust_proxy: bool) -> String {
    let forwarded = if trust_proxy { forwarded_for(request) } else { None };
    forwarded
        .or_else(|| {
            request
                .extensions()
                .get::<ConnectInfo<SocketAddr>>()
                .map(|ConnectInfo(addr)| addr.ip().to_string())
        })
        .unwrap_or_else(|| "unknown".to_string())
}

pub async fn rate_limit_middleware(
    State(rate_limit_state): State<RateLimitState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let client = client_key(&request, rate_limit_state.trust_proxy);

    if let Err(e) = rate_limit_state.check_rate_limit(&client).await {
        warn!("🚫 Rate limit exceeded for {}", client);
        return Err(e);
    }

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::StatusCode, middleware, routing::get, Router};
    use tower::ServiceExt;

    fn limited_app(state: RateLimitState) -> Router {
        Router::new()
            .route("/health", get(|| async { "ok" }))
            .layer(middleware::from_fn_with_state(state, rate_limit_middleware))
    }

    fn request_from(ip: [u8; 4], forwarded: Option<&str>) -> Request {
        let mut builder = axum::http::Request::builder().uri("/health");
        if let Some(value) = forwarded {
            builder = builder.header("x-forwarded-for", value);
        }
        let mut request = builder.body(Body::empty()).unwrap();
        request
            .extensions_mut()
            .insert(ConnectInfo(SocketAddr::from((ip, 40000))));
        request
    }

    async fn status_of(app: &Router, request: Request) -> StatusCode {
        app.clone().oneshot(request).await.unwrap().status()
    }

    #[tokio::test]
    async fn test_peers_have_separate_windows() {
        let app = limited_app(RateLimitState::with_limits(1, Duration::from_secs(60)));

        assert_eq!(status_of(&app, request_from([10, 0, 0, 1], None)).await, StatusCode::OK);
        assert_eq!(status_of(&app, request_from([10, 0, 0, 2], None)).await, StatusCode::OK);
        assert_eq!(
            status_of(&app, request_from([10, 0, 0, 1], None)).await,
            StatusCode::TOO_MANY_REQUESTS
        );
    }

    #[tokio::test]
    async fn test_forwarded_header_ignored_without_trusted_proxy() {
        let app = limited_app(RateLimitState::with_limits(1, Duration::from_secs(60)));

        assert_eq!(
            status_of(&app, request_from([10, 0, 0, 1], Some("1.1.1.1"))).await,
            StatusCode::OK
        );
        assert_eq!(
            status_of(&app, request_from([10, 0, 0, 1], Some("2.2.2.2"))).await,
            StatusCode::TOO_MANY_REQUESTS
        );
    }

    #[tokio::test]
    async fn test_forwarded_header_used_behind_trusted_proxy() {
        let app = limited_app(RateLimitState::with_limits(1, Duration::from_secs(60)).trusting_proxy(true));

        assert_eq!(
            status_of(&app, request_from([10, 0, 0, 9], Some("1.1.1.1, 10.0.0.9"))).await,
            StatusCode::OK
        );
        assert_eq!(
            status_of(&app, request_from([10, 0, 0, 9], Some("2.2.2.2"))).await,
            StatusCode::OK
        );
        assert_eq!(
            status_of(&app, request_from([10, 0, 0, 9], Some("1.1.1.1"))).await,
            StatusCode::TOO_MANY_REQUESTS
        );
    }

    #[tokio::test]
    async fn test_blocks_after_limit_per_client() {
        let state = RateLimitState::with_limits(2, Duration::from_secs(60));
        assert!(state.check_rate_limit("10.0.0.1").await.is_ok());
        assert!(state.check_rate_limit("10.0.0.1").await.is_ok());
        assert!(matches!(
            state.check_rate_limit("10.0.0.1").await,
            Err(AppError::RateLimitExceeded)
        ));
        assert!(state.check_rate_limit("10.0.0.2").await.is_ok());
    }

    #[tokio::test]
    async fn test_window_resets() {
        let state = RateLimitState::with_limits(1, Duration::from_millis(20));
        assert!(state.check_rate_limit("c").await.is_ok());
        assert!(state.check_rate_limit("c").await.is_err());
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert!(state.check_rate_limit("c").await.is_ok());
    }
}
