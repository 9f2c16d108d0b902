//! HTTP API for the registration proxy.

mod handlers;
mod middleware;
mod types;

pub use handlers::*;
pub use middleware::{client_key, rate_limit_middleware, RateLimitState, UNKNOWN_CLIENT};
pub use types::*;

use crate::navidrome::{AdminAuthenticator, NavidromeClient};
use axum::{
    http::{header, HeaderValue, Method},
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Navidrome client used for user creation
    pub navidrome: Arc<NavidromeClient>,
    /// Admin login
    pub authenticator: Arc<AdminAuthenticator>,
}

impl AppState {
    /// Create new application state.
    pub fn new(navidrome: NavidromeClient, authenticator: AdminAuthenticator) -> Self {
        Self {
            navidrome: Arc::new(navidrome),
            authenticator: Arc::new(authenticator),
        }
    }
}

/// Build the CORS layer for the configured frontend origin.
///
/// `*` allows any origin.
pub fn cors_layer(origin: &str) -> Result<CorsLayer, header::InvalidHeaderValue> {
    let allow_origin = if origin.trim() == "*" {
        AllowOrigin::from(Any)
    } else {
        AllowOrigin::exact(HeaderValue::from_str(origin.trim())?)
    };

    Ok(CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]))
}

/// Create the API router.
///
/// Only the registration route is rate limited.
pub fn create_router(state: AppState, rate_limit: RateLimitState, cors: CorsLayer) -> Router {
    Router::new()
        .route("/api/health", get(handlers::health))
        .route(
            "/api/register",
            post(handlers::register).layer(axum_middleware::from_fn_with_state(
                rate_limit,
                rate_limit_middleware,
            )),
        )
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cors_layer_origins() {
        assert!(cors_layer("*").is_ok());
        assert!(cors_layer("https://music.example.com").is_ok());
        assert!(cors_layer("bad\norigin").is_err());
    }
}
