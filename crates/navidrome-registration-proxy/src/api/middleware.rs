//! Rate limiting middleware.

use crate::error::ProxyError;
use crate::limiter::{Admission, AttemptLimiter};
use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::Response,
};
use governor::{
    clock::{Clock, DefaultClock},
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter,
};
use std::{net::SocketAddr, num::NonZeroU32, sync::Arc, time::Duration};
use tracing::{debug, warn};

/// Global rate limiter (not keyed by client).
pub type GlobalLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Key used when a request carries no client address.
pub const UNKNOWN_CLIENT: &str = "unknown";

/// Rate limiter state shared across requests.
#[derive(Clone)]
pub struct RateLimitState {
    /// Attempts per client per window
    pub per_client: AttemptLimiter,
    /// Flood ceiling across all clients
    pub global: Arc<GlobalLimiter>,
    /// Identify clients by `X-Forwarded-For`
    pub trust_forwarded_for: bool,
}

impl RateLimitState {
    /// Create a new rate limit state with the specified limits.
    pub fn new(max_attempts: u32, window: Duration, global_per_minute: u32) -> Self {
        let quota = Quota::per_minute(NonZeroU32::new(global_per_minute).unwrap_or(NonZeroU32::MIN));

        Self {
            per_client: AttemptLimiter::new(max_attempts, window),
            global: Arc::new(RateLimiter::direct(quota)),
            trust_forwarded_for: false,
        }
    }

    /// Take the client identity from `X-Forwarded-For` when present.
    pub fn trusting_forwarded_for(mut self, trust: bool) -> Self {
        self.trust_forwarded_for = trust;
        self
    }

    /// Create a permissive rate limiter for testing.
    pub fn permissive() -> Self {
        Self::new(1000, Duration::from_secs(60), 1000)
    }
}

/// Identity a request is counted against.
pub fn client_key(request: &Request, trust_forwarded_for: bool) -> String {
    if trust_forwarded_for {
        let forwarded = request
            .headers()
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty());

        if let Some(client) = forwarded {
            return client.to_string();
        }
    }

    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| UNKNOWN_CLIENT.to_string())
}

/// Rate limiting middleware.
///
/// Runs before the body is read. A client whose window is full is turned
/// away first, then the global ceiling is consulted, and only then is the
/// attempt counted against the client. A request refused by either limit is
/// never charged to the client's window.
pub async fn rate_limit_middleware(
    State(rate_limit): State<RateLimitState>,
    request: Request,
    next: Next,
) -> Result<Response, ProxyError> {
    let client = client_key(&request, rate_limit.trust_forwarded_for);

    if let Admission::Rejected { retry_after } = rate_limit.per_client.peek(&client) {
        return Err(client_exhausted(&client, retry_after));
    }

    if let Err(not_until) = rate_limit.global.check() {
        let retry_after = not_until.wait_time_from(DefaultClock::default().now());
        warn!(%client, ?retry_after, "Global rate limit exceeded");
        return Err(ProxyError::RateLimited {
            retry_after: Some(retry_after),
        });
    }

    // A concurrent attempt may have filled the window since the peek
    if let Admission::Rejected { retry_after } = rate_limit.per_client.check(&client) {
        return Err(client_exhausted(&client, retry_after));
    }

    debug!(%client, "Rate limit check passed");
    Ok(next.run(request).await)
}

fn client_exhausted(client: &str, retry_after: Duration) -> ProxyError {
    warn!(%client, ?retry_after, "Registration attempts exceeded for client");
    ProxyError::RateLimited {
        retry_after: Some(retry_after),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    fn request() -> Request {
        axum::http::Request::builder()
            .uri("/api/register")
            .body(Body::empty())
            .unwrap()
    }

    async fn ok() -> &'static str {
        "ok"
    }

    fn limited(state: RateLimitState) -> axum::Router {
        axum::Router::new()
            .route("/api/register", axum::routing::post(ok))
            .layer(axum::middleware::from_fn_with_state(state, rate_limit_middleware))
    }

    fn attempt_from(ip: [u8; 4]) -> Request {
        let mut req = axum::http::Request::builder()
            .method("POST")
            .uri("/api/register")
            .body(Body::empty())
            .unwrap();
        req.extensions_mut()
            .insert(ConnectInfo(SocketAddr::from((ip, 50000))));
        req
    }

    #[tokio::test]
    async fn test_global_rejection_is_not_charged_to_client() {
        use axum::http::StatusCode;
        use tower::ServiceExt;

        let state = RateLimitState::new(5, Duration::from_secs(900), 1);
        let app = limited(state.clone());

        let first = app.clone().oneshot(attempt_from([10, 0, 0, 9])).await.unwrap();
        assert_eq!(first.status(), StatusCode::OK);

        for _ in 0..4 {
            let res = app.clone().oneshot(attempt_from([10, 0, 0, 1])).await.unwrap();
            assert_eq!(res.status(), StatusCode::TOO_MANY_REQUESTS);
        }

        assert_eq!(
            state.per_client.peek("10.0.0.1"),
            Admission::Admitted { remaining: 5 }
        );
        assert_eq!(
            state.per_client.peek("10.0.0.9"),
            Admission::Admitted { remaining: 4 }
        );
    }

    #[tokio::test]
    async fn test_exhausted_client_does_not_drain_global_quota() {
        use axum::http::StatusCode;
        use tower::ServiceExt;

        let state = RateLimitState::new(1, Duration::from_secs(900), 2);
        let app = limited(state);

        let first = app.clone().oneshot(attempt_from([10, 0, 0, 9])).await.unwrap();
        assert_eq!(first.status(), StatusCode::OK);
        for _ in 0..5 {
            let res = app.clone().oneshot(attempt_from([10, 0, 0, 9])).await.unwrap();
            assert_eq!(res.status(), StatusCode::TOO_MANY_REQUESTS);
        }

        // The second global token is still available
        let other = app.oneshot(attempt_from([10, 0, 0, 1])).await.unwrap();
        assert_eq!(other.status(), StatusCode::OK);
    }

    #[test]
    fn test_client_key_from_connect_info() {
        let mut req = request();
        req.extensions_mut()
            .insert(ConnectInfo(SocketAddr::from(([192, 168, 1, 7], 50000))));

        assert_eq!(client_key(&req, false), "192.168.1.7");
    }

    #[test]
    fn test_client_key_forwarded_for() {
        let mut req = request();
        req.headers_mut()
            .insert("x-forwarded-for", "203.0.113.9, 10.0.0.1".parse().unwrap());
        req.extensions_mut()
            .insert(ConnectInfo(SocketAddr::from(([10, 0, 0, 1], 50000))));

        assert_eq!(client_key(&req, true), "203.0.113.9");
        assert_eq!(client_key(&req, false), "10.0.0.1");
    }

    #[test]
    fn test_client_key_unknown() {
        assert_eq!(client_key(&request(), false), UNKNOWN_CLIENT);
    }
}
