//! Error types for the registration proxy.

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use registration_validator::ValidationError;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;
use tracing::{error, warn};

/// Failures talking to the Navidrome API.
///
/// Messages carry status codes and response bodies, never credentials.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Navidrome rejected the admin credential (status {status})")]
    Unauthorized { status: u16 },

    #[error("Navidrome reported a conflicting user")]
    Conflict,

    #[error("Navidrome login response did not contain a token")]
    MissingToken,

    #[error("Navidrome accepted the request without creating a user (status {status})")]
    NotCreated { status: u16 },

    #[error("Navidrome API error: {status} - {body}")]
    Status { status: u16, body: String },
}

/// Registration outcome errors, one variant per caller-visible failure class.
#[derive(Debug, Error)]
pub enum ProxyError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Invalid request body")]
    MalformedBody,

    #[error("Rate limit exceeded")]
    RateLimited { retry_after: Option<Duration> },

    #[error("Failed to authenticate with Navidrome: {0}")]
    UpstreamAuth(UpstreamError),

    #[error("Navidrome rejected the admin token during user creation")]
    UpstreamCredentialRejected,

    #[error("Username already exists")]
    DuplicateUser,

    #[error("Navidrome did not create the user")]
    UserNotCreated,

    #[error("Navidrome request failed: {0}")]
    Upstream(UpstreamError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ProxyError {
    /// Status code and caller-facing message.
    ///
    /// Server-side failures get a fixed message; the detail stays in the logs.
    pub fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            ProxyError::Validation(e) => (StatusCode::BAD_REQUEST, e.to_string()),
            ProxyError::MalformedBody => (StatusCode::BAD_REQUEST, self.to_string()),
            ProxyError::RateLimited { .. } => (
                StatusCode::TOO_MANY_REQUESTS,
                "Too many registration attempts. Please try again later.".to_string(),
            ),
            ProxyError::UpstreamAuth(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Cannot connect to Navidrome. Check admin credentials.".to_string(),
            ),
            ProxyError::UpstreamCredentialRejected => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Authentication failed with Navidrome. Check admin credentials.".to_string(),
            ),
            ProxyError::DuplicateUser => (StatusCode::BAD_REQUEST, self.to_string()),
            ProxyError::UserNotCreated => {
                (StatusCode::BAD_REQUEST, "Failed to create user".to_string())
            }
            ProxyError::Upstream(_) | ProxyError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        }
    }
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();

        if status.is_server_error() {
            error!(error = %self, %status, "Registration failed");
        } else {
            warn!(error = %self, %status, "Registration rejected");
        }

        let body = ErrorResponse {
            success: false,
            error: message,
        };

        let mut response = (status, Json(body)).into_response();

        if let ProxyError::RateLimited {
            retry_after: Some(wait),
        } = self
        {
            // Round up so clients never retry a moment too early.
            let secs = wait.as_secs() + u64::from(wait.subsec_nanos() > 0);
            if let Ok(value) = HeaderValue::from_str(&secs.to_string()) {
                response.headers_mut().insert(header::RETRY_AFTER, value);
            }
        }

        response
    }
}

/// Classifies a failed user-creation call.
impl From<UpstreamError> for ProxyError {
    fn from(e: UpstreamError) -> Self {
        match e {
            UpstreamError::Conflict => ProxyError::DuplicateUser,
            UpstreamError::Unauthorized { .. } => ProxyError::UpstreamCredentialRejected,
            UpstreamError::NotCreated { .. } => ProxyError::UserNotCreated,
            other => ProxyError::Upstream(other),
        }
    }
}
