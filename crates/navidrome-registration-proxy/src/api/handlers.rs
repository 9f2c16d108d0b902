//! HTTP request handlers.

use super::types::{HealthResponse, RegisterRequest, RegisterResponse};
use super::AppState;
use crate::error::ProxyError;
use crate::navidrome::NewUser;
use axum::{extract::rejection::JsonRejection, extract::State, Json};
use registration_validator::validate_registration;
use tracing::{info, warn};

/// Health check endpoint. Liveness only; Navidrome is not contacted.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        message: "Registration service running".to_string(),
        navidrome_url: state.navidrome.base_url().to_string(),
    })
}

/// Create a Navidrome user on the caller's behalf.
///
/// Validates the request, logs in as the administrator, then creates a
/// non-admin user. The creation call is only made once a token is in hand.
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<Json<RegisterResponse>, ProxyError> {
    let request = match payload {
        Ok(Json(request)) => request,
        // A non-JSON post carries no fields at all
        Err(JsonRejection::MissingJsonContentType(_)) => RegisterRequest::default(),
        Err(e) => {
            warn!(error = %e, "Unreadable registration body");
            return Err(ProxyError::MalformedBody);
        }
    };

    // Never trust the form's own validation
    let registration = request.into_registration();
    validate_registration(&registration)?;

    info!(username = %registration.username, "Registration request received");

    let token = state
        .authenticator
        .authenticate()
        .await
        .map_err(ProxyError::UpstreamAuth)?;

    state
        .navidrome
        .create_user(&token, &NewUser::from(&registration))
        .await?;

    info!(username = %registration.username, "Navidrome user created");

    Ok(Json(RegisterResponse {
        success: true,
        message: "Account created successfully".to_string(),
        username: registration.username,
    }))
}
