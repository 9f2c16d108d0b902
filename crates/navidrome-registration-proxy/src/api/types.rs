//! API request and response types.

use registration_validator::RegistrationRequest;
use serde::{Deserialize, Serialize};
use std::fmt;

/// `POST /api/register` body. Absent fields are treated as empty.
#[derive(Default, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub username: Option<String>,

    #[serde(default)]
    pub password: Option<String>,

    #[serde(default)]
    pub email: Option<String>,
}

impl RegisterRequest {
    pub fn into_registration(self) -> RegistrationRequest {
        RegistrationRequest::new(
            self.username.unwrap_or_default(),
            self.email.unwrap_or_default(),
            self.password.unwrap_or_default(),
        )
    }
}

impl fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Response after a user was created.
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub success: bool,
    pub message: String,
    pub username: String,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
    #[serde(rename = "navidromeUrl")]
    pub navidrome_url: String,
}
