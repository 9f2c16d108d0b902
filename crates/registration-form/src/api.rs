//! Client for the proxy's registration endpoint.

use crate::error::FormError;
use async_trait::async_trait;
use registration_validator::RegistrationRequest;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument};

/// Reply body from `POST /api/register`, success or not.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ApiReply {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ApiReply {
    pub fn created(username: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some("Account created successfully".into()),
            username: Some(username.into()),
            error: None,
        }
    }

    pub fn rejected(error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::default()
        }
    }
}

/// Something that can submit a signup.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RegistrationApi: Send + Sync {
    async fn register(&self, request: &RegistrationRequest) -> Result<ApiReply, FormError>;
}

#[derive(Serialize)]
struct RegisterBody<'a> {
    username: &'a str,
    password: &'a str,
    email: &'a str,
}

/// [`RegistrationApi`] over HTTP.
#[derive(Clone)]
pub struct HttpRegistrationApi {
    client: Client,
    endpoint: String,
}

impl HttpRegistrationApi {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, FormError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FormError::Client(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl RegistrationApi for HttpRegistrationApi {
    /// The body is decoded whatever the status; the proxy reports its errors
    /// as JSON alongside 4xx/5xx codes.
    #[instrument(skip(self, request), fields(username = %request.username))]
    async fn register(&self, request: &RegistrationRequest) -> Result<ApiReply, FormError> {
        let body = RegisterBody {
            username: &request.username,
            password: &request.password,
            email: &request.email,
        };

        let response = self.client.post(&self.endpoint).json(&body).send().await?;
        let status = response.status();
        let reply: ApiReply = response.json().await?;

        debug!(%status, success = reply.success, "Registration reply received");
        Ok(reply)
    }
}
