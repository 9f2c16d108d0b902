//! Navidrome REST client for the two calls a registration needs.

use super::types::{AdminToken, LoginRequest, LoginResponse, NewUser};
use crate::error::{ProxyError, UpstreamError};
use reqwest::{Client, Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Navidrome admin API client.
#[derive(Clone)]
pub struct NavidromeClient {
    client: Client,
    base_url: String,
}

impl NavidromeClient {
    /// Create a new Navidrome client. Every call is bounded by `timeout`.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ProxyError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProxyError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        let base_url = base_url.into().trim_end_matches('/').to_string();

        Ok(Self { client, base_url })
    }

    /// Base URL the client talks to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Log in and return the session token.
    #[instrument(skip(self, password))]
    pub async fn login(
        &self,
        username: &str,
        password: &SecretString,
    ) -> Result<AdminToken, UpstreamError> {
        let url = format!("{}/auth/login", self.base_url);

        let body = LoginRequest {
            username,
            password: password.expose_secret(),
        };

        let response = self.client.post(&url).json(&body).send().await?;

        if !response.status().is_success() {
            return Err(Self::status_error(response, "Navidrome login failed").await);
        }

        let login: LoginResponse = response.json().await?;

        match login.token {
            Some(token) if !token.is_empty() => {
                debug!("Navidrome login succeeded");
                Ok(AdminToken::new(token))
            }
            _ => {
                warn!("Navidrome login response had no token");
                Err(UpstreamError::MissingToken)
            }
        }
    }

    /// Create a non-admin user.
    ///
    /// Only 200 and 201 count as created.
    #[instrument(skip(self, token, user), fields(username = %user.user_name))]
    pub async fn create_user(&self, token: &AdminToken, user: &NewUser) -> Result<(), UpstreamError> {
        let url = format!("{}/api/user", self.base_url);

        let response = self
            .client
            .post(&url)
            .header("X-ND-Authorization", token.bearer())
            .json(user)
            .send()
            .await?;

        let status = response.status();

        if status == StatusCode::OK || status == StatusCode::CREATED {
            debug!(%status, "User created");
            return Ok(());
        }

        if status.is_success() {
            warn!(%status, "Navidrome returned success without creating the user");
            return Err(UpstreamError::NotCreated {
                status: status.as_u16(),
            });
        }

        if status == StatusCode::CONFLICT {
            debug!("Username already taken upstream");
            return Err(UpstreamError::Conflict);
        }

        Err(Self::status_error(response, "Navidrome user creation failed").await)
    }

    /// Classify a non-success response, logging its body.
    async fn status_error(response: Response, context: &'static str) -> UpstreamError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        warn!(status = %status, body = %body, "{}", context);

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => UpstreamError::Unauthorized {
                status: status.as_u16(),
            },
            _ => UpstreamError::Status {
                status: status.as_u16(),
                body,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use registration_validator::RegistrationRequest;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn create_test_client(mock_server: &MockServer) -> NavidromeClient {
        NavidromeClient::new(mock_server.uri(), Duration::from_secs(5)).unwrap()
    }

    fn new_user() -> NewUser {
        NewUser::from(&RegistrationRequest::new(
            "alice",
            "alice@example.com",
            "longenough1",
        ))
    }

    #[test]
    fn test_client_creation_trims_slash() {
        let client = NavidromeClient::new("http://navidrome:4533/", Duration::from_secs(1)).unwrap();
        assert_eq!(client.base_url(), "http://navidrome:4533");
    }

    #[tokio::test]
    async fn test_login_success() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .and(body_json(serde_json::json!({
                "username": "admin",
                "password": "admin-pass"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "1",
                "name": "Admin",
                "username": "admin",
                "isAdmin": true,
                "token": "tok-123"
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = create_test_client(&mock_server);
        let token = client
            .login("admin", &SecretString::new("admin-pass".into()))
            .await
            .unwrap();

        assert_eq!(token.bearer(), "Bearer tok-123");
    }

    #[tokio::test]
    async fn test_login_unauthorized() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .respond_with(ResponseTemplate::new(401).set_body_string("Invalid username or password"))
            .mount(&mock_server)
            .await;

        let client = create_test_client(&mock_server);
        let result = client
            .login("admin", &SecretString::new("wrong-pass".into()))
            .await;

        let err = result.unwrap_err();
        assert!(matches!(err, UpstreamError::Unauthorized { status: 401 }));
        assert!(!err.to_string().contains("wrong-pass"));
    }

    #[tokio::test]
    async fn test_login_missing_token() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .mount(&mock_server)
            .await;

        let client = create_test_client(&mock_server);
        let result = client
            .login("admin", &SecretString::new("admin-pass".into()))
            .await;

        assert!(matches!(result, Err(UpstreamError::MissingToken)));
    }

    #[tokio::test]
    async fn test_create_user_sends_bearer_header() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/user"))
            .and(header("X-ND-Authorization", "Bearer tok-123"))
            .and(body_json(serde_json::json!({
                "userName": "alice",
                "name": "alice",
                "email": "alice@example.com",
                "password": "longenough1",
                "isAdmin": false
            })))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = create_test_client(&mock_server);
        let result = client
            .create_user(&AdminToken::new("tok-123"), &new_user())
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_create_user_status_mapping() {
        let cases = [
            (409, "conflict"),
            (403, "unauthorized"),
            (204, "not_created"),
            (500, "status"),
        ];

        for (code, expected) in cases {
            let mock_server = MockServer::start().await;

            Mock::given(method("POST"))
                .and(path("/api/user"))
                .respond_with(ResponseTemplate::new(code))
                .mount(&mock_server)
                .await;

            let client = create_test_client(&mock_server);
            let err = client
                .create_user(&AdminToken::new("tok"), &new_user())
                .await
                .unwrap_err();

            let actual = match err {
                UpstreamError::Conflict => "conflict",
                UpstreamError::Unauthorized { .. } => "unauthorized",
                UpstreamError::NotCreated { .. } => "not_created",
                UpstreamError::Status { .. } => "status",
                _ => "other",
            };
            assert_eq!(actual, expected, "status {code}");
        }
    }
}
