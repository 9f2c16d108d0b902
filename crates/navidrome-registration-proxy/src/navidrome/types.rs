//! Navidrome wire types.

use registration_validator::RegistrationRequest;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Bearer token proving administrator rights, valid for one registration.
pub struct AdminToken(SecretString);

impl AdminToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(SecretString::new(token.into()))
    }

    /// Value for the `X-ND-Authorization` header.
    pub(crate) fn bearer(&self) -> String {
        format!("Bearer {}", self.0.expose_secret())
    }
}

impl fmt::Debug for AdminToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AdminToken([REDACTED])")
    }
}

/// `POST /auth/login` body.
#[derive(Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// `POST /auth/login` reply. Only the token is used.
#[derive(Deserialize)]
pub(crate) struct LoginResponse {
    #[serde(default)]
    pub token: Option<String>,
}

/// `POST /api/user` body.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub user_name: String,
    pub name: String,
    pub email: String,
    pub password: String,
    /// Always false; the proxy never creates administrators.
    is_admin: bool,
}

impl NewUser {
    pub fn is_admin(&self) -> bool {
        self.is_admin
    }
}

impl From<&RegistrationRequest> for NewUser {
    fn from(request: &RegistrationRequest) -> Self {
        Self {
            user_name: request.username.clone(),
            name: request.username.clone(),
            email: request.email.clone(),
            password: request.password.clone(),
            is_admin: false,
        }
    }
}

impl fmt::Debug for NewUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewUser")
            .field("user_name", &self.user_name)
            .field("email", &self.email)
            .field("is_admin", &self.is_admin)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_shape() {
        let request = RegistrationRequest::new("alice", "alice@example.com", "longenough1");
        let user = NewUser::from(&request);
        let json = serde_json::to_value(&user).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "userName": "alice",
                "name": "alice",
                "email": "alice@example.com",
                "password": "longenough1",
                "isAdmin": false
            })
        );
        assert!(!user.is_admin());
    }

    #[test]
    fn test_token_debug_redacted() {
        let token = AdminToken::new("eyJhbGciOi");
        assert_eq!(format!("{:?}", token), "AdminToken([REDACTED])");
        assert_eq!(token.bearer(), "Bearer eyJhbGciOi");
    }
}
