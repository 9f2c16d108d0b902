//! Administrator login against Navidrome.

use super::{AdminToken, NavidromeClient};
use crate::error::UpstreamError;
use secrecy::SecretString;
use tracing::{instrument, warn};

/// Obtains a fresh admin token from the configured credentials.
///
/// Each call performs exactly one login; tokens are not cached between
/// registrations.
pub struct AdminAuthenticator {
    client: NavidromeClient,
    username: String,
    password: SecretString,
}

impl AdminAuthenticator {
    pub fn new(client: NavidromeClient, username: impl Into<String>, password: SecretString) -> Self {
        Self {
            client,
            username: username.into(),
            password,
        }
    }

    /// Log in as the administrator.
    #[instrument(skip(self), fields(admin = %self.username))]
    pub async fn authenticate(&self) -> Result<AdminToken, UpstreamError> {
        self.client
            .login(&self.username, &self.password)
            .await
            .inspect_err(|e| warn!(error = %e, "Failed to get Navidrome token"))
    }
}
