//! Signup form state and submission.

use crate::api::RegistrationApi;
use registration_validator::{validate_form, Field, FormFields, ValidationErrors};
use std::time::Duration;
use tracing::{debug, warn};

/// Shown when the proxy replies without an error message.
pub const FALLBACK_ERROR: &str = "Registration failed";

/// Shown when the proxy could not be reached.
pub const NETWORK_ERROR: &str = "Network error. Please try again.";

/// Where to send the user after a successful signup, and when.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    pub target: String,
    pub after: Duration,
}

impl Default for Redirect {
    fn default() -> Self {
        Self {
            target: "/login".into(),
            after: Duration::from_secs(2),
        }
    }
}

/// Result of one submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Client-side validation failed; nothing was sent.
    Invalid,
    /// The account exists; navigate once `redirect.after` has passed.
    Registered { username: String, redirect: Redirect },
    /// The request failed; the message is shown as a banner.
    Failed(String),
}

/// The signup form: four fields, per-field errors, a banner, and the
/// loading and success flags.
pub struct RegisterForm<A> {
    api: A,
    redirect: Redirect,
    fields: FormFields,
    errors: ValidationErrors,
    api_error: Option<String>,
    loading: bool,
    success: bool,
}

impl<A: RegistrationApi> RegisterForm<A> {
    pub fn new(api: A, redirect: Redirect) -> Self {
        Self {
            api,
            redirect,
            fields: FormFields::default(),
            errors: ValidationErrors::new(),
            api_error: None,
            loading: false,
            success: false,
        }
    }

    /// Update one field. Only that field's error is cleared; nothing is
    /// re-validated.
    pub fn set_field(&mut self, field: Field, value: impl Into<String>) {
        self.fields.set(field, value);
        self.errors.clear(field);
    }

    /// Validate and, if valid, send the signup to the proxy.
    pub async fn submit(&mut self) -> SubmitOutcome {
        self.api_error = None;

        self.errors = validate_form(&self.fields);
        if !self.errors.is_empty() {
            debug!(errors = self.errors.len(), "Form has validation errors");
            return SubmitOutcome::Invalid;
        }

        self.loading = true;
        let result = self.api.register(&self.fields.to_request()).await;
        self.loading = false;

        match result {
            Ok(reply) if reply.success => {
                self.success = true;
                let username = reply
                    .username
                    .unwrap_or_else(|| self.fields.username.clone());
                SubmitOutcome::Registered {
                    username,
                    redirect: self.redirect.clone(),
                }
            }
            Ok(reply) => {
                let message = reply.error.unwrap_or_else(|| FALLBACK_ERROR.to_string());
                self.api_error = Some(message.clone());
                SubmitOutcome::Failed(message)
            }
            Err(e) => {
                warn!(error = %e, "Registration error");
                self.api_error = Some(NETWORK_ERROR.to_string());
                SubmitOutcome::Failed(NETWORK_ERROR.to_string())
            }
        }
    }

    pub fn fields(&self) -> &FormFields {
        &self.fields
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    /// Request-level error banner, if any.
    pub fn api_error(&self) -> Option<&str> {
        self.api_error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn redirect(&self) -> &Redirect {
        &self.redirect
    }
}
