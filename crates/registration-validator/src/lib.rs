//! Signup field rules shared by the registration proxy and the signup form.
//!
//! The proxy re-applies these rules server-side with [`validate_registration`],
//! stopping at the first violation. The form runs [`validate_form`], which
//! collects every violation so each field can show its own message.

mod error;
mod rules;

pub use error::{Field, ValidationError, ValidationErrors};
pub use rules::{
    validate_email, validate_form, validate_password, validate_registration, validate_username,
    MAX_USERNAME_LEN, MIN_PASSWORD_LEN, MIN_USERNAME_LEN,
};

use std::fmt;

/// A signup request as accepted by the proxy.
#[derive(Clone, PartialEq, Eq)]
pub struct RegistrationRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl RegistrationRequest {
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for RegistrationRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistrationRequest")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Raw values typed into the signup form.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct FormFields {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl FormFields {
    /// Current value of a field.
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Username => &self.username,
            Field::Email => &self.email,
            Field::Password => &self.password,
            Field::ConfirmPassword => &self.confirm_password,
        }
    }

    /// Replace the value of a field.
    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let value = value.into();
        match field {
            Field::Username => self.username = value,
            Field::Email => self.email = value,
            Field::Password => self.password = value,
            Field::ConfirmPassword => self.confirm_password = value,
        }
    }

    /// The subset of fields sent to the proxy.
    pub fn to_request(&self) -> RegistrationRequest {
        RegistrationRequest::new(&self.username, &self.email, &self.password)
    }
}

impl fmt::Debug for FormFields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormFields")
            .field("username", &self.username)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_password() {
        let request = RegistrationRequest::new("alice", "alice@example.com", "hunter2hunter2");
        let debug = format!("{:?}", request);

        assert!(debug.contains("alice@example.com"));
        assert!(!debug.contains("hunter2hunter2"));

        let mut fields = FormFields::default();
        fields.set(Field::Password, "hunter2hunter2");
        assert!(!format!("{:?}", fields).contains("hunter2hunter2"));
    }

    #[test]
    fn test_form_fields_to_request() {
        let mut fields = FormFields::default();
        fields.set(Field::Username, "alice");
        fields.set(Field::Email, "alice@example.com");
        fields.set(Field::Password, "longenough1");
        fields.set(Field::ConfirmPassword, "different");

        let request = fields.to_request();
        assert_eq!(request.username, "alice");
        assert_eq!(request.password, "longenough1");
        assert_eq!(fields.get(Field::ConfirmPassword), "different");
    }
}
