//! Validation error types.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// A signup form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    Username,
    Email,
    Password,
    ConfirmPassword,
}

impl Field {
    /// All fields in display order.
    pub const ALL: [Field; 4] = [
        Field::Username,
        Field::Email,
        Field::Password,
        Field::ConfirmPassword,
    ];

    /// Wire name of the field.
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Username => "username",
            Field::Email => "email",
            Field::Password => "password",
            Field::ConfirmPassword => "confirmPassword",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A violated signup rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Username, password, and email are required")]
    MissingFields,

    #[error("Username is required")]
    UsernameRequired,

    #[error("Username must be 3-20 characters (letters, numbers, underscore, hyphen only)")]
    InvalidUsername,

    /// Form-side wording of [`ValidationError::InvalidUsername`].
    #[error("Username must be 3-20 characters (letters, numbers, _, -)")]
    UsernameFormat,

    #[error("Password is required")]
    PasswordRequired,

    #[error("Password must be at least 8 characters")]
    PasswordTooShort,

    #[error("Email is required")]
    EmailRequired,

    #[error("Invalid email format")]
    InvalidEmail,

    #[error("Passwords do not match")]
    PasswordMismatch,
}

impl ValidationError {
    /// The field this rule belongs to, if it names exactly one.
    pub fn field(&self) -> Option<Field> {
        match self {
            ValidationError::MissingFields => None,
            ValidationError::UsernameRequired
            | ValidationError::InvalidUsername
            | ValidationError::UsernameFormat => Some(Field::Username),
            ValidationError::PasswordRequired | ValidationError::PasswordTooShort => {
                Some(Field::Password)
            }
            ValidationError::EmailRequired | ValidationError::InvalidEmail => Some(Field::Email),
            ValidationError::PasswordMismatch => Some(Field::ConfirmPassword),
        }
    }
}

/// Per-field error messages. Empty means the input is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    errors: BTreeMap<Field, String>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the message for a field, replacing any earlier one.
    pub fn insert(&mut self, field: Field, message: impl Into<String>) {
        self.errors.insert(field, message.into());
    }

    /// Record a rule violation against its own field.
    pub fn push(&mut self, error: ValidationError) {
        if let Some(field) = error.field() {
            self.insert(field, error.to_string());
        }
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    /// Drop the message for one field, leaving the others untouched.
    pub fn clear(&mut self, field: Field) -> bool {
        self.errors.remove(&field).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.errors.iter().map(|(field, message)| (*field, message.as_str()))
    }
}
