//! Signup form for the Navidrome registration proxy.
//!
//! Validates input with the same rules as the proxy before sending anything,
//! then posts the signup and reports either inline field errors or a single
//! request-level banner.

pub mod api;
pub mod config;
mod error;
pub mod form;
pub mod view;

pub use api::{ApiReply, HttpRegistrationApi, RegistrationApi};
pub use config::FormConfig;
pub use error::FormError;
pub use form::{Redirect, RegisterForm, SubmitOutcome};
pub use registration_validator::Field;
