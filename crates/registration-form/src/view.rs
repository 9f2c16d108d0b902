//! Text rendering of the form.

use crate::api::RegistrationApi;
use crate::form::RegisterForm;
use registration_validator::Field;
use std::fmt::Write;

fn label(field: Field) -> &'static str {
    match field {
        Field::Username => "Username",
        Field::Email => "Email",
        Field::Password => "Password",
        Field::ConfirmPassword => "Confirm Password",
    }
}

fn placeholder(field: Field) -> &'static str {
    match field {
        Field::Username => "Choose a username",
        Field::Email => "your@email.com",
        Field::Password => "At least 8 characters",
        Field::ConfirmPassword => "Re-enter your password",
    }
}

fn is_secret(field: Field) -> bool {
    matches!(field, Field::Password | Field::ConfirmPassword)
}

/// Prompt text for one field.
pub fn prompt(field: Field) -> String {
    format!("{} ({}): ", label(field), placeholder(field))
}

/// Render the whole form, or the confirmation once registered.
pub fn render<A: RegistrationApi>(form: &RegisterForm<A>) -> String {
    let mut out = String::new();

    if form.is_success() {
        let _ = writeln!(out, "Registration Successful!");
        let _ = writeln!(out, "Your account has been created. Redirecting to login...");
        return out;
    }

    let _ = writeln!(out, "Create Your Account");
    let _ = writeln!(out, "Join to start streaming your music");

    if let Some(banner) = form.api_error() {
        let _ = writeln!(out, "\n! {}", banner);
    }

    let _ = writeln!(out);
    for field in Field::ALL {
        let value = form.fields().get(field);
        let shown = if is_secret(field) {
            "*".repeat(value.chars().count())
        } else {
            value.to_string()
        };
        let _ = writeln!(out, "{:>16}: {}", label(field), shown);

        if let Some(message) = form.errors().get(field) {
            let _ = writeln!(out, "{:>16}  ^ {}", "", message);
        }
    }

    let button = if form.is_loading() {
        "Creating Account..."
    } else {
        "Create Account"
    };
    let _ = writeln!(out, "\n[ {} ]", button);
    let _ = writeln!(
        out,
        "Already have an account? Sign in: {}",
        form.redirect().target
    );

    out
}
