//! Field rules.

use crate::{Field, FormFields, RegistrationRequest, ValidationError, ValidationErrors};

pub const MIN_USERNAME_LEN: usize = 3;
pub const MAX_USERNAME_LEN: usize = 20;
pub const MIN_PASSWORD_LEN: usize = 8;

/// Check a username: 3-20 ASCII letters, digits, `_` or `-`.
pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    if username.is_empty() {
        return Err(ValidationError::UsernameRequired);
    }

    let allowed = username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');

    if !allowed || !(MIN_USERNAME_LEN..=MAX_USERNAME_LEN).contains(&username.len()) {
        return Err(ValidationError::InvalidUsername);
    }

    Ok(())
}

/// Check an email address has the shape `local@domain.tld`.
///
/// No whitespace anywhere, exactly one `@` with a non-empty local part, and a
/// domain holding a `.` that has at least one character on each side.
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if email.is_empty() {
        return Err(ValidationError::EmailRequired);
    }

    if email.chars().any(char::is_whitespace) {
        return Err(ValidationError::InvalidEmail);
    }

    let (local, domain) = email.split_once('@').ok_or(ValidationError::InvalidEmail)?;
    if local.is_empty() || domain.contains('@') {
        return Err(ValidationError::InvalidEmail);
    }

    let dotted = domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len());

    if !dotted {
        return Err(ValidationError::InvalidEmail);
    }

    Ok(())
}

/// Check a password is at least 8 characters. Character classes are not checked.
///
/// Length is counted in UTF-16 code units, as browsers count it.
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.is_empty() {
        return Err(ValidationError::PasswordRequired);
    }

    if password.encode_utf16().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::PasswordTooShort);
    }

    Ok(())
}

/// Server-side check, stopping at the first violation.
///
/// Order: presence, username, password, email.
pub fn validate_registration(request: &RegistrationRequest) -> Result<(), ValidationError> {
    if request.username.is_empty() || request.password.is_empty() || request.email.is_empty() {
        return Err(ValidationError::MissingFields);
    }

    validate_username(&request.username)?;
    validate_password(&request.password)?;
    validate_email(&request.email)?;

    Ok(())
}

/// Form-side check, collecting every violation.
///
/// The username format message uses the form's shorter wording.
pub fn validate_form(fields: &FormFields) -> ValidationErrors {
    let mut errors = ValidationErrors::new();

    let checks = [
        validate_username(&fields.username).map_err(|e| match e {
            ValidationError::InvalidUsername => ValidationError::UsernameFormat,
            other => other,
        }),
        validate_email(&fields.email),
        validate_password(&fields.password),
    ];
    for error in checks.into_iter().filter_map(Result::err) {
        errors.push(error);
    }

    if fields.password != fields.confirm_password {
        errors.insert(
            Field::ConfirmPassword,
            ValidationError::PasswordMismatch.to_string(),
        );
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(username: &str, email: &str, password: &str, confirm: &str) -> FormFields {
        FormFields {
            username: username.into(),
            email: email.into(),
            password: password.into(),
            confirm_password: confirm.into(),
        }
    }

    #[test]
    fn test_username_rules() {
        assert!(validate_username("valid_user-1").is_ok());
        assert!(validate_username("abc").is_ok());
        assert!(validate_username("a".repeat(20).as_str()).is_ok());

        assert_eq!(validate_username("ab"), Err(ValidationError::InvalidUsername));
        assert_eq!(
            validate_username("a".repeat(21).as_str()),
            Err(ValidationError::InvalidUsername)
        );
        assert_eq!(validate_username("bad user!"), Err(ValidationError::InvalidUsername));
        assert_eq!(validate_username("ünïcode"), Err(ValidationError::InvalidUsername));
        assert_eq!(validate_username(""), Err(ValidationError::UsernameRequired));
    }

    #[test]
    fn test_email_rules() {
        assert!(validate_email("a@b.com").is_ok());
        assert!(validate_email("first.last@mail.example.org").is_ok());
        assert!(validate_email("a@b.c.").is_ok());

        for bad in ["a@b", "a.com", "@b.com", "a@.com", "a@b.", "a@@b.com", "a b@c.com", "a@b@c.com"] {
            assert_eq!(validate_email(bad), Err(ValidationError::InvalidEmail), "{bad}");
        }
        assert_eq!(validate_email(""), Err(ValidationError::EmailRequired));
    }

    #[test]
    fn test_password_rules() {
        assert_eq!(validate_password("short"), Err(ValidationError::PasswordTooShort));
        assert_eq!(validate_password("1234567"), Err(ValidationError::PasswordTooShort));
        assert!(validate_password("12345678").is_ok());
        assert!(validate_password("longenough1").is_ok());
        assert!(validate_password("        ").is_ok());
        assert_eq!(validate_password(""), Err(ValidationError::PasswordRequired));
    }

    #[test]
    fn test_password_length_counts_utf16_units() {
        // Each emoji is two UTF-16 code units
        assert!(validate_password("😀😀😀😀").is_ok());
        assert_eq!(validate_password("😀😀😀"), Err(ValidationError::PasswordTooShort));
        assert_eq!(validate_password("ééééééé"), Err(ValidationError::PasswordTooShort));
    }

    #[test]
    fn test_registration_rule_order() {
        let missing = RegistrationRequest::new("", "not-an-email", "x");
        assert_eq!(validate_registration(&missing), Err(ValidationError::MissingFields));

        let all_bad = RegistrationRequest::new("ab", "not-an-email", "short");
        assert_eq!(validate_registration(&all_bad), Err(ValidationError::InvalidUsername));

        let bad_password = RegistrationRequest::new("alice", "not-an-email", "short");
        assert_eq!(
            validate_registration(&bad_password),
            Err(ValidationError::PasswordTooShort)
        );

        let bad_email = RegistrationRequest::new("alice", "not-an-email", "longenough1");
        assert_eq!(validate_registration(&bad_email), Err(ValidationError::InvalidEmail));

        let good = RegistrationRequest::new("alice", "alice@example.com", "longenough1");
        assert!(validate_registration(&good).is_ok());
    }

    #[test]
    fn test_form_collects_all_errors() {
        let errors = validate_form(&fields("", "a@b", "short", "other"));

        assert_eq!(errors.get(Field::Username), Some("Username is required"));
        assert_eq!(errors.get(Field::Email), Some("Invalid email format"));
        assert_eq!(
            errors.get(Field::Password),
            Some("Password must be at least 8 characters")
        );
        assert_eq!(errors.get(Field::ConfirmPassword), Some("Passwords do not match"));
    }

    #[test]
    fn test_form_username_format_wording() {
        let errors = validate_form(&fields("bad user!", "a@b.com", "longenough1", "longenough1"));

        assert_eq!(
            errors.get(Field::Username),
            Some("Username must be 3-20 characters (letters, numbers, _, -)")
        );
        assert_eq!(
            validate_registration(&RegistrationRequest::new("bad user!", "a@b.com", "longenough1"))
                .map_err(|e| e.to_string()),
            Err("Username must be 3-20 characters (letters, numbers, underscore, hyphen only)".into())
        );
    }

    #[test]
    fn test_form_valid() {
        let errors = validate_form(&fields("alice", "a@b.com", "longenough1", "longenough1"));
        assert!(errors.is_empty());
    }

    #[test]
    fn test_validation_is_repeatable() {
        let input = fields("bad user!", "a.com", "longenough1", "longenough2");
        assert_eq!(validate_form(&input), validate_form(&input));

        let request = input.to_request();
        assert_eq!(validate_registration(&request), validate_registration(&request));
    }
}
