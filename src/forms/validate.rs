use once_cell::sync::Lazy;
use regex::Regex;

use super::messages::{EMAIL_REQUIRED, INVALID_EMAIL, PASSWORD_REQUIRED};
use super::FormError;

static EMAIL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex compiles"));

pub fn validate_email(email: &str) -> Result<(), FormError> {
    let email = email.trim();
    if email.is_empty() {
        return Err(FormError::Invalid { field: "email", message: EMAIL_REQUIRED });
    }
    if !EMAIL_REGEX.is_match(email) {
        return Err(FormError::Invalid { field: "email", message: INVALID_EMAIL });
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), FormError> {
    if password.is_empty() {
        return Err(FormError::Invalid { field: "password", message: PASSWORD_REQUIRED });
    }
    Ok(())
}

/// Both credentials present and the email well formed.
pub fn validate_credentials(email: &str, password: &str) -> Result<(), FormError> {
    validate_email(email)?;
    validate_password(password)
}
