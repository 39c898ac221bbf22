//! Input checks shared by services.

use crate::server::error::{request::RequestError, Error};

/// Trims `value` and rejects it when blank
pub fn required_text(field: &str, value: &str) -> Result<String, Error> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(RequestError::validation(format!("{} must not be blank", field)).into());
    }

    Ok(trimmed.to_string())
}

/// Trims an optional value, mapping blank to `None`
pub fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Lower-cases and checks the shape of an e-mail address
pub fn normalize_email(email: &str) -> Result<String, Error> {
    let email = email.trim().to_lowercase();

    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    };

    if !valid {
        return Err(RequestError::validation(format!("Invalid e-mail address: {}", email)).into());
    }

    Ok(email)
}

pub fn non_negative(field: &str, value: i64) -> Result<(), Error> {
    if value < 0 {
        return Err(RequestError::validation(format!("{} must not be negative", field)).into());
    }

    Ok(())
}

pub fn positive(field: &str, value: i64) -> Result<(), Error> {
    if value <= 0 {
        return Err(RequestError::validation(format!("{} must be greater than zero", field)).into());
    }

    Ok(())
}
