//! Client-side input checks, mirroring `required` and typed form inputs.
//! They run before any request is made.

use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("{0} is required")]
    Required(&'static str),

    #[error("{field} must be {expected}")]
    Invalid {
        field: &'static str,
        expected: &'static str,
    },
}

pub fn required(field: &'static str, value: &str) -> Result<String, FormError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(FormError::Required(field))
    } else {
        Ok(trimmed.to_string())
    }
}

/// Blank becomes `None`.
pub fn optional(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// A blank number field is `None`; anything else must parse.
pub fn optional_number<T: FromStr>(field: &'static str, value: &str) -> Result<Option<T>, FormError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed.parse().map(Some).map_err(|_| FormError::Invalid {
        field,
        expected: "a number",
    })
}

pub fn required_number<T: FromStr>(field: &'static str, value: &str) -> Result<T, FormError> {
    optional_number(field, value)?.ok_or(FormError::Required(field))
}

/// The same loose shape check a browser applies to `type="email"`.
pub fn email(field: &'static str, value: &str) -> Result<String, FormError> {
    let value = required(field, value)?;
    let valid = match value.split_once('@') {
        Some((local, domain)) => !local.is_empty() && !domain.is_empty() && !domain.contains('@'),
        None => false,
    };
    if valid && !value.contains(char::is_whitespace) {
        Ok(value)
    } else {
        Err(FormError::Invalid {
            field,
            expected: "an email address",
        })
    }
}
