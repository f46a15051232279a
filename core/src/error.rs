//! Error types for the listings API client.
//!
//! # Design
//! Every failed HTTP exchange becomes `ApiError::Http` carrying the status and
//! a human-readable message pulled from the backend's JSON error body. Callers
//! branch on `is_unauthorized()` to send admins back to the login page and
//! otherwise show `user_message()`.

use serde_json::Value;
use thiserror::Error;

/// Fallback when a failed JSON response carries no usable message.
pub const GENERIC_ERROR_MESSAGE: &str = "An error occurred";

/// Fallback for failed multipart uploads.
pub const UPLOAD_FAILED_MESSAGE: &str = "Upload failed";

/// Fallback for failed logins.
pub const LOGIN_FAILED_MESSAGE: &str = "Login failed";

/// Text shown to users when the failure has no server-supplied message.
pub const RETRY_MESSAGE: &str = "An error occurred. Please try again.";

#[derive(Debug, Error)]
pub enum ApiError {
    /// The backend answered with a non-2xx status.
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// No response was received.
    #[error("transport error: {0}")]
    Transport(String),

    #[error("serialization failed: {0}")]
    Serialization(String),

    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The credential store could not be read or written.
    #[error("credential storage error: {0}")]
    Storage(String),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Message suitable for display: the server's text for HTTP errors, a
    /// fixed generic sentence for everything else.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Http { message, .. } => message.clone(),
            _ => RETRY_MESSAGE.to_string(),
        }
    }

    /// Build an `Http` error from a failed response body.
    pub fn from_body(status: u16, body: &str, fallback: &str) -> Self {
        ApiError::Http {
            status,
            message: extract_error_message(body).unwrap_or_else(|| fallback.to_string()),
        }
    }
}

/// Pull a message out of a JSON error body.
///
/// Checks `error`, then `errors` (array joined with ", " or a plain string),
/// then `message`. Empty strings and empty arrays count as absent.
pub fn extract_error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;

    if let Some(error) = non_empty_str(value.get("error")) {
        return Some(error);
    }

    match value.get("errors") {
        Some(Value::Array(items)) => {
            let parts: Vec<String> = items
                .iter()
                .filter_map(|item| match item {
                    Value::String(s) => Some(s.clone()),
                    Value::Null => None,
                    other => Some(other.to_string()),
                })
                .collect();
            if !parts.is_empty() {
                return Some(parts.join(", "));
            }
        }
        Some(Value::String(s)) if !s.is_empty() => return Some(s.clone()),
        _ => {}
    }

    non_empty_str(value.get("message"))
}

fn non_empty_str(value: Option<&Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_field_wins() {
        let body = r#"{"error":"Couldn't find Property","errors":["x"],"message":"m"}"#;
        assert_eq!(extract_error_message(body).as_deref(), Some("Couldn't find Property"));
    }

    #[test]
    fn errors_array_is_joined() {
        let body = r#"{"errors":["Title can't be blank","Price must be greater than or equal to 0"]}"#;
        assert_eq!(
            extract_error_message(body).as_deref(),
            Some("Title can't be blank, Price must be greater than or equal to 0")
        );
    }

    #[test]
    fn message_is_last_resort() {
        let body = r#"{"success":false,"message":"Invalid email or password."}"#;
        assert_eq!(extract_error_message(body).as_deref(), Some("Invalid email or password."));
    }

    #[test]
    fn non_json_body_falls_back() {
        let err = ApiError::from_body(500, "<html>oops</html>", GENERIC_ERROR_MESSAGE);
        assert_eq!(err.user_message(), "An error occurred");
        assert_eq!(err.status(), Some(500));
    }

    #[test]
    fn empty_fields_fall_back() {
        let err = ApiError::from_body(422, r#"{"error":"","errors":[]}"#, UPLOAD_FAILED_MESSAGE);
        assert_eq!(err.user_message(), "Upload failed");
    }

    #[test]
    fn transport_errors_show_generic_text() {
        let err = ApiError::Transport("connection refused".to_string());
        assert_eq!(err.user_message(), RETRY_MESSAGE);
        assert!(!err.is_unauthorized());
    }

    #[test]
    fn unauthorized_is_detected_by_status() {
        let err = ApiError::from_body(401, r#"{"error":"Unauthorized"}"#, GENERIC_ERROR_MESSAGE);
        assert!(err.is_unauthorized());
        assert_eq!(err.to_string(), "HTTP 401: Unauthorized");
    }
}
