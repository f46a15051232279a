//! Admin login and logout.
//!
//! The backend issues the session token in the `Authorization` response
//! header, never in the body. No expiry is tracked locally: a later 401 is
//! the only signal that the token went stale.

use serde::de::IgnoredAny;
use serde_json::json;
use tracing::{info, warn};

use crate::client::ApiClient;
use crate::error::{ApiError, LOGIN_FAILED_MESSAGE};
use crate::http::HttpMethod;
use crate::session::parse_bearer;
use crate::types::{LoginCredentials, LoginResponse};

/// Exchange credentials for a session token.
///
/// Any stored token is left off the request. When the response carries a
/// bearer token it is stored together with the submitted email, before the
/// status is examined.
pub fn login(client: &ApiClient, credentials: &LoginCredentials) -> Result<LoginResponse, ApiError> {
    let body = json!({
        "admin_user": {
            "email": credentials.email,
            "password": credentials.password,
        }
    });
    let request = client.build_anonymous_json_request(HttpMethod::Post, "/login", &body)?;
    let response = client.send(request)?;

    let issued = response.header("authorization").and_then(parse_bearer).is_some();
    let result = client.handle_response(&response, LOGIN_FAILED_MESSAGE);
    if issued {
        if let Err(e) = client.session().remember_email(&credentials.email) {
            warn!(error = %e, "could not persist admin email");
        }
        info!(email = %credentials.email, "admin signed in");
    }
    result
}

/// Best-effort server logout. Local credentials are cleared whatever the
/// network outcome.
pub fn logout(client: &ApiClient) {
    if let Err(e) = client.delete::<IgnoredAny>("/logout") {
        warn!(error = %e, "logout request failed; clearing local session anyway");
    }
    client.session().clear();
}

pub fn is_authenticated(client: &ApiClient) -> bool {
    client.session().is_authenticated()
}
