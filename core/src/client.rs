//! Bearer-token JSON client for the listings backend.
//!
//! # Design
//! `ApiClient` holds the API root URL, a `Session` and a `Transport`. Each
//! call is split into three steps: `build_*` produces an `HttpRequest`
//! (headers and bearer token attached), the transport executes it, and
//! `handle_response` interprets the `HttpResponse`. The first and last steps
//! are pure apart from token rotation, so they are tested without a network.
//!
//! Response handling, in order:
//! - an `Authorization: Bearer <t>` response header replaces the stored token;
//! - 204 (or an empty 2xx body) decodes the caller's type from JSON `null`;
//! - any other non-2xx becomes `ApiError::Http` with the server's message.

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::ApiConfig;
use crate::error::{ApiError, GENERIC_ERROR_MESSAGE, UPLOAD_FAILED_MESSAGE};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::multipart::{self, FileUpload};
use crate::session::{parse_bearer, Session};
use crate::transport::{Transport, UreqTransport};

const JSON: &str = "application/json";

#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    session: Session,
    transport: Arc<dyn Transport>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("session", &self.session)
            .finish()
    }
}

impl ApiClient {
    /// `base_url` is the API root, prefix included (e.g.
    /// `http://localhost:3000/api/v1`). A trailing slash is ignored.
    pub fn new(base_url: &str, session: Session, transport: Arc<dyn Transport>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            session,
            transport,
        }
    }

    /// Client over a `ureq` transport configured from `config`.
    pub fn from_config(config: &ApiConfig, session: Session) -> Self {
        let timeout = (config.timeout_secs > 0).then(|| Duration::from_secs(config.timeout_secs));
        Self::new(&config.root_url(), session, Arc::new(UreqTransport::new(timeout)))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn url(&self, endpoint: &str) -> String {
        if endpoint.starts_with('/') {
            format!("{}{endpoint}", self.base_url)
        } else {
            format!("{}/{endpoint}", self.base_url)
        }
    }

    // -----------------------------------------------------------------------
    // Request building
    // -----------------------------------------------------------------------

    /// JSON request with an already-serialized body.
    pub fn build_request(&self, method: HttpMethod, endpoint: &str, body: Option<Vec<u8>>) -> HttpRequest {
        let mut headers = vec![
            ("content-type".to_string(), JSON.to_string()),
            ("accept".to_string(), JSON.to_string()),
        ];
        if let Some(bearer) = self.session.bearer() {
            headers.push(("authorization".to_string(), bearer));
        }
        HttpRequest {
            method,
            path: self.url(endpoint),
            headers,
            body,
        }
    }

    pub fn build_json_request<B: Serialize + ?Sized>(
        &self,
        method: HttpMethod,
        endpoint: &str,
        body: &B,
    ) -> Result<HttpRequest, ApiError> {
        let bytes = serde_json::to_vec(body).map_err(|e| ApiError::Serialization(e.to_string()))?;
        Ok(self.build_request(method, endpoint, Some(bytes)))
    }

    /// Like [`build_json_request`](Self::build_json_request), but never
    /// sends the stored token.
    pub fn build_anonymous_json_request<B: Serialize + ?Sized>(
        &self,
        method: HttpMethod,
        endpoint: &str,
        body: &B,
    ) -> Result<HttpRequest, ApiError> {
        let mut request = self.build_json_request(method, endpoint, body)?;
        request.headers.retain(|(name, _)| name != "authorization");
        Ok(request)
    }

    /// Multipart POST: `file` under the `image` field, then `fields`.
    pub fn build_upload(&self, endpoint: &str, file: &FileUpload, fields: &[(String, String)]) -> HttpRequest {
        let form = multipart::encode(file, fields);
        let mut headers = vec![
            ("content-type".to_string(), form.content_type),
            ("accept".to_string(), JSON.to_string()),
        ];
        if let Some(bearer) = self.session.bearer() {
            headers.push(("authorization".to_string(), bearer));
        }
        HttpRequest {
            method: HttpMethod::Post,
            path: self.url(endpoint),
            headers,
            body: Some(form.bytes),
        }
    }

    // -----------------------------------------------------------------------
    // Response handling
    // -----------------------------------------------------------------------

    /// Interpret a response, using `fallback` as the error message when the
    /// body names none.
    pub fn handle_response<T: DeserializeOwned>(&self, response: &HttpResponse, fallback: &str) -> Result<T, ApiError> {
        self.capture_token(response);

        if !response.is_success() {
            return Err(ApiError::from_body(response.status, &response.body, fallback));
        }
        if response.status == 204 || response.body.trim().is_empty() {
            return serde_json::from_str("null").map_err(|e| ApiError::Deserialization(e.to_string()));
        }
        serde_json::from_str(&response.body).map_err(|e| ApiError::Deserialization(e.to_string()))
    }

    fn capture_token(&self, response: &HttpResponse) {
        let Some(token) = response.header("authorization").and_then(parse_bearer) else {
            return;
        };
        if let Err(e) = self.session.rotate(token) {
            warn!(error = %e, "could not persist rotated token");
        }
    }

    // -----------------------------------------------------------------------
    // Execution
    // -----------------------------------------------------------------------

    /// Execute a built request and return the raw response.
    pub fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let method = request.method;
        let path = request.path.clone();
        debug!(method = method.as_str(), url = %path, "sending request");

        match self.transport.execute(request) {
            Ok(response) => {
                debug!(method = method.as_str(), url = %path, status = response.status, "received response");
                Ok(response)
            }
            Err(e) => {
                warn!(method = method.as_str(), url = %path, error = %e, "request failed without a response");
                Err(e)
            }
        }
    }

    pub fn request<T: DeserializeOwned>(
        &self,
        method: HttpMethod,
        endpoint: &str,
        body: Option<Vec<u8>>,
    ) -> Result<T, ApiError> {
        let response = self.send(self.build_request(method, endpoint, body))?;
        self.handle_response(&response, GENERIC_ERROR_MESSAGE)
    }

    pub fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ApiError> {
        self.request(HttpMethod::Get, endpoint, None)
    }

    pub fn delete<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ApiError> {
        self.request(HttpMethod::Delete, endpoint, None)
    }

    pub fn post<T: DeserializeOwned, B: Serialize + ?Sized>(&self, endpoint: &str, body: &B) -> Result<T, ApiError> {
        self.send_json(HttpMethod::Post, endpoint, body)
    }

    pub fn put<T: DeserializeOwned, B: Serialize + ?Sized>(&self, endpoint: &str, body: &B) -> Result<T, ApiError> {
        self.send_json(HttpMethod::Put, endpoint, body)
    }

    pub fn patch<T: DeserializeOwned, B: Serialize + ?Sized>(&self, endpoint: &str, body: &B) -> Result<T, ApiError> {
        self.send_json(HttpMethod::Patch, endpoint, body)
    }

    fn send_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        method: HttpMethod,
        endpoint: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self.send(self.build_json_request(method, endpoint, body)?)?;
        self.handle_response(&response, GENERIC_ERROR_MESSAGE)
    }

    pub fn upload_file<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        file: &FileUpload,
        fields: &[(String, String)],
    ) -> Result<T, ApiError> {
        let response = self.send(self.build_upload(endpoint, file, fields))?;
        self.handle_response(&response, UPLOAD_FAILED_MESSAGE)
    }
}


#[cfg(test)]
mod tests {
    use serde_json::Value;

    use super::testing::{client_with, ScriptedTransport};
    use super::*;

    fn client() -> ApiClient {
        client_with(ScriptedTransport::new(), Session::in_memory())
    }

    #[test]
    fn build_request_sets_json_headers_without_token() {
        let req = client().build_request(HttpMethod::Get, "/properties", None);
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.path, "http://localhost:3000/api/v1/properties");
        assert_eq!(req.header("content-type"), Some("application/json"));
        assert_eq!(req.header("accept"), Some("application/json"));
        assert!(req.header("authorization").is_none());
        assert!(req.body.is_none());
    }

    #[test]
    fn build_request_attaches_bearer_token() {
        let session = Session::in_memory();
        session.rotate("abc").unwrap();
        let client = client_with(ScriptedTransport::new(), session);
        let req = client.build_request(HttpMethod::Delete, "/properties/1", None);
        assert_eq!(req.header("authorization"), Some("Bearer abc"));
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let client = ApiClient::new("http://localhost:3000/api/v1/", Session::in_memory(), ScriptedTransport::new());
        assert_eq!(client.url("/inquiries"), "http://localhost:3000/api/v1/inquiries");
        assert_eq!(client.url("inquiries"), "http://localhost:3000/api/v1/inquiries");
    }

    #[test]
    fn build_json_request_serializes_body() {
        let req = client()
            .build_json_request(HttpMethod::Patch, "/contact_info", &serde_json::json!({"contact_info": {"phone": "1"}}))
            .unwrap();
        let body: Value = serde_json::from_str(req.body_text().unwrap()).unwrap();
        assert_eq!(body["contact_info"]["phone"], "1");
    }

    #[test]
    fn build_upload_uses_multipart_and_token() {
        let session = Session::in_memory();
        session.rotate("abc").unwrap();
        let client = client_with(ScriptedTransport::new(), session);
        let file = FileUpload::from_bytes("a.png", vec![0x89, 0x50]);
        let req = client.build_upload("/properties/1/images", &file, &[("is_primary".into(), "false".into())]);

        assert_eq!(req.method, HttpMethod::Post);
        assert!(req.header("content-type").unwrap().starts_with("multipart/form-data; boundary="));
        assert_eq!(req.header("authorization"), Some("Bearer abc"));
        assert!(req.body.as_ref().unwrap().windows(10).any(|w| w == b"is_primary"));
    }

    #[test]
    fn no_content_yields_empty_result() {
        let client = client();
        client
            .handle_response::<()>(&HttpResponse::new(204, ""), GENERIC_ERROR_MESSAGE)
            .unwrap();
        let nothing: Option<Value> = client.handle_response(&HttpResponse::new(204, ""), GENERIC_ERROR_MESSAGE).unwrap();
        assert!(nothing.is_none());
    }

    #[test]
    fn error_message_comes_from_body() {
        let err = client()
            .handle_response::<Value>(
                &HttpResponse::new(422, r#"{"errors":["Title can't be blank"]}"#),
                GENERIC_ERROR_MESSAGE,
            )
            .unwrap_err();
        assert!(matches!(err, ApiError::Http { status: 422, ref message } if message == "Title can't be blank"));
    }

    #[test]
    fn error_without_message_uses_fallback() {
        let err = client()
            .handle_response::<Value>(&HttpResponse::new(500, "internal error"), GENERIC_ERROR_MESSAGE)
            .unwrap_err();
        assert_eq!(err.user_message(), "An error occurred");
    }

    #[test]
    fn bad_json_is_a_deserialization_error() {
        let err = client()
            .handle_response::<Vec<Value>>(&HttpResponse::new(200, "not json"), GENERIC_ERROR_MESSAGE)
            .unwrap_err();
        assert!(matches!(err, ApiError::Deserialization(_)));
    }

    #[test]
    fn rotated_token_is_captured_even_on_error() {
        let client = client();
        let response = HttpResponse::new(404, r#"{"error":"not found"}"#).with_header("Authorization", "Bearer next");
        assert!(client.handle_response::<Value>(&response, GENERIC_ERROR_MESSAGE).is_err());
        assert_eq!(client.session().token().as_deref(), Some("next"));
    }

    #[test]
    fn request_executes_through_transport() {
        let transport = ScriptedTransport::new();
        transport.push(HttpResponse::new(200, r#"[{"id":1}]"#).with_header("authorization", "Bearer r2"));
        let session = Session::in_memory();
        session.rotate("r1").unwrap();
        let client = client_with(transport.clone(), session);

        let items: Vec<Value> = client.get("/categories").unwrap();
        assert_eq!(items.len(), 1);

        let sent = transport.requests();
        assert_eq!(sent[0].header("authorization"), Some("Bearer r1"));
        assert_eq!(client.session().token().as_deref(), Some("r2"));
    }

    #[test]
    fn transport_failure_propagates() {
        let transport = ScriptedTransport::new();
        transport.push_error(ApiError::Transport("connection refused".to_string()));
        let client = client_with(transport, Session::in_memory());
        let err = client.get::<Value>("/properties").unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)));
    }

    #[test]
    fn upload_failure_uses_upload_fallback() {
        let transport = ScriptedTransport::new();
        transport.push(HttpResponse::new(500, "{}"));
        let client = client_with(transport, Session::in_memory());
        let file = FileUpload::from_bytes("a.png", vec![1]);
        let err = client.upload_file::<Value>("/properties/1/images", &file, &[]).unwrap_err();
        assert_eq!(err.user_message(), "Upload failed");
    }
}
