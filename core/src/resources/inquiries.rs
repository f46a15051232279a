use serde_json::json;
use uuid::Uuid;

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::types::{CreateInquiry, Inquiry};

/// All inquiries. Admin only.
pub fn list(client: &ApiClient) -> Result<Vec<Inquiry>, ApiError> {
    client.get("/inquiries")
}

/// Admin only.
pub fn get(client: &ApiClient, id: Uuid) -> Result<Inquiry, ApiError> {
    client.get(&format!("/inquiries/{id}"))
}

/// Public: visitors submit these from a property page.
pub fn create(client: &ApiClient, data: &CreateInquiry) -> Result<Inquiry, ApiError> {
    client.post("/inquiries", &json!({ "inquiry": data }))
}
