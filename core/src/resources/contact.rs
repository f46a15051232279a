use serde_json::json;

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::types::{ContactInfo, UpdateContactInfo};

/// Public read of the contact singleton.
pub fn get(client: &ApiClient) -> Result<ContactInfo, ApiError> {
    client.get("/contact_info")
}

/// Admin-only partial update.
pub fn update(client: &ApiClient, data: &UpdateContactInfo) -> Result<ContactInfo, ApiError> {
    client.patch("/contact_info", &json!({ "contact_info": data }))
}
