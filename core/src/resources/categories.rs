use uuid::Uuid;

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::types::Category;

pub fn list(client: &ApiClient) -> Result<Vec<Category>, ApiError> {
    client.get("/categories")
}

pub fn get(client: &ApiClient, id: Uuid) -> Result<Category, ApiError> {
    client.get(&format!("/categories/{id}"))
}
