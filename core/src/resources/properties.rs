use serde::de::IgnoredAny;
use serde_json::json;
use uuid::Uuid;

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::filters::PropertyFilters;
use crate::multipart::FileUpload;
use crate::types::{CreateProperty, Property, PropertyImage, UpdateProperty};

/// Listings matching `filters`, each with its images.
pub fn list(client: &ApiClient, filters: &PropertyFilters) -> Result<Vec<Property>, ApiError> {
    client.get(&format!("/properties{}", filters.to_query_string()))
}

pub fn get(client: &ApiClient, id: Uuid) -> Result<Property, ApiError> {
    client.get(&format!("/properties/{id}"))
}

pub fn create(client: &ApiClient, data: &CreateProperty) -> Result<Property, ApiError> {
    client.post("/properties", &json!({ "property": data }))
}

pub fn update(client: &ApiClient, id: Uuid, data: &UpdateProperty) -> Result<Property, ApiError> {
    client.patch(&format!("/properties/{id}"), &json!({ "property": data }))
}

pub fn delete(client: &ApiClient, id: Uuid) -> Result<(), ApiError> {
    client.delete::<IgnoredAny>(&format!("/properties/{id}"))?;
    Ok(())
}

pub fn upload_image(
    client: &ApiClient,
    property_id: Uuid,
    file: &FileUpload,
    is_primary: bool,
) -> Result<PropertyImage, ApiError> {
    let fields = [("is_primary".to_string(), is_primary.to_string())];
    client.upload_file(&format!("/properties/{property_id}/images"), file, &fields)
}

pub fn delete_image(client: &ApiClient, image_id: Uuid) -> Result<(), ApiError> {
    client.delete::<IgnoredAny>(&format!("/property_images/{image_id}"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use serde_json::Value;

    use super::*;
    use crate::client::testing::{client_with, ScriptedTransport};
    use crate::http::{HttpMethod, HttpResponse};
    use crate::session::Session;

    const PROPERTY: &str = r#"{"id":"00000000-0000-0000-0000-000000000001","title":"Villa","address":"1 Palm Rd",
        "price":"900000","property_type":"villa","status":"available","featured":false,
        "created_at":"2024-01-01T00:00:00Z","updated_at":"2024-01-01T00:00:00Z"}"#;

    fn id() -> Uuid {
        Uuid::from_u128(1)
    }

    #[test]
    fn list_sends_filters_as_query() {
        let transport = ScriptedTransport::new();
        transport.push(HttpResponse::new(200, format!("[{PROPERTY}]")));
        let client = client_with(transport.clone(), Session::in_memory());

        let filters = PropertyFilters {
            location: Some("Palm".to_string()),
            ..PropertyFilters::available()
        };
        let properties = list(&client, &filters).unwrap();
        assert_eq!(properties.len(), 1);
        assert!(properties[0].property_images.is_empty());

        let sent = transport.requests();
        assert_eq!(sent[0].method, HttpMethod::Get);
        assert_eq!(
            sent[0].path,
            "http://localhost:3000/api/v1/properties?available=true&location=Palm"
        );
    }

    #[test]
    fn create_wraps_body_in_property_key() {
        let transport = ScriptedTransport::new();
        transport.push(HttpResponse::new(201, PROPERTY));
        let client = client_with(transport.clone(), Session::in_memory());

        let data = CreateProperty {
            title: "Villa".to_string(),
            description: None,
            address: "1 Palm Rd".to_string(),
            price: Decimal::new(900_000, 0),
            bedrooms: Some(4),
            bathrooms: None,
            area: None,
            property_type: "villa".to_string(),
            status: Some(crate::types::PropertyStatus::Available),
            featured: None,
            category_id: None,
        };
        let created = create(&client, &data).unwrap();
        assert_eq!(created.id, id());

        let body: Value = serde_json::from_str(transport.requests()[0].body_text().unwrap()).unwrap();
        assert_eq!(body["property"]["title"], "Villa");
        assert_eq!(body["property"]["bedrooms"], 4);
        assert_eq!(body["property"]["status"], "available");
        assert!(body["property"].get("bathrooms").is_none());
    }

    #[test]
    fn update_uses_patch() {
        let transport = ScriptedTransport::new();
        transport.push(HttpResponse::new(200, PROPERTY));
        let client = client_with(transport.clone(), Session::in_memory());

        let data = UpdateProperty {
            featured: Some(true),
            ..Default::default()
        };
        update(&client, id(), &data).unwrap();

        let sent = &transport.requests()[0];
        assert_eq!(sent.method, HttpMethod::Patch);
        assert!(sent.path.ends_with("/properties/00000000-0000-0000-0000-000000000001"));
        let body: Value = serde_json::from_str(sent.body_text().unwrap()).unwrap();
        assert_eq!(body, serde_json::json!({"property": {"featured": true}}));
    }

    #[test]
    fn delete_accepts_no_content_and_json() {
        let transport = ScriptedTransport::new();
        transport.push(HttpResponse::new(204, ""));
        transport.push(HttpResponse::new(200, r#"{"message":"deleted"}"#));
        let client = client_with(transport.clone(), Session::in_memory());

        delete(&client, id()).unwrap();
        delete_image(&client, id()).unwrap();

        let sent = transport.requests();
        assert_eq!(sent[0].method, HttpMethod::Delete);
        assert!(sent[1].path.ends_with("/property_images/00000000-0000-0000-0000-000000000001"));
    }

    #[test]
    fn upload_image_sends_primary_flag() {
        let transport = ScriptedTransport::new();
        transport.push(HttpResponse::new(
            201,
            r#"{"id":"00000000-0000-0000-0000-000000000009","property_id":"00000000-0000-0000-0000-000000000001",
                "image_url":"/uploads/a.png","is_primary":true,"created_at":"2024-01-01T00:00:00Z"}"#,
        ));
        let client = client_with(transport.clone(), Session::in_memory());

        let image = upload_image(&client, id(), &FileUpload::from_bytes("a.png", vec![1, 2]), true).unwrap();
        assert!(image.is_primary);

        let sent = &transport.requests()[0];
        assert!(sent.path.ends_with("/properties/00000000-0000-0000-0000-000000000001/images"));
        let body = String::from_utf8_lossy(sent.body.as_ref().unwrap()).to_string();
        assert!(body.contains("name=\"is_primary\"\r\n\r\ntrue\r\n"));
        assert!(body.contains("name=\"image\"; filename=\"a.png\""));
    }

    #[test]
    fn missing_property_surfaces_server_message() {
        let transport = ScriptedTransport::new();
        transport.push(HttpResponse::new(404, r#"{"error":"Couldn't find Property"}"#));
        let client = client_with(transport, Session::in_memory());

        let err = get(&client, id()).unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.user_message(), "Couldn't find Property");
    }
}
