//! In-memory `Backend` for view tests.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::backend::Backend;
use crate::error::ApiError;
use crate::filters::PropertyFilters;
use crate::multipart::FileUpload;
use crate::types::*;

#[derive(Debug, Clone)]
pub enum Failure {
    Http(u16, &'static str),
    Transport,
}

impl Failure {
    fn to_error(&self) -> ApiError {
        match self {
            Failure::Http(status, message) => ApiError::Http {
                status: *status,
                message: message.to_string(),
            },
            Failure::Transport => ApiError::Transport("connection refused".to_string()),
        }
    }
}

#[derive(Default)]
pub struct FakeBackend {
    pub properties: Mutex<Vec<Property>>,
    pub inquiries: Mutex<Vec<Inquiry>>,
    pub contact: Mutex<Option<ContactInfo>>,
    pub authenticated: Mutex<bool>,
    calls: Mutex<Vec<String>>,
    failures: Mutex<HashMap<&'static str, Failure>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn signed_in() -> Self {
        let backend = Self::default();
        *backend.authenticated.lock().unwrap() = true;
        backend
    }

    pub fn with_properties(self, properties: Vec<Property>) -> Self {
        *self.properties.lock().unwrap() = properties;
        self
    }

    /// Make `op` fail; `"*"` fails every operation.
    pub fn fail(&self, op: &'static str, failure: Failure) {
        self.failures.lock().unwrap().insert(op, failure);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String, op: &'static str) -> Result<(), ApiError> {
        self.calls.lock().unwrap().push(call);
        let failures = self.failures.lock().unwrap();
        match failures.get(op).or_else(|| failures.get("*")) {
            Some(failure) => Err(failure.to_error()),
            None => Ok(()),
        }
    }

    fn not_found() -> ApiError {
        ApiError::Http {
            status: 404,
            message: "Couldn't find Property".to_string(),
        }
    }
}

pub fn ts(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, day, 12, 0, 0).unwrap()
}

pub fn property(n: u128, featured: bool, day: u32) -> Property {
    Property {
        id: Uuid::from_u128(n),
        title: format!("Listing {n}"),
        description: None,
        address: format!("{n} Marina Walk"),
        price: Decimal::new(100_000 * n as i64, 0),
        bedrooms: Some(2),
        bathrooms: Some(1),
        area: None,
        property_type: "apartment".to_string(),
        status: PropertyStatus::Available,
        featured,
        category_id: None,
        created_at: ts(day),
        updated_at: ts(day),
        created_by: None,
        property_images: Vec::new(),
    }
}

pub fn contact_info() -> ContactInfo {
    ContactInfo {
        id: Uuid::from_u128(77),
        phone: "+971 4 000 0000".to_string(),
        email: "hello@example.com".to_string(),
        address: "Downtown Dubai".to_string(),
        hours: "Sun-Thu: 9AM-6PM\nFri: Closed".to_string(),
        updated_at: ts(1),
    }
}

impl Backend for FakeBackend {
    fn list_properties(&self, filters: &PropertyFilters) -> Result<Vec<Property>, ApiError> {
        self.record(format!("list_properties{}", filters.to_query_string()), "list_properties")?;
        let location = filters.location.clone().unwrap_or_default().to_lowercase();
        Ok(self
            .properties
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.address.to_lowercase().contains(&location))
            .cloned()
            .collect())
    }

    fn get_property(&self, id: Uuid) -> Result<Property, ApiError> {
        self.record(format!("get_property:{id}"), "get_property")?;
        self.properties
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(Self::not_found)
    }

    fn create_property(&self, data: &CreateProperty) -> Result<Property, ApiError> {
        self.record(format!("create_property:{}", data.title), "create_property")?;
        let mut created = property(900, data.featured.unwrap_or(false), 1);
        created.title = data.title.clone();
        created.address = data.address.clone();
        created.price = data.price;
        created.status = data.status.unwrap_or_default();
        self.properties.lock().unwrap().push(created.clone());
        Ok(created)
    }

    fn update_property(&self, id: Uuid, data: &UpdateProperty) -> Result<Property, ApiError> {
        self.record(format!("update_property:{id}"), "update_property")?;
        let mut properties = self.properties.lock().unwrap();
        let existing = properties.iter_mut().find(|p| p.id == id).ok_or_else(Self::not_found)?;
        if let Some(title) = &data.title {
            existing.title = title.clone();
        }
        if let Some(status) = data.status {
            existing.status = status;
        }
        Ok(existing.clone())
    }

    fn delete_property(&self, id: Uuid) -> Result<(), ApiError> {
        self.record(format!("delete_property:{id}"), "delete_property")?;
        self.properties.lock().unwrap().retain(|p| p.id != id);
        Ok(())
    }

    fn upload_property_image(
        &self,
        property_id: Uuid,
        file: &FileUpload,
        is_primary: bool,
    ) -> Result<PropertyImage, ApiError> {
        self.record(
            format!("upload_property_image:{}:{is_primary}", file.file_name),
            "upload_property_image",
        )?;
        Ok(PropertyImage {
            id: Uuid::new_v4(),
            property_id,
            image_url: format!("/uploads/{}", file.file_name),
            blob_url: None,
            is_primary,
            created_at: ts(2),
        })
    }

    fn delete_property_image(&self, image_id: Uuid) -> Result<(), ApiError> {
        self.record(format!("delete_property_image:{image_id}"), "delete_property_image")
    }

    fn list_inquiries(&self) -> Result<Vec<Inquiry>, ApiError> {
        self.record("list_inquiries".to_string(), "list_inquiries")?;
        Ok(self.inquiries.lock().unwrap().clone())
    }

    fn get_inquiry(&self, id: Uuid) -> Result<Inquiry, ApiError> {
        self.record(format!("get_inquiry:{id}"), "get_inquiry")?;
        self.inquiries
            .lock()
            .unwrap()
            .iter()
            .find(|i| i.id == id)
            .cloned()
            .ok_or_else(Self::not_found)
    }

    fn create_inquiry(&self, data: &CreateInquiry) -> Result<Inquiry, ApiError> {
        self.record(format!("create_inquiry:{}", data.email), "create_inquiry")?;
        let inquiry = Inquiry {
            id: Uuid::new_v4(),
            property_id: data.property_id,
            name: data.name.clone(),
            email: data.email.clone(),
            phone: data.phone.clone(),
            message: data.message.clone(),
            created_at: ts(3),
        };
        self.inquiries.lock().unwrap().push(inquiry.clone());
        Ok(inquiry)
    }

    fn get_contact_info(&self) -> Result<ContactInfo, ApiError> {
        self.record("get_contact_info".to_string(), "get_contact_info")?;
        self.contact.lock().unwrap().clone().ok_or_else(Self::not_found)
    }

    fn update_contact_info(&self, data: &UpdateContactInfo) -> Result<ContactInfo, ApiError> {
        self.record("update_contact_info".to_string(), "update_contact_info")?;
        let mut guard = self.contact.lock().unwrap();
        let info = guard.get_or_insert_with(contact_info);
        if let Some(phone) = &data.phone {
            info.phone = phone.clone();
        }
        if let Some(hours) = &data.hours {
            info.hours = hours.clone();
        }
        Ok(info.clone())
    }

    fn list_categories(&self) -> Result<Vec<Category>, ApiError> {
        self.record("list_categories".to_string(), "list_categories")?;
        Ok(Vec::new())
    }

    fn get_category(&self, id: Uuid) -> Result<Category, ApiError> {
        self.record(format!("get_category:{id}"), "get_category")?;
        Err(Self::not_found())
    }

    fn login(&self, credentials: &LoginCredentials) -> Result<LoginResponse, ApiError> {
        self.record(format!("login:{}", credentials.email), "login")?;
        let success = credentials.password == "correct horse";
        if success {
            *self.authenticated.lock().unwrap() = true;
        }
        Ok(LoginResponse {
            success,
            message: if success { "Logged in successfully." } else { "" }.to_string(),
            admin: None,
        })
    }

    fn logout(&self) {
        self.calls.lock().unwrap().push("logout".to_string());
        *self.authenticated.lock().unwrap() = false;
    }

    fn is_authenticated(&self) -> bool {
        *self.authenticated.lock().unwrap()
    }

    fn admin_email(&self) -> Option<String> {
        self.is_authenticated().then(|| "admin@example.com".to_string())
    }
}
