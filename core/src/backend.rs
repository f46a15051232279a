//! The capability every view model talks to.
//!
//! # Design
//! `Backend` collects all resource operations behind one trait so views do
//! not care which server sits on the other end. `RailsBackend` is the only
//! adapter: it forwards each call to the matching accessor in
//! [`crate::resources`]. Tests provide in-memory implementations.

use std::sync::Arc;

use uuid::Uuid;

use crate::client::ApiClient;
use crate::config::{AppConfig, BackendKind};
use crate::error::ApiError;
use crate::filters::PropertyFilters;
use crate::multipart::FileUpload;
use crate::resources::{auth, categories, contact, inquiries, properties};
use crate::session::Session;
use crate::types::{
    Category, ContactInfo, CreateInquiry, CreateProperty, Inquiry, LoginCredentials, LoginResponse, Property,
    PropertyImage, UpdateContactInfo, UpdateProperty,
};

pub trait Backend: Send + Sync {
    fn list_properties(&self, filters: &PropertyFilters) -> Result<Vec<Property>, ApiError>;
    fn get_property(&self, id: Uuid) -> Result<Property, ApiError>;
    fn create_property(&self, data: &CreateProperty) -> Result<Property, ApiError>;
    fn update_property(&self, id: Uuid, data: &UpdateProperty) -> Result<Property, ApiError>;
    fn delete_property(&self, id: Uuid) -> Result<(), ApiError>;
    fn upload_property_image(
        &self,
        property_id: Uuid,
        file: &FileUpload,
        is_primary: bool,
    ) -> Result<PropertyImage, ApiError>;
    fn delete_property_image(&self, image_id: Uuid) -> Result<(), ApiError>;

    fn list_inquiries(&self) -> Result<Vec<Inquiry>, ApiError>;
    fn get_inquiry(&self, id: Uuid) -> Result<Inquiry, ApiError>;
    fn create_inquiry(&self, data: &CreateInquiry) -> Result<Inquiry, ApiError>;

    fn get_contact_info(&self) -> Result<ContactInfo, ApiError>;
    fn update_contact_info(&self, data: &UpdateContactInfo) -> Result<ContactInfo, ApiError>;

    fn list_categories(&self) -> Result<Vec<Category>, ApiError>;
    fn get_category(&self, id: Uuid) -> Result<Category, ApiError>;

    fn login(&self, credentials: &LoginCredentials) -> Result<LoginResponse, ApiError>;
    /// Never fails: local credentials are always dropped.
    fn logout(&self);
    fn is_authenticated(&self) -> bool;
    fn admin_email(&self) -> Option<String>;
}

/// Adapter for the Rails JSON API.
#[derive(Debug, Clone)]
pub struct RailsBackend {
    client: ApiClient,
}

impl RailsBackend {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }
}

impl Backend for RailsBackend {
    fn list_properties(&self, filters: &PropertyFilters) -> Result<Vec<Property>, ApiError> {
        properties::list(&self.client, filters)
    }

    fn get_property(&self, id: Uuid) -> Result<Property, ApiError> {
        properties::get(&self.client, id)
    }

    fn create_property(&self, data: &CreateProperty) -> Result<Property, ApiError> {
        properties::create(&self.client, data)
    }

    fn update_property(&self, id: Uuid, data: &UpdateProperty) -> Result<Property, ApiError> {
        properties::update(&self.client, id, data)
    }

    fn delete_property(&self, id: Uuid) -> Result<(), ApiError> {
        properties::delete(&self.client, id)
    }

    fn upload_property_image(
        &self,
        property_id: Uuid,
        file: &FileUpload,
        is_primary: bool,
    ) -> Result<PropertyImage, ApiError> {
        properties::upload_image(&self.client, property_id, file, is_primary)
    }

    fn delete_property_image(&self, image_id: Uuid) -> Result<(), ApiError> {
        properties::delete_image(&self.client, image_id)
    }

    fn list_inquiries(&self) -> Result<Vec<Inquiry>, ApiError> {
        inquiries::list(&self.client)
    }

    fn get_inquiry(&self, id: Uuid) -> Result<Inquiry, ApiError> {
        inquiries::get(&self.client, id)
    }

    fn create_inquiry(&self, data: &CreateInquiry) -> Result<Inquiry, ApiError> {
        inquiries::create(&self.client, data)
    }

    fn get_contact_info(&self) -> Result<ContactInfo, ApiError> {
        contact::get(&self.client)
    }

    fn update_contact_info(&self, data: &UpdateContactInfo) -> Result<ContactInfo, ApiError> {
        contact::update(&self.client, data)
    }

    fn list_categories(&self) -> Result<Vec<Category>, ApiError> {
        categories::list(&self.client)
    }

    fn get_category(&self, id: Uuid) -> Result<Category, ApiError> {
        categories::get(&self.client, id)
    }

    fn login(&self, credentials: &LoginCredentials) -> Result<LoginResponse, ApiError> {
        auth::login(&self.client, credentials)
    }

    fn logout(&self) {
        auth::logout(&self.client)
    }

    fn is_authenticated(&self) -> bool {
        auth::is_authenticated(&self.client)
    }

    fn admin_email(&self) -> Option<String> {
        self.client.session().admin_email()
    }
}

/// Build the adapter named by `config.backend.kind`.
pub fn connect(config: &AppConfig) -> Arc<dyn Backend> {
    let session = Session::new(config.storage.credential_store());
    match config.backend.kind {
        BackendKind::Rails => Arc::new(RailsBackend::new(ApiClient::from_config(&config.api, session))),
    }
}
