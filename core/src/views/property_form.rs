//! Create and edit listing pages.
//!
//! Selected images upload one at a time after the listing itself is saved;
//! each upload starts only after the previous one returned.

use std::time::Instant;

use rust_decimal::Decimal;
use tracing::{error, info};
use uuid::Uuid;

use crate::backend::Backend;
use crate::error::ApiError;
use crate::multipart::FileUpload;
use crate::routes::Route;
use crate::types::{CreateProperty, Property, PropertyImage, PropertyStatus, UpdateProperty};

use super::forms::{self, FormError};
use super::{display_error, AuthGate, LoadState, SubmitState, SHORT_CONFIRMATION};

pub const IMAGE_DELETE_FAILED_MESSAGE: &str = "Failed to delete image";

/// Raw listing form inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyForm {
    pub title: String,
    pub description: String,
    pub address: String,
    pub price: String,
    pub bedrooms: String,
    pub bathrooms: String,
    pub area: String,
    pub property_type: String,
    pub status: PropertyStatus,
    pub featured: bool,
}

impl PropertyForm {
    pub fn from_property(property: &Property) -> Self {
        Self {
            title: property.title.clone(),
            description: property.description.clone().unwrap_or_default(),
            address: property.address.clone(),
            price: property.price.to_string(),
            bedrooms: property.bedrooms.map(|n| n.to_string()).unwrap_or_default(),
            bathrooms: property.bathrooms.map(|n| n.to_string()).unwrap_or_default(),
            area: property.area.map(|n| n.to_string()).unwrap_or_default(),
            property_type: property.property_type.clone(),
            status: property.status,
            featured: property.featured,
        }
    }

    fn price(&self) -> Result<Decimal, FormError> {
        let price: Decimal = forms::required_number("price", &self.price)?;
        if price.is_sign_negative() {
            return Err(FormError::Invalid {
                field: "price",
                expected: "zero or more",
            });
        }
        Ok(price)
    }

    /// New listings always start out available.
    pub fn to_create(&self) -> Result<CreateProperty, FormError> {
        Ok(CreateProperty {
            title: forms::required("title", &self.title)?,
            description: forms::optional(&self.description),
            address: forms::required("address", &self.address)?,
            price: self.price()?,
            bedrooms: forms::optional_number("bedrooms", &self.bedrooms)?,
            bathrooms: forms::optional_number("bathrooms", &self.bathrooms)?,
            area: forms::optional_number("area", &self.area)?,
            property_type: forms::required("property type", &self.property_type)?,
            status: Some(PropertyStatus::Available),
            featured: self.featured.then_some(true),
            category_id: None,
        })
    }

    pub fn to_update(&self) -> Result<UpdateProperty, FormError> {
        Ok(UpdateProperty {
            title: Some(forms::required("title", &self.title)?),
            description: Some(self.description.trim().to_string()),
            address: Some(forms::required("address", &self.address)?),
            price: Some(self.price()?),
            bedrooms: forms::optional_number("bedrooms", &self.bedrooms)?,
            bathrooms: forms::optional_number("bathrooms", &self.bathrooms)?,
            area: forms::optional_number("area", &self.area)?,
            property_type: Some(forms::required("property type", &self.property_type)?),
            status: Some(self.status),
            featured: Some(self.featured),
            category_id: None,
        })
    }
}

#[derive(Debug, Default)]
pub struct ListPropertyPage {
    gate: AuthGate,
    pub form: PropertyForm,
    images: Vec<FileUpload>,
    uploading_images: bool,
    state: SubmitState,
}

impl ListPropertyPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mount(&mut self, backend: &dyn Backend) -> Option<Route> {
        self.gate = AuthGate::check(backend);
        self.gate.redirect().cloned()
    }

    pub fn state(&self) -> &SubmitState {
        &self.state
    }

    pub fn is_uploading_images(&self) -> bool {
        self.uploading_images
    }

    pub fn images(&self) -> &[FileUpload] {
        &self.images
    }

    pub fn add_image(&mut self, file: FileUpload) {
        self.images.push(file);
    }

    pub fn remove_image(&mut self, index: usize) {
        if index < self.images.len() {
            self.images.remove(index);
        }
    }

    /// Create the listing and upload its images, the first one as primary.
    /// On success, returns the new listing's detail route.
    pub fn submit(&mut self, backend: &dyn Backend) -> Result<Option<Route>, FormError> {
        let data = self.form.to_create()?;
        self.state = SubmitState::Submitting;

        match self.create_with_images(backend, &data) {
            Ok(property) => {
                info!(property_id = %property.id, images = self.images.len(), "property listed");
                self.state = SubmitState::Submitted { until: None };
                Ok(Some(Route::PropertyDetail(property.id)))
            }
            Err(e) => {
                self.uploading_images = false;
                if self.gate.reject_if_unauthorized(&e) {
                    self.state = SubmitState::Idle;
                    return Ok(self.gate.redirect().cloned());
                }
                self.state = SubmitState::Failed(display_error("error listing property", &e));
                Ok(None)
            }
        }
    }

    fn create_with_images(&mut self, backend: &dyn Backend, data: &CreateProperty) -> Result<Property, ApiError> {
        let property = backend.create_property(data)?;
        if !self.images.is_empty() {
            self.uploading_images = true;
            for (index, file) in self.images.iter().enumerate() {
                backend.upload_property_image(property.id, file, index == 0)?;
            }
            self.uploading_images = false;
        }
        Ok(property)
    }
}

#[derive(Debug)]
pub struct EditPropertyPage {
    id: Uuid,
    gate: AuthGate,
    property: LoadState<Property>,
    pub form: PropertyForm,
    images: Vec<PropertyImage>,
    new_images: Vec<FileUpload>,
    uploading_images: bool,
    state: SubmitState,
}

impl EditPropertyPage {
    pub fn new(id: Uuid) -> Self {
        Self {
            id,
            gate: AuthGate::CheckingAuth,
            property: LoadState::Idle,
            form: PropertyForm::default(),
            images: Vec::new(),
            new_images: Vec::new(),
            uploading_images: false,
            state: SubmitState::Idle,
        }
    }

    pub fn property(&self) -> &LoadState<Property> {
        &self.property
    }

    pub fn images(&self) -> &[PropertyImage] {
        &self.images
    }

    pub fn new_images(&self) -> &[FileUpload] {
        &self.new_images
    }

    pub fn is_uploading_images(&self) -> bool {
        self.uploading_images
    }

    pub fn state(&self) -> &SubmitState {
        &self.state
    }

    pub fn mount(&mut self, backend: &dyn Backend) -> Option<Route> {
        self.gate = AuthGate::check(backend);
        if !self.gate.is_authenticated() {
            return self.gate.redirect().cloned();
        }

        self.property = LoadState::Loading;
        match backend.get_property(self.id) {
            Ok(property) => {
                self.form = PropertyForm::from_property(&property);
                self.images = property.property_images.clone();
                self.property = LoadState::Loaded(property);
            }
            Err(e) => {
                error!(error = %e, property_id = %self.id, "error fetching property");
                if !self.gate.reject_if_unauthorized(&e) {
                    self.property = LoadState::Failed(e.user_message());
                }
            }
        }
        self.gate.redirect().cloned()
    }

    pub fn add_image(&mut self, file: FileUpload) {
        self.new_images.push(file);
    }

    pub fn remove_new_image(&mut self, index: usize) {
        if index < self.new_images.len() {
            self.new_images.remove(index);
        }
    }

    /// Save the form, then upload pending images as non-primary.
    pub fn submit(&mut self, backend: &dyn Backend, now: Instant) -> Result<Option<Route>, FormError> {
        let update = self.form.to_update()?;
        self.state = SubmitState::Submitting;

        let result = backend
            .update_property(self.id, &update)
            .and_then(|_| self.upload_pending(backend));
        self.uploading_images = false;

        match result {
            Ok(()) => self.state = SubmitState::succeed_for(now, SHORT_CONFIRMATION),
            Err(e) => {
                if self.gate.reject_if_unauthorized(&e) {
                    self.state = SubmitState::Idle;
                } else {
                    self.state = SubmitState::Failed(display_error("error updating property", &e));
                }
            }
        }
        Ok(self.gate.redirect().cloned())
    }

    fn upload_pending(&mut self, backend: &dyn Backend) -> Result<(), ApiError> {
        if self.new_images.is_empty() {
            return Ok(());
        }
        self.uploading_images = true;
        while !self.new_images.is_empty() {
            let image = backend.upload_property_image(self.id, &self.new_images[0], false)?;
            self.images.push(image);
            self.new_images.remove(0);
        }
        Ok(())
    }

    pub fn delete_image(&mut self, backend: &dyn Backend, image_id: Uuid) -> Option<Route> {
        match backend.delete_property_image(image_id) {
            Ok(()) => self.images.retain(|img| img.id != image_id),
            Err(e) => {
                error!(error = %e, image_id = %image_id, "error deleting image");
                if !self.gate.reject_if_unauthorized(&e) {
                    self.state = SubmitState::Failed(IMAGE_DELETE_FAILED_MESSAGE.to_string());
                }
            }
        }
        self.gate.redirect().cloned()
    }

    pub fn tick(&mut self, now: Instant) {
        self.state.tick(now);
    }
}
