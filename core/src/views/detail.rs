//! Property detail page and its inquiry form.

use std::time::Instant;

use tracing::error;
use uuid::Uuid;

use crate::backend::Backend;
use crate::types::{CreateInquiry, Property};

use super::forms::{self, FormError};
use super::{LoadState, SubmitState, SHORT_CONFIRMATION};

/// Shown when an inquiry cannot be delivered, whatever the cause.
pub const INQUIRY_FAILED_MESSAGE: &str = "Failed to submit inquiry. Please try again.";

/// Image shown when a listing has none.
pub const PLACEHOLDER_IMAGE: &str = "/placeholder.svg";

#[derive(Debug, PartialEq)]
pub enum DetailView<'a> {
    Loading,
    NotFound,
    Loaded(&'a Property),
}

#[derive(Debug)]
pub struct PropertyDetailPage {
    id: Uuid,
    state: LoadState<Property>,
    pub inquiry: InquiryForm,
}

impl PropertyDetailPage {
    pub fn new(id: Uuid) -> Self {
        Self {
            id,
            state: LoadState::Idle,
            inquiry: InquiryForm::new(id),
        }
    }

    pub fn mount(&mut self, backend: &dyn Backend) {
        self.state = LoadState::Loading;
        self.state = match backend.get_property(self.id) {
            Ok(property) => LoadState::Loaded(property),
            Err(e) => {
                error!(error = %e, property_id = %self.id, "error fetching property");
                LoadState::Failed(e.user_message())
            }
        };
    }

    pub fn view(&self) -> DetailView<'_> {
        match &self.state {
            LoadState::Loaded(property) => DetailView::Loaded(property),
            LoadState::Failed(_) => DetailView::NotFound,
            LoadState::Idle | LoadState::Loading => DetailView::Loading,
        }
    }

    /// Hero image: primary (or first) image, blob URL preferred.
    pub fn main_image_url(&self) -> &str {
        self.state
            .data()
            .and_then(Property::cover_image)
            .map(|img| img.blob_url.as_deref().unwrap_or(&img.image_url))
            .unwrap_or(PLACEHOLDER_IMAGE)
    }
}

/// Visitor inquiry about one listing.
#[derive(Debug, Clone)]
pub struct InquiryForm {
    property_id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub message: String,
    state: SubmitState,
}

impl InquiryForm {
    pub fn new(property_id: Uuid) -> Self {
        Self {
            property_id,
            name: String::new(),
            email: String::new(),
            phone: String::new(),
            message: String::new(),
            state: SubmitState::Idle,
        }
    }

    pub fn state(&self) -> &SubmitState {
        &self.state
    }

    pub fn validate(&self) -> Result<CreateInquiry, FormError> {
        Ok(CreateInquiry {
            property_id: self.property_id,
            name: forms::required("name", &self.name)?,
            email: forms::email("email", &self.email)?,
            phone: forms::optional(&self.phone),
            message: forms::optional(&self.message),
        })
    }

    /// Validation failures are returned before anything is sent.
    pub fn submit(&mut self, backend: &dyn Backend, now: Instant) -> Result<(), FormError> {
        let data = self.validate()?;
        self.state = SubmitState::Submitting;

        match backend.create_inquiry(&data) {
            Ok(_) => {
                self.name.clear();
                self.email.clear();
                self.phone.clear();
                self.message.clear();
                self.state = SubmitState::succeed_for(now, SHORT_CONFIRMATION);
            }
            Err(e) => {
                error!(error = %e, "error submitting inquiry");
                self.state = SubmitState::Failed(INQUIRY_FAILED_MESSAGE.to_string());
            }
        }
        Ok(())
    }

    pub fn tick(&mut self, now: Instant) {
        self.state.tick(now);
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use chrono::Utc;

    use super::*;
    use crate::types::PropertyImage;
    use crate::views::fake::{property, FakeBackend, Failure};

    fn filled(form: &mut InquiryForm) {
        form.name = "Layla".to_string();
        form.email = "layla@example.com".to_string();
        form.message = "Is parking included?".to_string();
    }

    #[test]
    fn loads_property_and_picks_primary_image() {
        let mut listing = property(1, false, 1);
        listing.property_images = vec![
            PropertyImage {
                id: Uuid::from_u128(10),
                property_id: listing.id,
                image_url: "/first.jpg".to_string(),
                blob_url: None,
                is_primary: false,
                created_at: Utc::now(),
            },
            PropertyImage {
                id: Uuid::from_u128(11),
                property_id: listing.id,
                image_url: "/primary.jpg".to_string(),
                blob_url: Some("https://cdn.example.com/primary.jpg".to_string()),
                is_primary: true,
                created_at: Utc::now(),
            },
        ];
        let backend = FakeBackend::new().with_properties(vec![listing]);
        let mut page = PropertyDetailPage::new(Uuid::from_u128(1));
        assert_eq!(page.view(), DetailView::Loading);

        page.mount(&backend);
        assert!(matches!(page.view(), DetailView::Loaded(p) if p.title == "Listing 1"));
        assert_eq!(page.main_image_url(), "https://cdn.example.com/primary.jpg");
    }

    #[test]
    fn missing_property_is_not_found() {
        let backend = FakeBackend::new();
        let mut page = PropertyDetailPage::new(Uuid::from_u128(5));
        page.mount(&backend);
        assert_eq!(page.view(), DetailView::NotFound);
        assert_eq!(page.main_image_url(), PLACEHOLDER_IMAGE);
    }

    #[test]
    fn invalid_inquiry_sends_nothing() {
        let backend = FakeBackend::new();
        let mut form = InquiryForm::new(Uuid::from_u128(1));
        form.name = "Omar".to_string();
        form.email = "not-an-email".to_string();

        let err = form.submit(&backend, Instant::now()).unwrap_err();
        assert!(matches!(err, FormError::Invalid { field: "email", .. }));
        assert!(backend.calls().is_empty());
        assert_eq!(form.state(), &SubmitState::Idle);
    }

    #[test]
    fn successful_inquiry_clears_form_then_reverts() {
        let backend = FakeBackend::new();
        let mut form = InquiryForm::new(Uuid::from_u128(1));
        filled(&mut form);
        let now = Instant::now();

        form.submit(&backend, now).unwrap();
        assert!(form.state().is_submitted());
        assert!(form.name.is_empty() && form.email.is_empty() && form.message.is_empty());
        assert_eq!(backend.inquiries.lock().unwrap()[0].message.as_deref(), Some("Is parking included?"));
        assert!(backend.inquiries.lock().unwrap()[0].phone.is_none());

        form.tick(now + Duration::from_secs(1));
        assert!(form.state().is_submitted());
        form.tick(now + Duration::from_secs(3));
        assert_eq!(form.state(), &SubmitState::Idle);
    }

    #[test]
    fn failed_inquiry_keeps_input() {
        let backend = FakeBackend::new();
        backend.fail("create_inquiry", Failure::Http(422, "Email is invalid"));
        let mut form = InquiryForm::new(Uuid::from_u128(1));
        filled(&mut form);

        form.submit(&backend, Instant::now()).unwrap();
        assert_eq!(form.state().error(), Some(INQUIRY_FAILED_MESSAGE));
        assert_eq!(form.name, "Layla");
    }
}
