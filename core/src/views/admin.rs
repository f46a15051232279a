//! Admin dashboard and contact settings.
//!
//! Both sit behind an `AuthGate`: without a stored token they redirect to the
//! login page before issuing any request, and any 401 afterwards does the
//! same instead of showing an error.

use tracing::{error, info};
use uuid::Uuid;

use crate::backend::Backend;
use crate::filters::PropertyFilters;
use crate::routes::Route;
use crate::types::{ContactInfo, Inquiry, Property, UpdateContactInfo};

use super::{display_error, AuthGate, LoadState, SubmitState};

pub const CONTACT_LOAD_FAILED_MESSAGE: &str = "Failed to load contact information";

pub const CONTACT_SAVED_MESSAGE: &str = "Contact information updated successfully";

#[derive(Debug, Default)]
pub struct AdminDashboard {
    gate: AuthGate,
    properties: LoadState<Vec<Property>>,
    inquiries: LoadState<Vec<Inquiry>>,
    deleting: Option<Uuid>,
    action_error: Option<String>,
}

impl AdminDashboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gate(&self) -> &AuthGate {
        &self.gate
    }

    pub fn redirect(&self) -> Option<&Route> {
        self.gate.redirect()
    }

    pub fn properties(&self) -> &LoadState<Vec<Property>> {
        &self.properties
    }

    pub fn inquiries(&self) -> &LoadState<Vec<Inquiry>> {
        &self.inquiries
    }

    /// Listing currently being deleted, for disabling its row.
    pub fn deleting(&self) -> Option<Uuid> {
        self.deleting
    }

    pub fn action_error(&self) -> Option<&str> {
        self.action_error.as_deref()
    }

    /// Check the session, then load everything. Returns the route to
    /// navigate to when the admin must sign in again.
    pub fn mount(&mut self, backend: &dyn Backend) -> Option<Route> {
        self.gate = AuthGate::check(backend);
        if self.gate.is_authenticated() {
            self.fetch_data(backend);
        }
        self.redirect().cloned()
    }

    fn fetch_data(&mut self, backend: &dyn Backend) {
        self.properties = LoadState::Loading;
        self.inquiries = LoadState::Loading;

        let properties = match backend.list_properties(&PropertyFilters::default()) {
            Ok(properties) => properties,
            Err(e) => {
                error!(error = %e, "error fetching properties");
                if !self.gate.reject_if_unauthorized(&e) {
                    self.properties = LoadState::Failed(e.user_message());
                    self.inquiries = LoadState::Idle;
                }
                return;
            }
        };
        self.properties = LoadState::Loaded(properties);

        self.inquiries = match backend.list_inquiries() {
            Ok(inquiries) => LoadState::Loaded(inquiries),
            Err(e) => {
                error!(error = %e, "error fetching inquiries");
                if self.gate.reject_if_unauthorized(&e) {
                    return;
                }
                LoadState::Failed(e.user_message())
            }
        };
    }

    /// Delete a listing and reload the dashboard.
    pub fn delete_property(&mut self, backend: &dyn Backend, id: Uuid) -> Option<Route> {
        self.deleting = Some(id);
        self.action_error = None;
        let result = backend.delete_property(id);
        self.deleting = None;

        match result {
            Ok(()) => {
                info!(property_id = %id, "property deleted");
                self.fetch_data(backend);
            }
            Err(e) => {
                if !self.gate.reject_if_unauthorized(&e) {
                    self.action_error = Some(display_error("error deleting property", &e));
                }
            }
        }
        self.redirect().cloned()
    }

    pub fn logout(&mut self, backend: &dyn Backend) -> Route {
        backend.logout();
        self.gate = AuthGate::Redirecting(Route::AdminLogin);
        Route::AdminLogin
    }
}

/// Admin form for the contact singleton.
#[derive(Debug, Default)]
pub struct ContactSettings {
    gate: AuthGate,
    info: LoadState<ContactInfo>,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub hours: String,
    state: SubmitState,
}

impl ContactSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn redirect(&self) -> Option<&Route> {
        self.gate.redirect()
    }

    pub fn info(&self) -> &LoadState<ContactInfo> {
        &self.info
    }

    pub fn state(&self) -> &SubmitState {
        &self.state
    }

    /// Shown after a save until the next submit.
    pub fn success_message(&self) -> Option<&'static str> {
        self.state.is_submitted().then_some(CONTACT_SAVED_MESSAGE)
    }

    pub fn mount(&mut self, backend: &dyn Backend) -> Option<Route> {
        self.gate = AuthGate::check(backend);
        if !self.gate.is_authenticated() {
            return self.redirect().cloned();
        }
        self.fetch(backend);
        self.redirect().cloned()
    }

    fn fetch(&mut self, backend: &dyn Backend) {
        self.info = LoadState::Loading;
        match backend.get_contact_info() {
            Ok(info) => self.fill(info),
            Err(e) => {
                error!(error = %e, "error fetching contact info");
                if !self.gate.reject_if_unauthorized(&e) {
                    self.info = LoadState::Failed(CONTACT_LOAD_FAILED_MESSAGE.to_string());
                }
            }
        }
    }

    fn fill(&mut self, info: ContactInfo) {
        self.phone = info.phone.clone();
        self.email = info.email.clone();
        self.address = info.address.clone();
        self.hours = info.hours.clone();
        self.info = LoadState::Loaded(info);
    }

    /// Save the form, then reload the stored record into it.
    pub fn submit(&mut self, backend: &dyn Backend) -> Option<Route> {
        self.state = SubmitState::Submitting;
        let update = UpdateContactInfo {
            phone: Some(self.phone.clone()),
            email: Some(self.email.clone()),
            address: Some(self.address.clone()),
            hours: Some(self.hours.clone()),
        };

        match backend.update_contact_info(&update) {
            Ok(info) => {
                self.fill(info);
                self.state = SubmitState::Submitted { until: None };
                self.fetch(backend);
            }
            Err(e) => {
                if self.gate.reject_if_unauthorized(&e) {
                    self.state = SubmitState::Idle;
                } else {
                    self.state = SubmitState::Failed(display_error("error saving contact info", &e));
                }
            }
        }
        self.redirect().cloned()
    }
}
