//! Public contact page.

use std::time::Instant;

use tracing::error;

use crate::backend::Backend;
use crate::types::ContactInfo;

use super::forms::{self, FormError};
use super::{LoadState, SubmitState, LONG_CONFIRMATION};

/// Opening hours shown until the backend provides its own.
pub const DEFAULT_HOURS: [&str; 3] = ["Mon-Fri: 9AM-6PM", "Sat: 10AM-4PM", "Sun: Closed"];

#[derive(Debug, Default)]
pub struct ContactPage {
    info: LoadState<ContactInfo>,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub message: String,
    submit: SubmitState,
}

impl ContactPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mount(&mut self, backend: &dyn Backend) {
        self.info = LoadState::Loading;
        self.info = match backend.get_contact_info() {
            Ok(info) => LoadState::Loaded(info),
            Err(e) => {
                error!(error = %e, "error fetching contact info");
                LoadState::Failed(e.user_message())
            }
        };
    }

    pub fn info(&self) -> Option<&ContactInfo> {
        self.info.data()
    }

    pub fn hours_lines(&self) -> Vec<&str> {
        match self.info() {
            Some(info) if !info.hours.is_empty() => info.hours_lines(),
            _ => DEFAULT_HOURS.to_vec(),
        }
    }

    pub fn submit_state(&self) -> &SubmitState {
        &self.submit
    }

    /// The message form is not sent anywhere; it only confirms locally.
    pub fn submit(&mut self, now: Instant) -> Result<(), FormError> {
        forms::required("name", &self.name)?;
        forms::email("email", &self.email)?;
        forms::required("message", &self.message)?;

        self.name.clear();
        self.email.clear();
        self.phone.clear();
        self.message.clear();
        self.submit = SubmitState::succeed_for(now, LONG_CONFIRMATION);
        Ok(())
    }

    pub fn tick(&mut self, now: Instant) {
        self.submit.tick(now);
    }
}
