//! Headless view models for the site's pages.
//!
//! # Design
//! Each page is a struct owning its lifecycle state. Callers drive it with
//! methods (`mount`, `submit`, `tick`, ...) and read back what to show or
//! where to navigate. Data-bound pages move through
//! `Idle -> Loading -> Loaded | Failed`; admin pages first pass an
//! `AuthGate`; forms carry a `SubmitState` whose success message expires
//! after a fixed delay observed by `tick(now)`.

pub mod admin;
pub mod contact;
pub mod detail;
pub mod forms;
pub mod home;
pub mod listing;
pub mod login;
pub mod property_form;

use std::time::{Duration, Instant};

use tracing::error;

use crate::backend::Backend;
use crate::error::ApiError;
use crate::routes::Route;

pub use admin::{AdminDashboard, ContactSettings};
pub use contact::ContactPage;
pub use detail::{DetailView, InquiryForm, PropertyDetailPage};
pub use forms::FormError;
pub use home::{sort_featured_first, HomePage, SearchForm};
pub use listing::{ListingView, PropertiesPage};
pub use login::AdminLoginPage;
pub use property_form::{EditPropertyPage, ListPropertyPage, PropertyForm};

/// How long the inquiry and edit-property confirmations stay visible.
pub const SHORT_CONFIRMATION: Duration = Duration::from_secs(3);

/// How long the contact page confirmation stays visible.
pub const LONG_CONFIRMATION: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, PartialEq, Default)]
pub enum LoadState<T> {
    #[default]
    Idle,
    Loading,
    Loaded(T),
    Failed(String),
}

impl<T> LoadState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            LoadState::Loaded(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            LoadState::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// Gate in front of admin-only pages.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AuthGate {
    #[default]
    CheckingAuth,
    Authenticated,
    /// Nothing is rendered while the redirect happens.
    Redirecting(Route),
}

impl AuthGate {
    pub fn check(backend: &dyn Backend) -> Self {
        if backend.is_authenticated() {
            AuthGate::Authenticated
        } else {
            AuthGate::Redirecting(Route::AdminLogin)
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthGate::Authenticated)
    }

    pub fn redirect(&self) -> Option<&Route> {
        match self {
            AuthGate::Redirecting(route) => Some(route),
            _ => None,
        }
    }

    /// Send the admin back to the login page when `err` is a 401.
    fn reject_if_unauthorized(&mut self, err: &ApiError) -> bool {
        if err.is_unauthorized() {
            *self = AuthGate::Redirecting(Route::AdminLogin);
            true
        } else {
            false
        }
    }
}

/// Form submission sub-state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SubmitState {
    #[default]
    Idle,
    Submitting,
    /// Succeeded. With a deadline, reverts to `Idle` once it passes.
    Submitted { until: Option<Instant> },
    Failed(String),
}

impl SubmitState {
    /// The submit control is disabled and shows a spinner.
    pub fn is_submitting(&self) -> bool {
        matches!(self, SubmitState::Submitting)
    }

    pub fn is_submitted(&self) -> bool {
        matches!(self, SubmitState::Submitted { .. })
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            SubmitState::Failed(message) => Some(message),
            _ => None,
        }
    }

    pub fn succeed_for(now: Instant, display: Duration) -> Self {
        SubmitState::Submitted {
            until: Some(now + display),
        }
    }

    /// Expire a transient success message.
    pub fn tick(&mut self, now: Instant) {
        if let SubmitState::Submitted { until: Some(deadline) } = self {
            if now >= *deadline {
                *self = SubmitState::Idle;
            }
        }
    }
}

/// Text to show for a failed action. Server messages are shown verbatim;
/// anything else is logged and replaced with a generic sentence.
pub fn display_error(context: &str, err: &ApiError) -> String {
    if !matches!(err, ApiError::Http { .. }) {
        error!(error = %err, "{context}");
    }
    err.user_message()
}

#[cfg(test)]
pub(crate) mod fake;
