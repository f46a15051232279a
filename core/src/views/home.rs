//! Home page: available listings, featured first, plus the search form.

use std::cmp::Ordering;

use tracing::error;

use crate::backend::Backend;
use crate::filters::PropertyFilters;
use crate::routes::Route;
use crate::types::Property;

use super::LoadState;

/// Featured listings first; within each group, newest first.
pub fn sort_featured_first(properties: &mut [Property]) {
    properties.sort_by(|a, b| match (a.featured, b.featured) {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        _ => b.created_at.cmp(&a.created_at),
    });
}

#[derive(Debug, Default)]
pub struct HomePage {
    state: LoadState<Vec<Property>>,
}

impl HomePage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &LoadState<Vec<Property>> {
        &self.state
    }

    pub fn mount(&mut self, backend: &dyn Backend) {
        self.state = LoadState::Loading;
        let properties = match backend.list_properties(&PropertyFilters::available()) {
            Ok(mut properties) => {
                sort_featured_first(&mut properties);
                properties
            }
            Err(e) => {
                error!(error = %e, "error fetching properties");
                Vec::new()
            }
        };
        self.state = LoadState::Loaded(properties);
    }

    pub fn properties(&self) -> &[Property] {
        self.state.data().map(Vec::as_slice).unwrap_or_default()
    }
}

/// The hero search box. Raw input strings, as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchForm {
    pub location: String,
    pub min_price: String,
    pub max_price: String,
}

impl SearchForm {
    /// Where submitting the form navigates to.
    pub fn submit(&self) -> Route {
        let filters = PropertyFilters {
            location: Some(self.location.trim().to_string()),
            min_price: self.min_price.trim().parse().ok(),
            max_price: self.max_price.trim().parse().ok(),
            ..Default::default()
        };
        Route::Properties {
            query: filters.search_query(),
        }
    }
}
