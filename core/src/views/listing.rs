//! Public listing page driven by the URL query.

use tracing::error;

use crate::backend::Backend;
use crate::filters::PropertyFilters;
use crate::types::Property;

use super::LoadState;

/// What the listing page shows.
#[derive(Debug, PartialEq)]
pub enum ListingView<'a> {
    Loading,
    /// "No properties found" with a link home.
    Empty,
    Results(&'a [Property]),
}

#[derive(Debug, Default)]
pub struct PropertiesPage {
    query: Option<String>,
    filters: PropertyFilters,
    state: LoadState<Vec<Property>>,
}

impl PropertiesPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filters(&self) -> &PropertyFilters {
        &self.filters
    }

    pub fn state(&self) -> &LoadState<Vec<Property>> {
        &self.state
    }

    /// React to the page's search params. Fetches only when they changed.
    pub fn on_search_params(&mut self, backend: &dyn Backend, query: &str) {
        let query = query.strip_prefix('?').unwrap_or(query);
        if self.query.as_deref() == Some(query) {
            return;
        }
        self.query = Some(query.to_string());
        self.filters = PropertyFilters::from_search_params(query);
        self.state = LoadState::Loading;

        let properties = backend.list_properties(&self.filters).unwrap_or_else(|e| {
            error!(error = %e, "error fetching properties");
            Vec::new()
        });
        self.state = LoadState::Loaded(properties);
    }

    pub fn view(&self) -> ListingView<'_> {
        match &self.state {
            LoadState::Loaded(properties) if properties.is_empty() => ListingView::Empty,
            LoadState::Loaded(properties) => ListingView::Results(properties),
            LoadState::Failed(_) => ListingView::Empty,
            LoadState::Idle | LoadState::Loading => ListingView::Loading,
        }
    }

    /// Number shown in the "N properties found" heading.
    pub fn found(&self) -> usize {
        self.state.data().map_or(0, Vec::len)
    }
}
