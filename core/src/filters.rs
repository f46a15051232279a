//! Listing search filters.
//!
//! `PropertyFilters` has one optional field per supported backend query
//! parameter. Serialization skips unset, empty and falsy values; a zero price
//! counts as unset. Range sanity (min above max) is left to the server.

use rust_decimal::Decimal;
use url::form_urlencoded;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyFilters {
    pub available: Option<bool>,
    pub featured: Option<bool>,
    pub property_type: Option<String>,
    /// Substring matched against the address.
    pub location: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
}

impl PropertyFilters {
    pub fn available() -> Self {
        Self {
            available: Some(true),
            ..Default::default()
        }
    }

    /// Backend query string, including the leading `?`, or an empty string
    /// when no filter is set.
    pub fn to_query_string(&self) -> String {
        let mut params = form_urlencoded::Serializer::new(String::new());
        let mut any = false;

        if self.available == Some(true) {
            params.append_pair("available", "true");
            any = true;
        }
        if self.featured == Some(true) {
            params.append_pair("featured", "true");
            any = true;
        }
        if let Some(property_type) = non_blank(&self.property_type) {
            params.append_pair("property_type", property_type);
            any = true;
        }
        if let Some(location) = non_blank(&self.location) {
            params.append_pair("location", location);
            any = true;
        }
        if let Some(min) = non_zero(self.min_price) {
            params.append_pair("min_price", &min.to_string());
            any = true;
        }
        if let Some(max) = non_zero(self.max_price) {
            params.append_pair("max_price", &max.to_string());
            any = true;
        }

        if any {
            format!("?{}", params.finish())
        } else {
            String::new()
        }
    }

    /// Filters for the public listing page, read from its URL query
    /// (`location`, `minPrice`, `maxPrice`, `type`). Only available
    /// properties are ever listed there.
    pub fn from_search_params(query: &str) -> Self {
        let mut filters = Self::available();
        let query = query.strip_prefix('?').unwrap_or(query);

        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            let value = value.trim();
            if value.is_empty() {
                continue;
            }
            match key.as_ref() {
                "location" => filters.location = Some(value.to_string()),
                "type" => filters.property_type = Some(value.to_string()),
                "minPrice" => filters.min_price = parse_price(value),
                "maxPrice" => filters.max_price = parse_price(value),
                _ => {}
            }
        }
        filters
    }

    /// URL query for the listing page, as produced by the home page search
    /// form. Counterpart of [`PropertyFilters::from_search_params`].
    pub fn search_query(&self) -> String {
        let mut params = form_urlencoded::Serializer::new(String::new());
        if let Some(location) = non_blank(&self.location) {
            params.append_pair("location", location);
        }
        if let Some(min) = self.min_price {
            params.append_pair("minPrice", &min.to_string());
        }
        if let Some(max) = self.max_price {
            params.append_pair("maxPrice", &max.to_string());
        }
        if let Some(property_type) = non_blank(&self.property_type) {
            params.append_pair("type", property_type);
        }
        params.finish()
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn non_zero(value: Option<Decimal>) -> Option<Decimal> {
    value.filter(|v| !v.is_zero())
}

fn parse_price(value: &str) -> Option<Decimal> {
    value.parse::<Decimal>().ok()
}
