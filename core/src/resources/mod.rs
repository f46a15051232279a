//! One stateless accessor module per backend resource.
//!
//! Each function maps a single domain operation onto one `ApiClient` call.
//! Request bodies use the backend's root-key wrapping
//! (`{"property": {...}}` and friends).

pub mod auth;
pub mod categories;
pub mod contact;
pub mod inquiries;
pub mod properties;
