//! Synchronous client core for the property listings site.
//!
//! # Overview
//! Builds `HttpRequest` values and interprets `HttpResponse` values; a
//! `Transport` performs the round-trip in between. Resource modules wrap
//! each REST endpoint, `Backend` exposes them as one object-safe service,
//! and `views` holds headless page state driven by that service.
//!
//! # Design
//! - `ApiClient` holds the base URL, a `Session` and a transport. The
//!   session persists the bearer token through a `CredentialStore` and picks
//!   up the rotated token from every response's `Authorization` header.
//! - Errors carry the server's message when there is one, so pages can show
//!   it verbatim.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod backend;
pub mod client;
pub mod config;
pub mod credentials;
pub mod error;
pub mod filters;
pub mod http;
pub mod locale;
pub mod multipart;
pub mod resources;
pub mod routes;
pub mod session;
pub mod transport;
pub mod types;
pub mod views;

pub use backend::{connect, Backend, RailsBackend};
pub use client::ApiClient;
pub use config::AppConfig;
pub use credentials::{CredentialStore, FileCredentialStore, MemoryCredentialStore};
pub use error::ApiError;
pub use filters::PropertyFilters;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use locale::Locale;
pub use multipart::FileUpload;
pub use routes::Route;
pub use session::Session;
pub use transport::{Transport, UreqTransport};
pub use types::{
    Category, ContactInfo, CreateInquiry, CreateProperty, Inquiry, LoginCredentials, LoginResponse, Property,
    PropertyImage, PropertyStatus, UpdateContactInfo, UpdateProperty,
};
