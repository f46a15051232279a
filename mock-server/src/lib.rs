//! In-memory stand-in for the listings JSON API.
//!
//! Routes live under `/api/v1`. Admin routes require `Authorization: Bearer`;
//! each admin response carries a fresh token and the one presented is revoked.

use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{FromRequestParts, Multipart, Path, Query, State},
    http::{header, request::Parts, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{debug, info};
use uuid::Uuid;

pub const API_PREFIX: &str = "/api/v1";
pub const ADMIN_EMAIL: &str = "admin@example.com";
pub const ADMIN_PASSWORD: &str = "password123";

const STATUSES: [&str; 4] = ["available", "sold", "pending", "rented"];

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Property {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub address: String,
    pub price: Decimal,
    pub bedrooms: Option<u32>,
    pub bathrooms: Option<u32>,
    pub area: Option<Decimal>,
    pub property_type: String,
    pub status: String,
    pub featured: bool,
    pub category_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by: Uuid,
    pub property_images: Vec<PropertyImage>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PropertyImage {
    pub id: Uuid,
    pub property_id: Uuid,
    pub image_url: String,
    pub blob_url: Option<String>,
    pub is_primary: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Inquiry {
    pub id: Uuid,
    pub property_id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub message: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ContactInfo {
    pub id: Uuid,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub hours: String,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Serialize)]
pub struct AdminUser {
    pub id: Uuid,
    pub email: String,
    pub is_admin: bool,
}

/// Property fields as sent by the client; every field is optional so one
/// type serves create and partial update.
#[derive(Debug, Default, Deserialize)]
pub struct PropertyParams {
    pub title: Option<String>,
    pub description: Option<String>,
    pub address: Option<String>,
    pub price: Option<Decimal>,
    pub bedrooms: Option<u32>,
    pub bathrooms: Option<u32>,
    pub area: Option<Decimal>,
    pub property_type: Option<String>,
    pub status: Option<String>,
    pub featured: Option<bool>,
    pub category_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct InquiryParams {
    pub property_id: Uuid,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    pub phone: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ContactParams {
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub hours: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub available: Option<bool>,
    pub featured: Option<bool>,
    pub property_type: Option<String>,
    pub location: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
}

#[derive(Deserialize)]
struct PropertyBody {
    property: PropertyParams,
}

#[derive(Deserialize)]
struct InquiryBody {
    inquiry: InquiryParams,
}

#[derive(Deserialize)]
struct ContactBody {
    contact_info: ContactParams,
}

#[derive(Deserialize)]
struct Credentials {
    email: String,
    password: String,
}

#[derive(Deserialize)]
struct LoginBody {
    admin_user: Credentials,
}

/// Uploaded file as read from the multipart body.
#[derive(Debug)]
pub struct Upload {
    pub file_name: String,
    pub size: usize,
    pub is_primary: bool,
}

/// Error responses, shaped like the Rails backend's.
#[derive(Debug)]
pub enum ApiError {
    Unauthorized(&'static str),
    InvalidLogin,
    NotFound(String),
    Invalid(Vec<String>),
    BadRequest(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Unauthorized(message) => (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": "Unauthorized", "message": message })),
            )
                .into_response(),
            ApiError::InvalidLogin => (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": "Invalid Email or password." })),
            )
                .into_response(),
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, Json(json!({ "error": message }))).into_response(),
            ApiError::Invalid(errors) => {
                (StatusCode::UNPROCESSABLE_ENTITY, Json(json!({ "errors": errors }))).into_response()
            }
            ApiError::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
            }
        }
    }
}

struct Account {
    id: Uuid,
    email: String,
    password: String,
}

/// All server state behind one lock.
pub struct Store {
    properties: Vec<Property>,
    inquiries: Vec<Inquiry>,
    contact: ContactInfo,
    categories: Vec<Category>,
    accounts: Vec<Account>,
    tokens: HashMap<String, Uuid>,
}

impl Store {
    /// One admin account, a contact record and two categories.
    pub fn seeded() -> Self {
        let now = Utc::now();
        Self {
            properties: Vec::new(),
            inquiries: Vec::new(),
            contact: ContactInfo {
                id: Uuid::new_v4(),
                phone: "+971 4 123 4567".to_string(),
                email: "info@example.com".to_string(),
                address: "Business Bay, Dubai".to_string(),
                hours: "Mon-Fri: 9AM-6PM\nSat: 10AM-4PM\nSun: Closed".to_string(),
                updated_at: now,
            },
            categories: ["Residential", "Commercial"]
                .into_iter()
                .map(|name| Category {
                    id: Uuid::new_v4(),
                    name: name.to_string(),
                    created_at: now,
                })
                .collect(),
            accounts: vec![Account {
                id: Uuid::new_v4(),
                email: ADMIN_EMAIL.to_string(),
                password: ADMIN_PASSWORD.to_string(),
            }],
            tokens: HashMap::new(),
        }
    }

    fn issue_token(&mut self, admin_id: Uuid) -> String {
        let token = Uuid::new_v4().simple().to_string();
        self.tokens.insert(token.clone(), admin_id);
        token
    }

    /// Revoke `old` and issue its replacement.
    fn rotate(&mut self, old: &str, admin_id: Uuid) -> String {
        self.tokens.remove(old);
        self.issue_token(admin_id)
    }

    fn sign_in(&mut self, email: &str, password: &str) -> Option<(AdminUser, String)> {
        let account = self
            .accounts
            .iter()
            .find(|a| a.email.eq_ignore_ascii_case(email) && a.password == password)?;
        let admin = AdminUser {
            id: account.id,
            email: account.email.clone(),
            is_admin: true,
        };
        let token = self.issue_token(admin.id);
        Some((admin, token))
    }

    pub fn list_properties(&self, params: &ListParams) -> Vec<Property> {
        let location = params.location.as_deref().map(str::to_lowercase);
        let mut found: Vec<Property> = self
            .properties
            .iter()
            .filter(|p| params.available != Some(true) || p.status == "available")
            .filter(|p| params.featured != Some(true) || p.featured)
            .filter(|p| params.property_type.as_deref().map_or(true, |t| p.property_type == t))
            .filter(|p| {
                location
                    .as_deref()
                    .map_or(true, |l| p.address.to_lowercase().contains(l))
            })
            .filter(|p| params.min_price.map_or(true, |min| p.price >= min))
            .filter(|p| params.max_price.map_or(true, |max| p.price <= max))
            .cloned()
            .collect();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        found
    }

    pub fn property(&self, id: Uuid) -> Result<&Property, ApiError> {
        self.properties
            .iter()
            .find(|p| p.id == id)
            .ok_or_else(|| ApiError::NotFound(format!("Couldn't find Property with 'id'={id}")))
    }

    fn property_mut(&mut self, id: Uuid) -> Result<&mut Property, ApiError> {
        self.properties
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| ApiError::NotFound(format!("Couldn't find Property with 'id'={id}")))
    }

    pub fn create_property(&mut self, admin_id: Uuid, params: PropertyParams) -> Result<Property, ApiError> {
        let mut errors = Vec::new();
        if params.price.is_none() {
            errors.push("Price can't be blank".to_string());
        }
        if params.property_type.as_deref().map_or(true, |t| t.trim().is_empty()) {
            errors.push("Property type can't be blank".to_string());
        }
        let title = params.title.clone().unwrap_or_default();
        let address = params.address.clone().unwrap_or_default();
        errors.extend(validate(&params, &title, &address));
        if !errors.is_empty() {
            return Err(ApiError::Invalid(errors));
        }

        let now = Utc::now();
        let property = Property {
            id: Uuid::new_v4(),
            title,
            description: params.description,
            address,
            price: params.price.unwrap_or_default(),
            bedrooms: params.bedrooms,
            bathrooms: params.bathrooms,
            area: params.area,
            property_type: params.property_type.unwrap_or_default(),
            status: params.status.unwrap_or_else(|| "available".to_string()),
            featured: params.featured.unwrap_or(false),
            category_id: params.category_id,
            created_at: now,
            updated_at: now,
            created_by: admin_id,
            property_images: Vec::new(),
        };
        self.properties.push(property.clone());
        Ok(property)
    }

    pub fn update_property(&mut self, id: Uuid, params: PropertyParams) -> Result<Property, ApiError> {
        let existing = self.property(id)?;
        let title = params.title.clone().unwrap_or_else(|| existing.title.clone());
        let address = params.address.clone().unwrap_or_else(|| existing.address.clone());
        let errors = validate(&params, &title, &address);
        if !errors.is_empty() {
            return Err(ApiError::Invalid(errors));
        }

        let property = self.property_mut(id)?;
        property.title = title;
        property.address = address;
        if let Some(description) = params.description {
            property.description = Some(description);
        }
        if let Some(price) = params.price {
            property.price = price;
        }
        if params.bedrooms.is_some() {
            property.bedrooms = params.bedrooms;
        }
        if params.bathrooms.is_some() {
            property.bathrooms = params.bathrooms;
        }
        if params.area.is_some() {
            property.area = params.area;
        }
        if let Some(property_type) = params.property_type {
            property.property_type = property_type;
        }
        if let Some(status) = params.status {
            property.status = status;
        }
        if let Some(featured) = params.featured {
            property.featured = featured;
        }
        if params.category_id.is_some() {
            property.category_id = params.category_id;
        }
        property.updated_at = Utc::now();
        Ok(property.clone())
    }

    pub fn delete_property(&mut self, id: Uuid) -> Result<(), ApiError> {
        self.property(id)?;
        self.properties.retain(|p| p.id != id);
        self.inquiries.retain(|i| i.property_id != id);
        Ok(())
    }

    /// Attach an image. A new primary image demotes the previous one.
    pub fn add_image(&mut self, property_id: Uuid, upload: Upload) -> Result<PropertyImage, ApiError> {
        let property = self.property_mut(property_id)?;
        if upload.is_primary {
            for image in &mut property.property_images {
                image.is_primary = false;
            }
        }
        let id = Uuid::new_v4();
        let image = PropertyImage {
            id,
            property_id,
            image_url: format!("/uploads/{id}/{}", upload.file_name),
            blob_url: None,
            is_primary: upload.is_primary,
            created_at: Utc::now(),
        };
        property.property_images.push(image.clone());
        debug!(%property_id, file = %upload.file_name, size = upload.size, "image stored");
        Ok(image)
    }

    pub fn delete_image(&mut self, image_id: Uuid) -> Result<(), ApiError> {
        for property in &mut self.properties {
            let before = property.property_images.len();
            property.property_images.retain(|img| img.id != image_id);
            if property.property_images.len() != before {
                return Ok(());
            }
        }
        Err(ApiError::NotFound(format!(
            "Couldn't find PropertyImage with 'id'={image_id}"
        )))
    }

    pub fn create_inquiry(&mut self, params: InquiryParams) -> Result<Inquiry, ApiError> {
        self.property(params.property_id)?;
        let mut errors = Vec::new();
        if params.name.trim().is_empty() {
            errors.push("Name can't be blank".to_string());
        }
        if !params.email.contains('@') {
            errors.push("Email is invalid".to_string());
        }
        if !errors.is_empty() {
            return Err(ApiError::Invalid(errors));
        }

        let inquiry = Inquiry {
            id: Uuid::new_v4(),
            property_id: params.property_id,
            name: params.name,
            email: params.email,
            phone: params.phone,
            message: params.message,
            created_at: Utc::now(),
        };
        self.inquiries.push(inquiry.clone());
        Ok(inquiry)
    }

    pub fn inquiry(&self, id: Uuid) -> Result<&Inquiry, ApiError> {
        self.inquiries
            .iter()
            .find(|i| i.id == id)
            .ok_or_else(|| ApiError::NotFound(format!("Couldn't find Inquiry with 'id'={id}")))
    }

    pub fn update_contact(&mut self, params: ContactParams) -> ContactInfo {
        let contact = &mut self.contact;
        if let Some(phone) = params.phone {
            contact.phone = phone;
        }
        if let Some(email) = params.email {
            contact.email = email;
        }
        if let Some(address) = params.address {
            contact.address = address;
        }
        if let Some(hours) = params.hours {
            contact.hours = hours;
        }
        contact.updated_at = Utc::now();
        contact.clone()
    }

    pub fn category(&self, id: Uuid) -> Result<&Category, ApiError> {
        self.categories
            .iter()
            .find(|c| c.id == id)
            .ok_or_else(|| ApiError::NotFound(format!("Couldn't find Category with 'id'={id}")))
    }
}

fn validate(params: &PropertyParams, title: &str, address: &str) -> Vec<String> {
    let mut errors = Vec::new();
    if title.trim().is_empty() {
        errors.push("Title can't be blank".to_string());
    }
    if address.trim().is_empty() {
        errors.push("Address can't be blank".to_string());
    }
    if params.price.is_some_and(|p| p.is_sign_negative() && !p.is_zero()) {
        errors.push("Price must be greater than or equal to 0".to_string());
    }
    if let Some(status) = &params.status {
        if !STATUSES.contains(&status.as_str()) {
            errors.push("Status is not included in the list".to_string());
        }
    }
    errors
}

pub type Db = Arc<RwLock<Store>>;

/// A request authenticated by a live bearer token.
pub struct Admin {
    id: Uuid,
    token: String,
}

impl FromRequestParts<Db> for Admin {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, db: &Db) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(ApiError::Unauthorized("You need to sign in or sign up before continuing."))?;

        match db.read().await.tokens.get(token) {
            Some(id) => Ok(Admin {
                id: *id,
                token: token.to_string(),
            }),
            None => Err(ApiError::Unauthorized("Signature has expired or token has been revoked.")),
        }
    }
}

impl Admin {
    /// Answer with `result`, swapping the presented token for a new one.
    async fn respond(self, db: &Db, result: impl IntoResponse) -> Response {
        let token = db.write().await.rotate(&self.token, self.id);
        with_token(result.into_response(), &token)
    }
}

fn with_token(mut response: Response, token: &str) -> Response {
    if let Ok(value) = HeaderValue::from_str(&format!("Bearer {token}")) {
        response.headers_mut().insert(header::AUTHORIZATION, value);
    }
    response
}

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::seeded()));
    let api = Router::new()
        .route("/login", post(login))
        .route("/logout", delete(logout))
        .route("/properties", get(list_properties).post(create_property))
        .route(
            "/properties/{id}",
            get(get_property)
                .patch(update_property)
                .put(update_property)
                .delete(delete_property),
        )
        .route("/properties/{id}/images", post(upload_image))
        .route("/property_images/{id}", delete(delete_image))
        .route("/inquiries", get(list_inquiries).post(create_inquiry))
        .route("/inquiries/{id}", get(get_inquiry))
        .route("/contact_info", get(get_contact).patch(update_contact).put(update_contact))
        .route("/categories", get(list_categories))
        .route("/categories/{id}", get(get_category))
        .with_state(db);
    Router::new().nest(API_PREFIX, api)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn login(State(db): State<Db>, Json(body): Json<LoginBody>) -> Response {
    let credentials = body.admin_user;
    let signed_in = db.write().await.sign_in(&credentials.email, &credentials.password);
    match signed_in {
        Some((admin, token)) => {
            info!(email = %admin.email, "admin signed in");
            let body = json!({ "success": true, "message": "Logged in successfully.", "admin": admin });
            with_token(Json(body).into_response(), &token)
        }
        None => ApiError::InvalidLogin.into_response(),
    }
}

async fn logout(State(db): State<Db>, admin: Admin) -> StatusCode {
    db.write().await.tokens.remove(&admin.token);
    StatusCode::NO_CONTENT
}

async fn list_properties(State(db): State<Db>, Query(params): Query<ListParams>) -> Json<Vec<Property>> {
    Json(db.read().await.list_properties(&params))
}

async fn get_property(State(db): State<Db>, Path(id): Path<Uuid>) -> Result<Json<Property>, ApiError> {
    db.read().await.property(id).cloned().map(Json)
}

async fn create_property(State(db): State<Db>, admin: Admin, Json(body): Json<PropertyBody>) -> Response {
    let result = db.write().await.create_property(admin.id, body.property);
    admin
        .respond(&db, result.map(|p| (StatusCode::CREATED, Json(p))))
        .await
}

async fn update_property(
    State(db): State<Db>,
    admin: Admin,
    Path(id): Path<Uuid>,
    Json(body): Json<PropertyBody>,
) -> Response {
    let result = db.write().await.update_property(id, body.property);
    admin.respond(&db, result.map(Json)).await
}

async fn delete_property(State(db): State<Db>, admin: Admin, Path(id): Path<Uuid>) -> Response {
    let result = db.write().await.delete_property(id);
    admin
        .respond(&db, result.map(|()| StatusCode::NO_CONTENT))
        .await
}

async fn upload_image(
    State(db): State<Db>,
    admin: Admin,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> Response {
    let result = match read_upload(&mut multipart).await {
        Ok(upload) => db.write().await.add_image(id, upload),
        Err(e) => Err(e),
    };
    admin
        .respond(&db, result.map(|img| (StatusCode::CREATED, Json(img))))
        .await
}

async fn read_upload(multipart: &mut Multipart) -> Result<Upload, ApiError> {
    let mut file = None;
    let mut is_primary = false;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "image" => {
                let file_name = field.file_name().unwrap_or("upload").to_string();
                let bytes = field.bytes().await.map_err(|e| ApiError::BadRequest(e.to_string()))?;
                file = Some((file_name, bytes.len()));
            }
            "is_primary" => {
                let value = field.text().await.map_err(|e| ApiError::BadRequest(e.to_string()))?;
                is_primary = value == "true";
            }
            _ => {}
        }
    }

    let (file_name, size) = file.ok_or_else(|| ApiError::Invalid(vec!["Image can't be blank".to_string()]))?;
    Ok(Upload {
        file_name,
        size,
        is_primary,
    })
}

async fn delete_image(State(db): State<Db>, admin: Admin, Path(id): Path<Uuid>) -> Response {
    let result = db.write().await.delete_image(id);
    admin
        .respond(&db, result.map(|()| StatusCode::NO_CONTENT))
        .await
}

async fn list_inquiries(State(db): State<Db>, admin: Admin) -> Response {
    let mut inquiries = db.read().await.inquiries.clone();
    inquiries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    admin.respond(&db, Json(inquiries)).await
}

async fn get_inquiry(State(db): State<Db>, admin: Admin, Path(id): Path<Uuid>) -> Response {
    let result = db.read().await.inquiry(id).cloned();
    admin.respond(&db, result.map(Json)).await
}

async fn create_inquiry(
    State(db): State<Db>,
    Json(body): Json<InquiryBody>,
) -> Result<(StatusCode, Json<Inquiry>), ApiError> {
    let inquiry = db.write().await.create_inquiry(body.inquiry)?;
    Ok((StatusCode::CREATED, Json(inquiry)))
}

async fn get_contact(State(db): State<Db>) -> Json<ContactInfo> {
    Json(db.read().await.contact.clone())
}

async fn update_contact(State(db): State<Db>, admin: Admin, Json(body): Json<ContactBody>) -> Response {
    let contact = db.write().await.update_contact(body.contact_info);
    admin.respond(&db, Json(contact)).await
}

async fn list_categories(State(db): State<Db>) -> Json<Vec<Category>> {
    Json(db.read().await.categories.clone())
}

async fn get_category(State(db): State<Db>, Path(id): Path<Uuid>) -> Result<Json<Category>, ApiError> {
    db.read().await.category(id).cloned().map(Json)
}
