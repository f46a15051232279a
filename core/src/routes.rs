//! Site pages and their locale-prefixed paths.

use uuid::Uuid;

use crate::locale::Locale;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    /// Listing page; the query is the URL search string without `?`.
    Properties { query: String },
    PropertyDetail(Uuid),
    Contact,
    Admin,
    AdminLogin,
    ListProperty,
    EditProperty(Uuid),
}

impl Route {
    pub fn path(&self, locale: Locale) -> String {
        let code = locale.code();
        match self {
            Route::Home => format!("/{code}"),
            Route::Properties { query } if query.is_empty() => format!("/{code}/properties"),
            Route::Properties { query } => format!("/{code}/properties?{query}"),
            Route::PropertyDetail(id) => format!("/{code}/properties/{id}"),
            Route::Contact => format!("/{code}/contact"),
            Route::Admin => format!("/{code}/admin"),
            Route::AdminLogin => format!("/{code}/admin-login"),
            Route::ListProperty => format!("/{code}/list-property"),
            Route::EditProperty(id) => format!("/{code}/edit-property/{id}"),
        }
    }

    /// Pages that require a signed-in admin.
    pub fn requires_admin(&self) -> bool {
        matches!(self, Route::Admin | Route::ListProperty | Route::EditProperty(_))
    }
}
