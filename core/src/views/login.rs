use crate::backend::Backend;
use crate::routes::Route;
use crate::types::LoginCredentials;

use super::{display_error, SubmitState};

pub const LOGIN_ERROR_MESSAGE: &str = "Invalid email or password";

#[derive(Debug, Default)]
pub struct AdminLoginPage {
    pub email: String,
    pub password: String,
    state: SubmitState,
}

impl AdminLoginPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SubmitState {
        &self.state
    }

    /// Returns the page to navigate to after a successful sign-in.
    pub fn submit(&mut self, backend: &dyn Backend) -> Option<Route> {
        self.state = SubmitState::Submitting;
        let credentials = LoginCredentials {
            email: self.email.trim().to_string(),
            password: self.password.clone(),
        };

        match backend.login(&credentials) {
            Ok(response) if response.success => {
                self.state = SubmitState::Submitted { until: None };
                Some(Route::Admin)
            }
            Ok(response) => {
                let message = if response.message.is_empty() {
                    LOGIN_ERROR_MESSAGE.to_string()
                } else {
                    response.message
                };
                self.state = SubmitState::Failed(message);
                None
            }
            Err(e) => {
                self.state = SubmitState::Failed(display_error("login failed", &e));
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::views::fake::{FakeBackend, Failure};

    #[test]
    fn success_navigates_to_dashboard() {
        let backend = FakeBackend::new();
        let mut page = AdminLoginPage::new();
        page.email = " admin@example.com ".to_string();
        page.password = "correct horse".to_string();

        assert_eq!(page.submit(&backend), Some(Route::Admin));
        assert!(backend.is_authenticated());
        assert_eq!(backend.calls(), vec!["login:admin@example.com"]);
    }

    #[test]
    fn unsuccessful_response_shows_default_message() {
        let backend = FakeBackend::new();
        let mut page = AdminLoginPage::new();
        page.email = "admin@example.com".to_string();
        page.password = "wrong".to_string();

        assert_eq!(page.submit(&backend), None);
        assert_eq!(page.state().error(), Some(LOGIN_ERROR_MESSAGE));
    }

    #[test]
    fn http_error_is_shown_verbatim() {
        let backend = FakeBackend::new();
        backend.fail("login", Failure::Http(401, "Invalid Email or password."));
        let mut page = AdminLoginPage::new();

        assert_eq!(page.submit(&backend), None);
        assert_eq!(page.state().error(), Some("Invalid Email or password."));
    }
}
