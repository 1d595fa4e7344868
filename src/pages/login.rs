use tracing::info;

use super::{failed, reject, PageError};
use crate::routes::Route;
use crate::state::AppState;
use crate::utils::notifier::Toast;

pub const LOGIN_SUCCEEDED: &str = "Logged in successfully!";
pub const LOGIN_FAILED: &str = "Failed to log in. Please check your credentials.";

#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        LoginForm {
            email: email.into(),
            password: password.into(),
        }
    }

    /// Logs in and returns where the user lands: the admin dashboard for
    /// admins, the user dashboard for everyone else.
    pub async fn submit(&self, state: &AppState) -> Result<Route, PageError> {
        if self.email.trim().is_empty() || self.password.is_empty() {
            return Err(reject(state, "Email and password are required"));
        }

        let identity = state
            .session
            .login(self.email.trim(), &self.password)
            .await
            .map_err(|e| failed(state, e, LOGIN_FAILED))?;

        state.notifier.notify(Toast::success(LOGIN_SUCCEEDED));
        let landing = if identity.is_admin() {
            Route::AdminDashboard
        } else {
            Route::Dashboard
        };
        info!("Login landed on {}", landing);
        Ok(landing)
    }
}
