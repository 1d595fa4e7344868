use super::{failed, reject, PageError};
use crate::models::{Role, SignupRequest};
use crate::routes::Route;
use crate::state::AppState;

pub const SIGNUP_FAILED: &str = "Failed to create account";

/// The public registration form. Every field is required.
#[derive(Debug, Clone)]
pub struct SignupForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub address: String,
    pub role: Role,
}

impl Default for SignupForm {
    fn default() -> Self {
        SignupForm {
            name: String::new(),
            email: String::new(),
            phone: String::new(),
            password: String::new(),
            address: String::new(),
            role: Role::User,
        }
    }
}

impl SignupForm {
    fn missing_field(&self) -> Option<&'static str> {
        [
            ("name", &self.name),
            ("email", &self.email),
            ("phone", &self.phone),
            ("password", &self.password),
            ("address", &self.address),
        ]
        .into_iter()
        .find(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field)
    }

    /// `POST api/auth/register`; on success the user is sent to the login page.
    pub async fn submit(&self, state: &AppState) -> Result<Route, PageError> {
        if let Some(field) = self.missing_field() {
            return Err(reject(state, &format!("Please fill in the {} field", field)));
        }
        let request = SignupRequest {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            password: self.password.clone(),
            role: Some(self.role),
            phone: Some(self.phone.trim().to_string()),
            address: Some(self.address.trim().to_string()),
        };
        match state.api.register(&request).await {
            Ok(()) => Ok(Route::Login),
            Err(e) => {
                let message = e.user_message(SIGNUP_FAILED);
                Err(failed(state, e, &message))
            }
        }
    }
}

/// Creates an administrator account through `POST api/auth/signup`.
#[derive(Debug, Clone, Default)]
pub struct AdminSignupForm {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl AdminSignupForm {
    pub async fn submit(&self, state: &AppState) -> Result<Route, PageError> {
        if self.name.trim().is_empty()
            || self.email.trim().is_empty()
            || self.password.is_empty()
        {
            return Err(reject(state, "Name, email and password are required"));
        }
        let request = SignupRequest {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            password: self.password.clone(),
            role: Some(Role::Admin),
            ..SignupRequest::default()
        };
        state
            .api
            .signup(&request)
            .await
            .map_err(|e| failed(state, e, SIGNUP_FAILED))?;
        Ok(Route::Login)
    }
}
