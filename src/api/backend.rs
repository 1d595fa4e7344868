use async_trait::async_trait;

use super::ApiError;
use crate::models::{Identity, LoginResponse};

/// The authentication half of the backend, as seen by the session store.
///
/// `ApiClient` is the production implementation; tests can plug in fakes.
#[async_trait]
pub trait AuthBackend: Send + Sync {
    fn get_name(&self) -> &str;
    /// Validates a bearer token and returns the account it belongs to.
    async fn verify(&self, token: &str) -> Result<Identity, ApiError>;
    /// Exchanges credentials for a token plus the account's identity.
    async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ApiError>;
}
