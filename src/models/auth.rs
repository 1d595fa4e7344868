//! Request and response bodies of the `api/auth/*` endpoints.

use serde::{Deserialize, Serialize};

use super::identity::{Identity, Role};

#[derive(Serialize, Debug, Clone)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// `POST api/auth/login` answers with the identity fields and the token side by side.
#[derive(Deserialize, Debug, Clone)]
pub struct LoginResponse {
    #[serde(flatten)]
    pub identity: Identity,
    pub token: String,
}

/// `GET api/auth/verify` wraps the identity in a `user` field.
#[derive(Deserialize, Debug, Clone)]
pub struct VerifyResponse {
    pub user: Identity,
}

/// Body for both `api/auth/register` and `api/auth/signup`.
#[derive(Serialize, Debug, Clone, Default)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}
