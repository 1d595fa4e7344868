//! Typed access to the assignment marketplace REST backend.

pub mod backend;
pub mod client;
pub mod error;

pub use backend::AuthBackend;
pub use client::ApiClient;
pub use error::ApiError;
