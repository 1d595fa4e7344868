//! Shared application state.
//!
//! Everything a page controller needs: configuration, the backend client,
//! local storage, the session store, the router and the toast sink.

use std::sync::Arc;

use crate::api::ApiClient;
use crate::config::ConfigV1;
use crate::routes::Router;
use crate::session::{Session, SessionStore};
use crate::storage::LocalStorage;
use crate::utils::notifier::Notifier;

/// Application state shared by every page controller. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration loaded at startup.
    pub config: Arc<ConfigV1>,
    /// Backend client; its clones share one connection pool.
    pub api: ApiClient,
    /// Persisted key/value state (token, theme).
    pub storage: Arc<dyn LocalStorage>,
    /// Owner of the Session and the bearer token.
    pub session: Arc<SessionStore>,
    pub router: Router,
    pub notifier: Arc<dyn Notifier>,
}

impl AppState {
    pub fn session(&self) -> Session {
        self.session.snapshot()
    }
}
