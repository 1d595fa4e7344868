//! Application start-up: wires storage, the backend client and the session
//! store together, then restores the session before any route is resolved.

use std::sync::Arc;

use tracing::info;

use crate::api::{ApiClient, ApiError};
use crate::config::ConfigV1;
use crate::routes::Router;
use crate::session::{Session, SessionStore};
use crate::state::AppState;
use crate::storage::{create_storage, LocalStorage};
use crate::utils::notifier::Notifier;

/// Builds the application state from configuration, with storage chosen by `config.storage`.
pub fn build_state(
    config: Arc<ConfigV1>,
    notifier: Arc<dyn Notifier>,
) -> Result<AppState, ApiError> {
    let storage = create_storage(&config.storage);
    build_state_with_storage(config, storage, notifier)
}

/// Same as `build_state` but with caller supplied storage.
pub fn build_state_with_storage(
    config: Arc<ConfigV1>,
    storage: Arc<dyn LocalStorage>,
    notifier: Arc<dyn Notifier>,
) -> Result<AppState, ApiError> {
    let api = ApiClient::new(&config)?;
    let session = Arc::new(SessionStore::new(Arc::new(api.clone()), storage.clone()));
    let router = Router::new(config.guards.authenticated_policy);

    info!(
        backend = api.base_url(),
        policy = ?router.policy(),
        "Application state ready"
    );

    Ok(AppState {
        config,
        api,
        storage,
        session,
        router,
        notifier,
    })
}

/// Restores the session from the persisted token. Must complete before the
/// first navigation; guards only ever see a resolved Session.
pub async fn start(state: &AppState) -> Session {
    let session = state.session.verify().await;
    info!(
        event_name = "app.started",
        event_domain = "app",
        authenticated = session.is_authenticated(),
        admin = session.is_admin(),
        "session restored"
    );
    session
}
