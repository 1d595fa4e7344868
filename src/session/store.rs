use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::Session;
use crate::api::{ApiError, AuthBackend};
use crate::models::Identity;
use crate::storage::{LocalStorage, StorageError};

/// Local storage key holding the bearer token. Only `SessionStore` writes it.
pub const TOKEN_KEY: &str = "token";

#[derive(Debug, thiserror::Error)]
pub enum LoginError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("could not persist the session token: {0}")]
    Storage(#[from] StorageError),
}

/// Owns the Session and the persisted token.
///
/// Lifecycle: `verify()` once at start-up, `login()`/`logout()` afterwards.
/// Every transition is published on a watch channel so views re-render from the
/// new snapshot instead of reloading.
pub struct SessionStore {
    backend: Arc<dyn AuthBackend>,
    storage: Arc<dyn LocalStorage>,
    state: watch::Sender<Session>,
}

impl SessionStore {
    pub fn new(backend: Arc<dyn AuthBackend>, storage: Arc<dyn LocalStorage>) -> Self {
        let (state, _) = watch::channel(Session::empty());
        SessionStore {
            backend,
            storage,
            state,
        }
    }

    /// A copy of the current Session.
    pub fn snapshot(&self) -> Session {
        self.state.borrow().clone()
    }

    /// Receives every Session transition made after this call.
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.state.subscribe()
    }

    /// The persisted bearer token, if any. Unreadable storage counts as no token.
    pub fn token(&self) -> Option<String> {
        match self.storage.get_item(TOKEN_KEY) {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(e) => {
                warn!("Could not read the stored token: {}", e);
                None
            }
        }
    }

    pub fn require_token(&self) -> Result<String, ApiError> {
        self.token().ok_or(ApiError::MissingToken)
    }

    /// Re-derives the Session from the persisted token.
    ///
    /// Fail-closed: any problem (transport, non-2xx, malformed body) discards the
    /// token and leaves the Session empty. Never returns an error.
    pub async fn verify(&self) -> Session {
        let Some(token) = self.token() else {
            debug!("No stored token; session stays empty");
            self.publish(Session::empty());
            return self.snapshot();
        };

        match self.backend.verify(&token).await {
            Ok(identity) => {
                info!(
                    event_name = "session.verify.success",
                    event_domain = "session",
                    backend = self.backend.get_name(),
                    role = %identity.role,
                    "stored token verified"
                );
                self.publish(Session::from_identity(identity));
            }
            Err(e) => {
                warn!(
                    event_name = "session.verify.failure",
                    event_domain = "session",
                    backend = self.backend.get_name(),
                    error = %e,
                    "stored token rejected; clearing session"
                );
                self.discard_token();
                self.publish(Session::empty());
            }
        }
        self.snapshot()
    }

    /// Logs in, persists the returned token and populates the Session.
    ///
    /// On failure nothing changes and the error goes back to the caller, who owns
    /// the user-facing message.
    pub async fn login(&self, email: &str, password: &str) -> Result<Identity, LoginError> {
        let response = self.backend.login(email, password).await?;
        self.storage.set_item(TOKEN_KEY, &response.token)?;
        info!(
            event_name = "session.login",
            event_domain = "session",
            role = %response.identity.role,
            "logged in"
        );
        self.publish(Session::from_identity(response.identity.clone()));
        Ok(response.identity)
    }

    /// Forgets the token and empties the Session. No backend call is made.
    pub fn logout(&self) {
        self.discard_token();
        info!(
            event_name = "session.logout",
            event_domain = "session",
            "logged out"
        );
        self.publish(Session::empty());
    }

    fn discard_token(&self) {
        if let Err(e) = self.storage.remove_item(TOKEN_KEY) {
            warn!("Could not remove the stored token: {}", e);
        }
    }

    /// Replaces the Session, waking subscribers only when it actually changed.
    fn publish(&self, next: Session) {
        self.state.send_if_modified(|current| {
            if *current == next {
                false
            } else {
                *current = next;
                true
            }
        });
    }
}
