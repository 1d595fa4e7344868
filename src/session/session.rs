use crate::models::Identity;

/// Snapshot of the current login.
///
/// Fields are private so the flags can never disagree with the identity:
/// `is_authenticated` holds exactly when an identity is present and
/// `is_admin` exactly when that identity has the admin role.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Session {
    identity: Option<Identity>,
}

impl Session {
    /// The logged-out session.
    pub fn empty() -> Self {
        Session::default()
    }

    pub fn from_identity(identity: Identity) -> Self {
        Session {
            identity: Some(identity),
        }
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.identity.as_ref().map(Identity::is_admin).unwrap_or(false)
    }
}
