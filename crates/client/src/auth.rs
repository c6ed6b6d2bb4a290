//! Authenticated identity shared across stores.
//!
//! The session is an explicit, injected collaborator rather than ambient
//! global state: every store receives a handle at construction time, which is
//! what allows tests to build isolated store instances per case.
//!
//! Stores use the session two ways: they read [`AuthSession::current`] to
//! gate cart/order operations before any request is made, and they subscribe
//! to identity changes (login, logout, account switch) to reload or clear
//! their state.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::info;

/// The authenticated user, as the client layer knows them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// Server-assigned user ID.
    pub user_id: String,
    /// Account email, for display.
    pub email: String,
}

impl Identity {
    #[must_use]
    pub fn new(user_id: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            email: email.into(),
        }
    }
}

/// Shared session handle. Cheap to clone; all clones observe the same
/// identity.
#[derive(Clone)]
pub struct AuthSession {
    identity: Arc<watch::Sender<Option<Identity>>>,
}

impl AuthSession {
    /// Create a session with no authenticated identity.
    #[must_use]
    pub fn new() -> Self {
        let (tx, _) = watch::channel(None);
        Self {
            identity: Arc::new(tx),
        }
    }

    /// The current identity, if any.
    #[must_use]
    pub fn current(&self) -> Option<Identity> {
        self.identity.borrow().clone()
    }

    /// Whether an identity is present.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.identity.borrow().is_some()
    }

    /// Record a successful login.
    pub fn login(&self, identity: Identity) {
        info!(user_id = %identity.user_id, "identity signed in");
        self.identity.send_replace(Some(identity));
    }

    /// Clear the identity.
    pub fn logout(&self) {
        info!("identity signed out");
        self.identity.send_replace(None);
    }

    /// Replace the identity without an intermediate signed-out state, so
    /// subscribers observe exactly one change.
    pub fn switch_account(&self, identity: Identity) {
        info!(user_id = %identity.user_id, "identity switched");
        self.identity.send_replace(Some(identity));
    }

    /// Subscribe to identity changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Option<Identity>> {
        self.identity.subscribe()
    }
}

impl Default for AuthSession {
    fn default() -> Self {
        Self::new()
    }
}
