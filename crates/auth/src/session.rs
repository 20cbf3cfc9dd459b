//! Session store: the single writer of `user` and `role`.
//!
//! The store is created in a loading state, hydrated once from durable
//! storage, and then mutated only through its own operations. Every committed
//! transition writes the durable record synchronously and then publishes a
//! fresh snapshot to subscribers.
//!
//! ## States
//!
//! ```text
//! Loading ──hydrate──▶ SignedOut ──sign_in/sign_up/federated──▶ Roleless
//!                          ▲                                      │
//!                          │                                 assign_role
//!                          │                                      ▼
//!                          └────────────── sign_out ───────── Authorized
//! ```
//!
//! A successful authentication always lands in `Roleless`, even from
//! `Authorized`, so the role gate reopens after every sign-in.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockWriteGuard};
use std::time::Duration;

use serde::Serialize;
use tokio::sync::watch;

use crate::authenticator::Authenticator;
use crate::error::{AuthError, StorageError};
use crate::roles::Role;
use crate::storage::{KeyValueStore, ROLE_KEY, USER_KEY};
use crate::user::User;

/// Snapshot of the session as seen by guards, gates and views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionState {
    pub user: Option<User>,
    pub role: Option<Role>,
    pub is_loading: bool,
}

impl SessionState {
    /// State before hydration.
    pub fn loading() -> Self {
        Self {
            user: None,
            role: None,
            is_loading: true,
        }
    }

    /// Hydrated, nobody signed in.
    pub fn signed_out() -> Self {
        Self {
            user: None,
            role: None,
            is_loading: false,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }
}

#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Simulated round-trip of every authentication call.
    pub auth_latency: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            auth_latency: Duration::from_millis(500),
        }
    }
}

struct Inner {
    state: RwLock<SessionState>,
    storage: Arc<dyn KeyValueStore>,
    authenticator: Arc<dyn Authenticator>,
    config: SessionConfig,
    in_flight: AtomicUsize,
    notify: watch::Sender<SessionState>,
}

/// Injectable handle to the process-wide session.
///
/// Cheap to clone; all clones share the same state.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<Inner>,
}

impl core::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SessionStore")
            .field("state", &self.snapshot())
            .field("config", &self.inner.config)
            .finish()
    }
}

/// Decrements the in-flight counter when an auth attempt settles.
struct InFlight<'a>(&'a AtomicUsize);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl SessionStore {
    /// Create a store in the loading state. Call [`SessionStore::hydrate`] next.
    pub fn new(
        storage: Arc<dyn KeyValueStore>,
        authenticator: Arc<dyn Authenticator>,
        config: SessionConfig,
    ) -> Self {
        let (notify, _) = watch::channel(SessionState::loading());
        Self {
            inner: Arc::new(Inner {
                state: RwLock::new(SessionState::loading()),
                storage,
                authenticator,
                config,
                in_flight: AtomicUsize::new(0),
                notify,
            }),
        }
    }

    /// Create and immediately hydrate a store.
    pub fn open(
        storage: Arc<dyn KeyValueStore>,
        authenticator: Arc<dyn Authenticator>,
        config: SessionConfig,
    ) -> Self {
        let store = Self::new(storage, authenticator, config);
        store.hydrate();
        store
    }

    pub fn snapshot(&self) -> SessionState {
        self.inner
            .state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.snapshot().is_authenticated()
    }

    pub fn user(&self) -> Option<User> {
        self.snapshot().user
    }

    pub fn role(&self) -> Option<Role> {
        self.snapshot().role
    }

    pub fn is_loading(&self) -> bool {
        self.snapshot().is_loading
    }

    /// Observe committed transitions. The receiver starts at the current state.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.inner.notify.subscribe()
    }

    /// Read the durable record once and leave the loading state.
    ///
    /// A malformed user record discards both keys. A stored role is applied
    /// only when the user record hydrated. Later calls are no-ops.
    pub fn hydrate(&self) {
        let mut state = self.write_state();
        if !state.is_loading {
            return;
        }

        let (user, role) = match self.load_user() {
            Ok(Some(user)) => {
                let role = self.load_role();
                (Some(user), role)
            }
            Ok(None) => (None, None),
            Err(err) => {
                tracing::warn!(error = %err, "discarding unreadable session record");
                self.remove_key(USER_KEY);
                self.remove_key(ROLE_KEY);
                (None, None)
            }
        };

        state.user = user;
        state.role = role;
        state.is_loading = false;

        tracing::info!(
            authenticated = state.is_authenticated(),
            role = state.role.map(|r| r.as_str()),
            "session hydrated"
        );
        self.publish(state);
    }

    /// Sign in with an email and credential.
    pub async fn sign_in(&self, email: &str, credential: &str) -> Result<User, AuthError> {
        let _flight = self.begin_attempt("sign_in");
        tokio::time::sleep(self.inner.config.auth_latency).await;
        let user = self.inner.authenticator.sign_in(email, credential)?;
        self.commit_user(user.clone(), "sign_in");
        Ok(user)
    }

    /// Create an account and sign it in.
    pub async fn sign_up(
        &self,
        name: &str,
        email: &str,
        credential: &str,
    ) -> Result<User, AuthError> {
        let _flight = self.begin_attempt("sign_up");
        tokio::time::sleep(self.inner.config.auth_latency).await;
        let user = self.inner.authenticator.sign_up(name, email, credential)?;
        self.commit_user(user.clone(), "sign_up");
        Ok(user)
    }

    /// Sign in through the federated identity provider.
    ///
    /// On failure the session is left exactly as it was.
    pub async fn sign_in_with_federated_provider(&self) -> Result<User, AuthError> {
        let _flight = self.begin_attempt("federated");
        tokio::time::sleep(self.inner.config.auth_latency).await;
        let user = match self.inner.authenticator.federated() {
            Ok(user) => user,
            Err(err) => {
                tracing::warn!(error = %err, "federated sign-in rejected");
                return Err(err);
            }
        };
        self.commit_user(user.clone(), "federated");
        Ok(user)
    }

    /// Clear the session in memory and in durable storage.
    pub fn sign_out(&self) {
        let mut state = self.write_state();
        state.user = None;
        state.role = None;
        self.remove_key(USER_KEY);
        self.remove_key(ROLE_KEY);

        tracing::info!("signed out");
        self.publish(state);
    }

    /// Commit a role, or clear it with `None`.
    ///
    /// Assigning a role while nobody is signed in is ignored so that `role`
    /// never outlives `user`.
    pub fn assign_role(&self, role: Option<Role>) {
        let mut state = self.write_state();
        if role.is_some() && state.user.is_none() {
            tracing::warn!(role = role.map(|r| r.as_str()), "ignoring role assignment without a user");
            return;
        }

        state.role = role;
        match role {
            Some(role) => self.write_key(ROLE_KEY, role.as_str()),
            None => self.remove_key(ROLE_KEY),
        }

        tracing::info!(role = role.map(|r| r.as_str()), "role assigned");
        self.publish(state);
    }

    fn begin_attempt(&self, kind: &'static str) -> InFlight<'_> {
        let previous = self.inner.in_flight.fetch_add(1, Ordering::SeqCst);
        if previous > 0 {
            // Overlapping attempts both commit; the later completion wins.
            tracing::warn!(kind, pending = previous, "authentication started while another is pending");
        } else {
            tracing::debug!(kind, "authentication started");
        }
        InFlight(&self.inner.in_flight)
    }

    fn commit_user(&self, user: User, kind: &'static str) {
        let mut state = self.write_state();

        match serde_json::to_string(&user) {
            Ok(encoded) => self.write_key(USER_KEY, &encoded),
            Err(err) => tracing::error!(error = %err, "failed to encode user record"),
        }
        self.remove_key(ROLE_KEY);

        tracing::info!(kind, user_id = %user.id, "signed in; role selection required");
        state.user = Some(user);
        state.role = None;
        self.publish(state);
    }

    fn load_user(&self) -> Result<Option<User>, StorageError> {
        let Some(raw) = self.inner.storage.get(USER_KEY)? else {
            return Ok(None);
        };
        let user = serde_json::from_str(&raw).map_err(|source| StorageError::Parse {
            key: USER_KEY,
            source,
        })?;
        Ok(Some(user))
    }

    fn load_role(&self) -> Option<Role> {
        let raw = match self.inner.storage.get(ROLE_KEY) {
            Ok(raw) => raw?,
            Err(err) => {
                tracing::warn!(error = %err, "failed to read stored role");
                return None;
            }
        };
        match raw.parse::<Role>() {
            Ok(role) => Some(role),
            Err(err) => {
                tracing::warn!(error = %err, "discarding unrecognized stored role");
                self.remove_key(ROLE_KEY);
                None
            }
        }
    }

    fn write_key(&self, key: &'static str, value: &str) {
        if let Err(err) = self.inner.storage.set(key, value) {
            tracing::error!(key, error = %err, "failed to persist session key");
        }
    }

    fn remove_key(&self, key: &'static str) {
        if let Err(err) = self.inner.storage.remove(key) {
            tracing::error!(key, error = %err, "failed to remove session key");
        }
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, SessionState> {
        self.inner
            .state
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, state: RwLockWriteGuard<'_, SessionState>) {
        let snapshot = state.clone();
        drop(state);
        self.inner.notify.send_replace(snapshot);
    }
}
