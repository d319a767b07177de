//! Reactive auth state storage.

use std::sync::Arc;

use tokio::sync::watch;

use super::{AuthState, Session, User};

/// Observable storage for one application's [`AuthState`].
///
/// Anyone holding the store may read it or subscribe to changes. Mutation
/// is crate-private and performed by the auth controller only. Every write
/// is a single `watch` update, so readers never see a half-applied change.
#[derive(Debug)]
pub struct AuthStore {
    state: watch::Sender<AuthState>,
}

impl AuthStore {
    /// Create a new store in the uninitialized, signed-out state.
    pub fn new() -> Self {
        Self {
            state: watch::Sender::new(AuthState::default()),
        }
    }

    /// Clone the current state.
    pub fn snapshot(&self) -> AuthState {
        self.state.borrow().clone()
    }

    /// Subscribe to state changes.
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    pub fn user(&self) -> Option<User> {
        self.state.borrow().user.clone()
    }

    pub fn session(&self) -> Option<Session> {
        self.state.borrow().session.clone()
    }

    pub fn error(&self) -> Option<String> {
        self.state.borrow().error.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().loading
    }

    pub fn is_initialized(&self) -> bool {
        self.state.borrow().initialized
    }

    /// Whether a user is signed in. Derived from `user`.
    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated()
    }

    /// Mark an operation as started: raise `loading` and clear `error`.
    ///
    /// `loading` drops again when the returned guard is dropped, on every
    /// exit path of the operation.
    pub(crate) fn begin_operation(self: &Arc<Self>) -> OperationGuard {
        self.state.send_modify(|s| {
            s.in_flight += 1;
            s.loading = true;
            s.error = None;
        });
        OperationGuard {
            store: Arc::clone(self),
        }
    }

    pub(crate) fn set_error(&self, message: impl Into<String>) {
        let message = message.into();
        self.state.send_modify(|s| s.error = Some(message));
    }

    pub(crate) fn clear_error(&self) {
        self.state.send_if_modified(|s| s.error.take().is_some());
    }

    /// Overwrite session and user from a session payload.
    ///
    /// Applying the same payload twice notifies subscribers only once.
    pub(crate) fn apply_session(&self, session: Option<Session>) -> bool {
        self.state.send_if_modified(|s| s.apply_session(session))
    }

    /// Flip `initialized` to true. Later calls are no-ops.
    pub(crate) fn mark_initialized(&self) {
        self.state.send_if_modified(|s| {
            if s.initialized {
                false
            } else {
                s.initialized = true;
                true
            }
        });
    }

    pub(crate) fn replace_user(&self, user: User) -> bool {
        self.state.send_if_modified(|s| s.replace_user(user))
    }

    fn end_operation(&self) {
        self.state.send_modify(|s| {
            s.in_flight = s.in_flight.saturating_sub(1);
            s.loading = s.in_flight > 0;
        });
    }
}

impl Default for AuthStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Keeps `loading` raised for the lifetime of one operation.
#[must_use = "loading is cleared as soon as the guard is dropped"]
#[derive(Debug)]
pub struct OperationGuard {
    store: Arc<AuthStore>,
}

impl Drop for OperationGuard {
    fn drop(&mut self) {
        self.store.end_operation();
    }
}
