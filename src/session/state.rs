//! Auth state snapshot.

use super::{Session, User};

/// Snapshot of the authentication state of one application context.
///
/// `user` and `session` are always set and cleared together. `initialized`
/// flips to true once and never goes back.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthState {
    /// Current user; present iff a session is active.
    pub user: Option<User>,
    /// Current session; present iff a user is signed in.
    pub session: Option<Session>,
    /// True while at least one auth operation is in flight.
    pub loading: bool,
    /// Message of the last failed operation.
    pub error: Option<String>,
    /// True once the first session resolution has settled.
    pub initialized: bool,
    pub(crate) in_flight: u32,
}

impl AuthState {
    /// Whether a user is signed in.
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// Replace session and user from a session payload.
    ///
    /// Returns `true` if anything changed.
    pub(crate) fn apply_session(&mut self, session: Option<Session>) -> bool {
        let user = session.as_ref().map(|s| s.user.clone());
        if self.session == session && self.user == user {
            return false;
        }
        self.session = session;
        self.user = user;
        true
    }

    /// Replace the current user, keeping the session's copy in step.
    ///
    /// Ignored when no session is active. Returns `true` if anything changed.
    pub(crate) fn replace_user(&mut self, user: User) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        if session.user == user && self.user.as_ref() == Some(&user) {
            return false;
        }
        session.user = user.clone();
        self.user = Some(user);
        true
    }
}
