//! Navigation-time route guards.

use std::sync::Arc;

use super::{NavigateOptions, Navigator, RouteClass, RouteTable};
use crate::session::AuthStore;

/// Outcome of evaluating a guard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Let the navigation through unchanged.
    Proceed,
    /// Send the user to this path instead.
    Redirect(String),
}

/// Gate evaluated before every navigation.
///
/// Reads the auth store synchronously and never writes to it.
#[derive(Debug, Clone)]
pub struct RouteGuard {
    store: Arc<AuthStore>,
    routes: RouteTable,
}

impl RouteGuard {
    pub fn new(store: Arc<AuthStore>, routes: RouteTable) -> Self {
        Self { store, routes }
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    /// Guard for protected pages.
    ///
    /// Before the first session resolution has settled this always
    /// proceeds; the bootstrap hook corrects the location afterwards.
    pub fn require_auth(&self) -> GuardDecision {
        let state = self.store.snapshot();
        if !state.initialized {
            return GuardDecision::Proceed;
        }
        if !state.is_authenticated() {
            return GuardDecision::Redirect(self.routes.login.clone());
        }
        GuardDecision::Proceed
    }

    /// Guard for auth-only pages: signed-in users are sent home.
    pub fn guest_only(&self) -> GuardDecision {
        if self.store.is_authenticated() {
            GuardDecision::Redirect(self.routes.home.clone())
        } else {
            GuardDecision::Proceed
        }
    }

    /// Apply the guard matching the class of `target`.
    pub fn check(&self, target: &str) -> GuardDecision {
        match self.routes.classify(target) {
            RouteClass::Auth => self.guest_only(),
            RouteClass::Public => GuardDecision::Proceed,
            RouteClass::Protected => self.require_auth(),
        }
    }

    /// Navigate to `target`, or to wherever the guard redirects.
    ///
    /// Returns the path actually navigated to.
    pub fn navigate(&self, navigator: &dyn Navigator, target: &str) -> String {
        let destination = match self.check(target) {
            GuardDecision::Proceed => target.to_string(),
            GuardDecision::Redirect(to) => {
                tracing::debug!(path = target, redirect = %to, "route guard redirect");
                to
            }
        };
        navigator.navigate(&destination, NavigateOptions::push());
        destination
    }
}
