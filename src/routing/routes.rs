//! Route classification.

use serde::{Deserialize, Serialize};

/// Access class of a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteClass {
    /// Login, signup, callback and reset pages. Only for signed-out users.
    Auth,
    /// Reachable by anyone.
    Public,
    /// Requires a signed-in user.
    Protected,
}

/// Well-known routes and the prefixes used to classify paths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouteTable {
    /// Landing page, public.
    pub home: String,
    /// Login page, where unauthenticated users are sent.
    pub login: String,
    /// Prefix of auth-only pages.
    pub auth_prefix: String,
    /// Prefix of public pages besides home.
    pub public_prefix: String,
}

impl Default for RouteTable {
    fn default() -> Self {
        Self {
            home: "/".to_string(),
            login: "/auth/login".to_string(),
            auth_prefix: "/auth/".to_string(),
            public_prefix: "/public/".to_string(),
        }
    }
}

impl RouteTable {
    /// Classify `path` by prefix. Anything unmatched is protected.
    pub fn classify(&self, path: &str) -> RouteClass {
        if self.is_auth_route(path) {
            RouteClass::Auth
        } else if path == self.home || path.starts_with(&self.public_prefix) {
            RouteClass::Public
        } else {
            RouteClass::Protected
        }
    }

    pub fn is_auth_route(&self, path: &str) -> bool {
        path.starts_with(&self.auth_prefix)
    }

    /// Page the OAuth provider sends the browser back to.
    pub fn callback_path(&self) -> String {
        format!("{}callback", self.auth_prefix)
    }

    /// Page linked from password reset emails.
    pub fn reset_password_path(&self) -> String {
        format!("{}reset-password", self.auth_prefix)
    }
}
