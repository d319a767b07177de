//! Auth controller settings.

use serde::{Deserialize, Serialize};

use crate::routing::RouteTable;

/// Settings the auth controller needs besides its collaborators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Public origin of the site, used to build OAuth and reset redirect URLs.
    pub site_url: String,
    /// Route table for redirects and classification.
    pub routes: RouteTable,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            site_url: "http://localhost:3000".to_string(),
            routes: RouteTable::default(),
        }
    }
}

impl AuthConfig {
    /// Absolute URL the OAuth provider redirects back to.
    pub fn oauth_redirect_url(&self) -> String {
        self.absolute(&self.routes.callback_path())
    }

    /// Absolute URL linked from password reset emails.
    pub fn reset_redirect_url(&self) -> String {
        self.absolute(&self.routes.reset_password_path())
    }

    fn absolute(&self, path: &str) -> String {
        format!("{}{}", self.site_url.trim_end_matches('/'), path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redirect_urls() {
        let config = AuthConfig {
            site_url: "https://recipes.example.com/".into(),
            ..AuthConfig::default()
        };
        assert_eq!(
            config.oauth_redirect_url(),
            "https://recipes.example.com/auth/callback"
        );
        assert_eq!(
            config.reset_redirect_url(),
            "https://recipes.example.com/auth/reset-password"
        );
    }
}
