//! User and session records issued by the backend.

use serde::{Deserialize, Serialize};

/// Free-form user metadata attached at sign-up or profile update.
pub type Metadata = serde_json::Map<String, serde_json::Value>;

/// An authenticated user as reported by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Opaque backend identifier.
    pub id: String,
    /// Primary email address, if the account has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Application-defined metadata.
    #[serde(default)]
    pub metadata: Metadata,
}

impl User {
    /// Create a user with only an identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: None,
            metadata: Metadata::new(),
        }
    }

    /// Set the email address.
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}

/// Backend-issued proof of authentication.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    /// Expiry as unix seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<u64>,
    /// The user this session belongs to.
    pub user: User,
}

impl Session {
    /// Create a session for `user` with the given access token.
    pub fn new(access_token: impl Into<String>, user: User) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: None,
            expires_at: None,
            user,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_builder() {
        let user = User::new("u1").with_email("a@b.com");
        assert_eq!(user.id, "u1");
        assert_eq!(user.email.as_deref(), Some("a@b.com"));
        assert!(user.metadata.is_empty());
    }

    #[test]
    fn test_session_from_minimal_json() {
        let json = r#"{"access_token": "t1", "user": {"id": "u1"}}"#;
        let session: Session = serde_json::from_str(json).unwrap();
        assert_eq!(session.access_token, "t1");
        assert_eq!(session.user.id, "u1");
        assert!(session.refresh_token.is_none());
        assert!(session.user.email.is_none());
    }

    #[test]
    fn test_session_skips_empty_optionals() {
        let session = Session::new("t1", User::new("u1"));
        let json = serde_json::to_string(&session).unwrap();
        assert!(!json.contains("refresh_token"));
        assert!(!json.contains("expires_at"));
    }
}
