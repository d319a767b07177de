//! Backend service boundary.
//!
//! The hosted backend owns persistence, credential verification and
//! querying. This module defines the interface the rest of the crate talks
//! to, plus [`MemoryBackend`], an in-process implementation.
//!
//! ## Traits
//!
//! - [`AuthBackend`]: session issuance, refresh, and the session-change
//!   event stream
//! - [`RecordBackend`]: generic CRUD over named collections of JSON rows

mod events;
mod memory;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::RecipeBoxError;
use crate::session::{Metadata, Session, User};

pub use events::{AuthEvent, AuthEventKind, SessionSubscription};
pub use memory::MemoryBackend;

/// Failure reported by the backend service.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct BackendError {
    /// Human-readable message from the service.
    pub message: String,
    /// HTTP-like status code, when the service reports one.
    pub status: Option<u16>,
}

impl BackendError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: None,
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }
}

/// OAuth providers accepted for redirect sign-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OAuthProvider {
    Google,
}

impl OAuthProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            OAuthProvider::Google => "google",
        }
    }
}

impl fmt::Display for OAuthProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OAuthProvider {
    type Err = RecipeBoxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "google" => Ok(OAuthProvider::Google),
            other => Err(RecipeBoxError::UnsupportedProvider(other.into())),
        }
    }
}

/// Result of a password sign-in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthResponse {
    pub user: User,
    pub session: Session,
}

/// Result of a sign-up.
///
/// `session` is empty while the account awaits email confirmation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignUpResponse {
    pub user: Option<User>,
    pub session: Option<Session>,
}

/// Where to send the browser to continue an OAuth flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OAuthRedirect {
    pub provider: OAuthProvider,
    pub url: String,
}

/// Acknowledgement of a password reset request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PasswordResetSent {
    pub email: String,
    pub redirect_to: String,
}

/// Fields accepted by a profile update. Unset fields stay unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Metadata>,
}

/// Authentication half of the backend service.
#[async_trait::async_trait]
pub trait AuthBackend: Send + Sync {
    /// Fetch the stored session, if any.
    async fn get_session(&self) -> Result<Option<Session>, BackendError>;

    /// Register a new account.
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        metadata: Option<Metadata>,
    ) -> Result<SignUpResponse, BackendError>;

    /// Exchange credentials for a session.
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthResponse, BackendError>;

    /// Start a redirect-based sign-in with an external provider.
    async fn sign_in_with_oauth(
        &self,
        provider: OAuthProvider,
        redirect_to: &str,
    ) -> Result<OAuthRedirect, BackendError>;

    /// End the current session.
    async fn sign_out(&self) -> Result<(), BackendError>;

    /// Send a password reset email.
    async fn reset_password_for_email(
        &self,
        email: &str,
        redirect_to: &str,
    ) -> Result<PasswordResetSent, BackendError>;

    /// Update the signed-in user's profile.
    async fn update_user(&self, update: &ProfileUpdate) -> Result<User, BackendError>;

    /// Subscribe to session changes for the rest of the process lifetime.
    fn subscribe(&self) -> SessionSubscription;
}

/// Generic record storage half of the backend service.
///
/// Rows are JSON objects carrying an integer `id`.
#[async_trait::async_trait]
pub trait RecordBackend: Send + Sync {
    /// Return every row of a collection.
    async fn select(&self, collection: &str) -> Result<Vec<serde_json::Value>, BackendError>;

    /// Insert rows, returning them as stored.
    async fn insert(
        &self,
        collection: &str,
        rows: Vec<serde_json::Value>,
    ) -> Result<Vec<serde_json::Value>, BackendError>;

    /// Merge `changes` into the row with `id`, returning the updated rows.
    async fn update(
        &self,
        collection: &str,
        id: i64,
        changes: serde_json::Value,
    ) -> Result<Vec<serde_json::Value>, BackendError>;

    /// Delete the row with `id`.
    async fn delete(&self, collection: &str, id: i64) -> Result<(), BackendError>;
}
