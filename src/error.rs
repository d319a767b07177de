//! Error types for recipe-box.

use thiserror::Error;

use crate::backend::BackendError;

/// Main error type for recipe-box operations.
#[derive(Error, Debug)]
pub enum RecipeBoxError {
    /// The backend service rejected or failed the request.
    ///
    /// Displays as the backend's own message so it can be shown to users as-is.
    #[error(transparent)]
    Backend(#[from] BackendError),

    /// Caller-supplied input failed validation before reaching the backend.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// OAuth provider outside the supported set.
    #[error("unsupported OAuth provider: {0}")]
    UnsupportedProvider(String),

    /// Operation needs a signed-in user.
    #[error("not authenticated")]
    NotAuthenticated,

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Internal lock was poisoned.
    #[error("internal lock poisoned")]
    LockPoisoned,
}

/// Convenience Result type for recipe-box operations.
pub type Result<T> = std::result::Result<T, RecipeBoxError>;
