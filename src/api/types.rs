//! API request and response types.

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

/// Request body for ingredient matching.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IngredientQuery {
    /// Selected ingredient names.
    #[serde(default)]
    pub ingredients: Vec<String>,
}

/// Generic API error response.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    /// HTTP status code, repeated in the body.
    pub status_code: u16,
    /// Human-readable error message.
    pub message: String,
}

impl ErrorResponse {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status_code: status.as_u16(),
            message: message.into(),
        }
    }

    pub fn recipe_not_found(id: i64) -> Self {
        Self::new(
            StatusCode::NOT_FOUND,
            format!("Recipe with id {} not found", id),
        )
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }
}
