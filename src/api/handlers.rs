//! REST API handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use super::types::{ErrorResponse, IngredientQuery};
use crate::favorites::FavoritesStore;
use crate::recipes::{Recipe, RecipeCatalog};

/// Error half of handler results.
pub type ApiError = (StatusCode, Json<ErrorResponse>);

/// Shared application state.
#[derive(Clone, Default)]
pub struct AppState {
    pub catalog: Arc<RecipeCatalog>,
    pub favorites: Arc<FavoritesStore>,
}

impl AppState {
    /// State over `catalog` with memory-only favorites.
    pub fn new(catalog: RecipeCatalog) -> Self {
        Self {
            catalog: Arc::new(catalog),
            favorites: Arc::new(FavoritesStore::in_memory()),
        }
    }

    pub fn with_favorites(mut self, favorites: Arc<FavoritesStore>) -> Self {
        self.favorites = favorites;
        self
    }
}

fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (status, Json(ErrorResponse::new(status, message)))
}

fn parse_id(raw: &str) -> Result<i64, ApiError> {
    raw.parse().map_err(|_| {
        api_error(
            StatusCode::BAD_REQUEST,
            format!("invalid recipe id '{}'", raw),
        )
    })
}

fn lookup(state: &AppState, id: i64) -> Result<Recipe, ApiError> {
    state.catalog.get(id).cloned().ok_or_else(|| {
        (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::recipe_not_found(id)),
        )
    })
}

/// Health check endpoint.
pub async fn health() -> &'static str {
    "OK"
}

/// API information endpoint.
pub async fn api_info(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "name": "recipe-box",
        "version": env!("CARGO_PKG_VERSION"),
        "recipes": state.catalog.len(),
        "favorites": state.favorites.count(),
    }))
}

/// List the whole catalog.
pub async fn list_recipes(State(state): State<AppState>) -> Json<Vec<Recipe>> {
    Json(state.catalog.all().to_vec())
}

/// Recipes using any of the posted ingredients.
pub async fn match_recipes(
    State(state): State<AppState>,
    Json(query): Json<IngredientQuery>,
) -> Json<Vec<Recipe>> {
    let matching: Vec<Recipe> = state
        .catalog
        .matching(&query.ingredients)
        .into_iter()
        .cloned()
        .collect();
    tracing::debug!(
        selected = query.ingredients.len(),
        matched = matching.len(),
        "ingredient match"
    );
    Json(matching)
}

/// Look up one recipe by id.
pub async fn get_recipe(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Recipe>, ApiError> {
    let id = parse_id(&id)?;
    lookup(&state, id).map(Json)
}

/// List favorite recipes.
pub async fn list_favorites(State(state): State<AppState>) -> Json<Vec<Recipe>> {
    Json(state.favorites.list())
}

/// Mark a catalog recipe as favorite.
///
/// `201` when newly added, `200` when it already was a favorite.
pub async fn add_favorite(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<Recipe>), ApiError> {
    let recipe = lookup(&state, parse_id(&id)?)?;
    match state.favorites.add(&recipe) {
        Ok(true) => {
            tracing::info!(id = recipe.id, "favorite added");
            Ok((StatusCode::CREATED, Json(recipe)))
        }
        Ok(false) => Ok((StatusCode::OK, Json(recipe))),
        Err(e) => {
            tracing::warn!(error = %e, id = recipe.id, "failed to save favorite");
            Err(api_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
        }
    }
}

/// Remove a favorite.
pub async fn remove_favorite(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;
    match state.favorites.remove(id) {
        Ok(true) => {
            tracing::info!(id, "favorite removed");
            Ok(StatusCode::NO_CONTENT)
        }
        Ok(false) => Err(api_error(
            StatusCode::NOT_FOUND,
            format!("Recipe with id {} is not a favorite", id),
        )),
        Err(e) => {
            tracing::warn!(error = %e, id, "failed to save favorites");
            Err(api_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
        }
    }
}
