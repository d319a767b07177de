//! User recipes stored in the backend, with a local list cache.

use std::sync::{Arc, RwLock};

use serde_json::Value;
use tracing::{info, warn};

use super::{NewRecipe, Recipe, RecipeUpdate};
use crate::backend::RecordBackend;
use crate::error::RecipeBoxError;
use crate::session::AuthStore;
use crate::Result;

/// Backend collection holding recipes.
pub const RECIPES_COLLECTION: &str = "recipes";

/// Cached recipe list with its own loading/error flags.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecipeListState {
    pub recipes: Vec<Recipe>,
    pub loading: bool,
    pub error: Option<String>,
    /// Operations started and not yet finished.
    pub(crate) in_flight: u32,
}

/// CRUD over the backend's recipe collection.
///
/// Reads the signed-in user from the auth store to stamp ownership on new
/// recipes; never writes to it.
pub struct RecipeRepository {
    backend: Arc<dyn RecordBackend>,
    auth: Arc<AuthStore>,
    state: RwLock<RecipeListState>,
}

impl RecipeRepository {
    pub fn new(backend: Arc<dyn RecordBackend>, auth: Arc<AuthStore>) -> Self {
        Self {
            backend,
            auth,
            state: RwLock::new(RecipeListState::default()),
        }
    }

    /// Snapshot of the cached list and flags.
    pub fn state(&self) -> RecipeListState {
        self.state.read().map(|s| s.clone()).unwrap_or_default()
    }

    pub fn recipes(&self) -> Vec<Recipe> {
        self.state
            .read()
            .map(|s| s.recipes.clone())
            .unwrap_or_default()
    }

    pub fn is_loading(&self) -> bool {
        self.state.read().map(|s| s.loading).unwrap_or(false)
    }

    pub fn error(&self) -> Option<String> {
        self.state.read().ok().and_then(|s| s.error.clone())
    }

    /// Reload the whole collection into the cache.
    ///
    /// Failures are recorded in `error` and leave the cache as it was.
    pub async fn fetch_all(&self) {
        let _loading = self.begin();
        let result = self
            .backend
            .select(RECIPES_COLLECTION)
            .await
            .map_err(RecipeBoxError::from)
            .and_then(decode_rows);

        match result {
            Ok(recipes) => {
                tracing::debug!(count = recipes.len(), "recipes fetched");
                self.write(|s| s.recipes = recipes);
            }
            Err(err) => {
                self.fail("fetching recipes", err);
            }
        }
    }

    /// Create a recipe owned by the signed-in user.
    pub async fn create(&self, recipe: NewRecipe) -> Result<Vec<Recipe>> {
        let _loading = self.begin();
        let Some(user) = self.auth.user() else {
            return Err(self.fail("creating recipe", RecipeBoxError::NotAuthenticated));
        };
        let row = serde_json::to_value(NewRecipe {
            user_id: Some(user.id),
            ..recipe
        })
        .map_err(|e| self.fail("creating recipe", e))?;

        let created = self
            .backend
            .insert(RECIPES_COLLECTION, vec![row])
            .await
            .map_err(RecipeBoxError::from)
            .and_then(decode_rows)
            .map_err(|e| self.fail("creating recipe", e))?;

        info!(count = created.len(), "recipe created");
        self.write(|s| s.recipes.extend(created.iter().cloned()));
        Ok(created)
    }

    /// Apply a partial update to recipe `id` and refresh its cached entry.
    pub async fn update(&self, id: i64, changes: RecipeUpdate) -> Result<Vec<Recipe>> {
        let _loading = self.begin();
        if changes.is_empty() {
            return Err(self.fail(
                "updating recipe",
                RecipeBoxError::InvalidInput("no fields to update".into()),
            ));
        }
        let changes = serde_json::to_value(&changes).map_err(|e| self.fail("updating recipe", e))?;

        let updated = self
            .backend
            .update(RECIPES_COLLECTION, id, changes)
            .await
            .map_err(RecipeBoxError::from)
            .and_then(decode_rows)
            .map_err(|e| self.fail("updating recipe", e))?;

        if let Some(fresh) = updated.first() {
            self.write(|s| {
                if let Some(slot) = s.recipes.iter_mut().find(|r| r.id == id) {
                    *slot = fresh.clone();
                }
            });
        }
        info!(id, "recipe updated");
        Ok(updated)
    }

    /// Delete recipe `id` and drop it from the cache.
    pub async fn delete(&self, id: i64) -> Result<()> {
        let _loading = self.begin();
        self.backend
            .delete(RECIPES_COLLECTION, id)
            .await
            .map_err(|e| self.fail("deleting recipe", e))?;

        self.write(|s| s.recipes.retain(|r| r.id != id));
        info!(id, "recipe deleted");
        Ok(())
    }

    fn begin(&self) -> LoadingGuard<'_> {
        self.write(|s| {
            s.in_flight += 1;
            s.loading = true;
            s.error = None;
        });
        LoadingGuard { repo: self }
    }

    fn write<F>(&self, f: F)
    where
        F: FnOnce(&mut RecipeListState),
    {
        match self.state.write() {
            Ok(mut state) => f(&mut state),
            Err(_) => warn!("recipe state lock poisoned"),
        }
    }

    fn fail(&self, context: &str, err: impl Into<RecipeBoxError>) -> RecipeBoxError {
        let err = err.into();
        warn!(error = %err, "error {}", context);
        let message = err.to_string();
        self.write(|s| s.error = Some(message));
        err
    }
}

impl std::fmt::Debug for RecipeRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecipeRepository")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

struct LoadingGuard<'a> {
    repo: &'a RecipeRepository,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.repo.write(|s| {
            s.in_flight = s.in_flight.saturating_sub(1);
            s.loading = s.in_flight > 0;
        });
    }
}

fn decode_rows(rows: Vec<Value>) -> Result<Vec<Recipe>> {
    rows.into_iter()
        .map(|row| serde_json::from_value(row).map_err(RecipeBoxError::from))
        .collect()
}
