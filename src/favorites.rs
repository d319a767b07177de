//! Favorite recipes, optionally persisted to a JSON file.

use std::path::{Path, PathBuf};
use std::sync::RwLock;

use crate::error::RecipeBoxError;
use crate::recipes::Recipe;
use crate::Result;

/// The user's favorite recipes.
///
/// With a backing file every change is written through; without one the
/// list lives in memory only.
#[derive(Debug)]
pub struct FavoritesStore {
    path: Option<PathBuf>,
    favorites: RwLock<Vec<Recipe>>,
}

impl FavoritesStore {
    /// Create an empty, memory-only store.
    pub fn in_memory() -> Self {
        Self {
            path: None,
            favorites: RwLock::new(Vec::new()),
        }
    }

    /// Open a store backed by `path`, loading any saved favorites.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let store = Self {
            path: Some(path.into()),
            favorites: RwLock::new(Vec::new()),
        };
        store.load()?;
        Ok(store)
    }

    /// Open `path` when given, otherwise create a memory-only store.
    pub fn from_path(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::open(path),
            None => Ok(Self::in_memory()),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Reload favorites from the backing file. A missing file means none.
    pub fn load(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let loaded: Vec<Recipe> = match std::fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e.into()),
        };
        tracing::debug!(path = %path.display(), count = loaded.len(), "favorites loaded");

        *self
            .favorites
            .write()
            .map_err(|_| RecipeBoxError::LockPoisoned)? = loaded;
        Ok(())
    }

    /// Add `recipe` unless a recipe with the same id is already a favorite.
    ///
    /// Returns `true` if it was added. The list changes only once the
    /// backing file has been written.
    pub fn add(&self, recipe: &Recipe) -> Result<bool> {
        let mut favorites = self
            .favorites
            .write()
            .map_err(|_| RecipeBoxError::LockPoisoned)?;
        if favorites.iter().any(|r| r.id == recipe.id) {
            return Ok(false);
        }
        let mut updated = favorites.clone();
        updated.push(recipe.clone());
        self.save(&updated)?;
        *favorites = updated;
        Ok(true)
    }

    /// Remove the favorite with `id`. Returns `true` if one was removed.
    pub fn remove(&self, id: i64) -> Result<bool> {
        let mut favorites = self
            .favorites
            .write()
            .map_err(|_| RecipeBoxError::LockPoisoned)?;
        if !favorites.iter().any(|r| r.id == id) {
            return Ok(false);
        }
        let updated: Vec<Recipe> = favorites.iter().filter(|r| r.id != id).cloned().collect();
        self.save(&updated)?;
        *favorites = updated;
        Ok(true)
    }

    pub fn is_favorite(&self, id: i64) -> bool {
        self.favorites
            .read()
            .map(|f| f.iter().any(|r| r.id == id))
            .unwrap_or(false)
    }

    pub fn list(&self) -> Vec<Recipe> {
        self.favorites
            .read()
            .map(|f| f.clone())
            .unwrap_or_default()
    }

    pub fn count(&self) -> usize {
        self.favorites.read().map(|f| f.len()).unwrap_or(0)
    }

    fn save(&self, favorites: &[Recipe]) -> Result<()> {
        if let Some(path) = &self.path {
            let json = serde_json::to_string_pretty(favorites)?;
            std::fs::write(path, json)?;
        }
        Ok(())
    }
}

impl Default for FavoritesStore {
    fn default() -> Self {
        Self::in_memory()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn recipe(id: i64) -> Recipe {
        Recipe {
            id,
            slug: format!("recipe-{id}"),
            title: format!("Recipe {id}"),
            ingredients: vec!["salt".into()],
            instructions: String::new(),
            user_id: None,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_add_is_deduplicated_by_id() {
        let store = FavoritesStore::in_memory();
        assert!(store.add(&recipe(1)).unwrap());
        assert!(!store.add(&recipe(1)).unwrap());
        assert_eq!(store.count(), 1);
        assert!(store.is_favorite(1));
        assert!(!store.is_favorite(2));
    }

    #[test]
    fn test_remove() {
        let store = FavoritesStore::in_memory();
        store.add(&recipe(1)).unwrap();
        store.add(&recipe(2)).unwrap();

        assert!(store.remove(1).unwrap());
        assert!(!store.remove(1).unwrap());
        assert_eq!(store.list().iter().map(|r| r.id).collect::<Vec<_>>(), vec![2]);
    }

    #[test]
    fn test_missing_file_starts_empty() {
        let dir = TempDir::new().unwrap();
        let store = FavoritesStore::open(dir.path().join("favorites.json")).unwrap();
        assert_eq!(store.count(), 0);
    }

    #[test]
    fn test_changes_persist_across_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("favorites.json");

        let store = FavoritesStore::open(&path).unwrap();
        store.add(&recipe(1)).unwrap();
        store.add(&recipe(2)).unwrap();
        store.remove(1).unwrap();
        drop(store);

        let reopened = FavoritesStore::open(&path).unwrap();
        assert!(reopened.is_favorite(2));
        assert!(!reopened.is_favorite(1));
        assert_eq!(reopened.path(), Some(path.as_path()));
    }

    #[test]
    fn test_failed_write_leaves_list_unchanged() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing-dir").join("favorites.json");
        let store = FavoritesStore::open(&path).unwrap();

        assert!(matches!(store.add(&recipe(1)), Err(RecipeBoxError::Io(_))));
        assert!(!store.is_favorite(1));
        assert!(store.add(&recipe(1)).is_err());
        assert!(!path.exists());
    }

    #[test]
    fn test_failed_write_keeps_removed_favorite() {
        let dir = TempDir::new().unwrap();
        let subdir = dir.path().join("data");
        std::fs::create_dir(&subdir).unwrap();
        let path = subdir.join("favorites.json");

        let store = FavoritesStore::open(&path).unwrap();
        store.add(&recipe(1)).unwrap();
        std::fs::remove_file(&path).unwrap();
        std::fs::remove_dir(&subdir).unwrap();

        assert!(store.remove(1).is_err());
        assert!(store.is_favorite(1));
        assert_eq!(store.count(), 1);
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("favorites.json");
        std::fs::write(&path, "not json").unwrap();

        let result = FavoritesStore::open(&path);
        assert!(matches!(result, Err(RecipeBoxError::Json(_))));
    }
}
