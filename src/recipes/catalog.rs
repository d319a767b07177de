//! Read-only recipe catalog loaded from a JSON file.

use std::path::Path;

use super::{filter_by_ingredients, Recipe};
use crate::Result;

/// Fixed set of recipes served by the HTTP API.
#[derive(Debug, Clone, Default)]
pub struct RecipeCatalog {
    recipes: Vec<Recipe>,
}

impl RecipeCatalog {
    pub fn new(recipes: Vec<Recipe>) -> Self {
        Self { recipes }
    }

    /// Load a catalog from a file holding a JSON array of recipes.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let catalog = Self::from_json(&content)?;
        tracing::info!(
            path = %path.display(),
            recipes = catalog.len(),
            "recipe catalog loaded"
        );
        Ok(catalog)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(Self::new(serde_json::from_str(json)?))
    }

    pub fn all(&self) -> &[Recipe] {
        &self.recipes
    }

    pub fn get(&self, id: i64) -> Option<&Recipe> {
        self.recipes.iter().find(|r| r.id == id)
    }

    /// Recipes using any of the selected ingredients.
    pub fn matching(&self, ingredients: &[String]) -> Vec<&Recipe> {
        filter_by_ingredients(&self.recipes, ingredients)
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const CATALOG: &str = r#"[
        {"id": 1, "slug": "tomato-soup", "title": "Tomato Soup",
         "ingredients": ["tomato", "onion"], "instructions": "Simmer."},
        {"id": 2, "slug": "omelette", "title": "Omelette",
         "ingredients": ["egg", "butter"], "instructions": "Whisk and fry."}
    ]"#;

    #[test]
    fn test_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(CATALOG.as_bytes()).unwrap();

        let catalog = RecipeCatalog::from_file(file.path()).unwrap();
        assert_eq!(catalog.len(), 2);
        assert!(!catalog.is_empty());
    }

    #[test]
    fn test_get_by_id() {
        let catalog = RecipeCatalog::from_json(CATALOG).unwrap();
        assert_eq!(catalog.get(2).map(|r| r.title.as_str()), Some("Omelette"));
        assert!(catalog.get(99).is_none());
    }

    #[test]
    fn test_matching() {
        let catalog = RecipeCatalog::from_json(CATALOG).unwrap();
        let found = catalog.matching(&["onion".to_string()]);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, 1);
    }

    #[test]
    fn test_invalid_json() {
        assert!(RecipeCatalog::from_json("{not json").is_err());
    }

    #[test]
    fn test_missing_file() {
        let result = RecipeCatalog::from_file(Path::new("/nonexistent/recipes.json"));
        assert!(matches!(result, Err(crate::RecipeBoxError::Io(_))));
    }
}
