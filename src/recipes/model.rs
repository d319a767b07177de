//! Recipe records.

use serde::{Deserialize, Serialize};

/// A stored recipe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: i64,
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub instructions: String,
    /// Owner, for user-created recipes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl Recipe {
    /// Number of `selected` ingredients this recipe uses.
    pub fn matching_ingredients(&self, selected: &[String]) -> usize {
        self.ingredients
            .iter()
            .filter(|i| selected.contains(i))
            .count()
    }
}

/// A recipe about to be created. The backend assigns id and timestamps.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewRecipe {
    pub slug: String,
    pub title: String,
    pub ingredients: Vec<String>,
    pub instructions: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

/// Partial update. Unset fields stay unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecipeUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ingredients: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
}

impl RecipeUpdate {
    pub fn is_empty(&self) -> bool {
        self.slug.is_none()
            && self.title.is_none()
            && self.ingredients.is_none()
            && self.instructions.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recipe_from_catalog_json() {
        let json = r#"{
            "id": 1,
            "slug": "tomato-soup",
            "title": "Tomato Soup",
            "ingredients": ["tomato", "onion"],
            "instructions": "Simmer."
        }"#;
        let recipe: Recipe = serde_json::from_str(json).unwrap();
        assert_eq!(recipe.id, 1);
        assert_eq!(recipe.ingredients, vec!["tomato", "onion"]);
        assert!(recipe.user_id.is_none());
    }

    #[test]
    fn test_matching_ingredients() {
        let recipe = Recipe {
            id: 1,
            slug: "s".into(),
            title: "t".into(),
            ingredients: vec!["egg".into(), "flour".into(), "milk".into()],
            instructions: String::new(),
            user_id: None,
            created_at: None,
            updated_at: None,
        };
        let selected = vec!["milk".to_string(), "egg".to_string(), "salt".to_string()];
        assert_eq!(recipe.matching_ingredients(&selected), 2);
        assert_eq!(recipe.matching_ingredients(&[]), 0);
    }

    #[test]
    fn test_update_serializes_only_set_fields() {
        let update = RecipeUpdate {
            title: Some("New".into()),
            ..RecipeUpdate::default()
        };
        assert!(!update.is_empty());
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(json, serde_json::json!({"title": "New"}));
        assert!(RecipeUpdate::default().is_empty());
    }
}
