//! Recipes: data model, ingredient matching, the static catalog, and the
//! backend-backed repository of user recipes.

mod catalog;
mod matching;
mod model;
mod repository;

pub use catalog::RecipeCatalog;
pub use matching::{filter_by_ingredients, rank_by_ingredients, search_recipes};
pub use model::{NewRecipe, Recipe, RecipeUpdate};
pub use repository::{RecipeListState, RecipeRepository, RECIPES_COLLECTION};
