//! Stateless recipe filtering, ranking and search.

use super::Recipe;

/// Recipes using at least one of the `selected` ingredients, in input order.
///
/// Ingredient names match exactly.
pub fn filter_by_ingredients<'a>(recipes: &'a [Recipe], selected: &[String]) -> Vec<&'a Recipe> {
    recipes
        .iter()
        .filter(|r| r.matching_ingredients(selected) > 0)
        .collect()
}

/// Same set as [`filter_by_ingredients`], best matches first.
///
/// Ordered by number of matched ingredients, then by title.
pub fn rank_by_ingredients<'a>(recipes: &'a [Recipe], selected: &[String]) -> Vec<&'a Recipe> {
    let mut ranked: Vec<(usize, &Recipe)> = recipes
        .iter()
        .map(|r| (r.matching_ingredients(selected), r))
        .filter(|(matches, _)| *matches > 0)
        .collect();
    ranked.sort_by(|(ma, a), (mb, b)| mb.cmp(ma).then_with(|| a.title.cmp(&b.title)));
    ranked.into_iter().map(|(_, r)| r).collect()
}

/// Case-insensitive substring search over titles and ingredients.
///
/// A blank query returns every recipe.
pub fn search_recipes<'a>(recipes: &'a [Recipe], query: &str) -> Vec<&'a Recipe> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return recipes.iter().collect();
    }
    recipes
        .iter()
        .filter(|r| {
            r.title.to_lowercase().contains(&query)
                || r.ingredients
                    .iter()
                    .any(|i| i.to_lowercase().contains(&query))
        })
        .collect()
}
