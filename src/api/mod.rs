//! HTTP API over the recipe catalog.
//!
//! ## Endpoints
//!
//! - `GET /health` - Health check
//! - `GET /api` - API information
//! - `GET /api/recipes` - Full catalog
//! - `POST /api/recipes` - Recipes using any of `{"ingredients": [..]}`
//! - `POST /api/match` - Same as above
//! - `GET /api/recipes/{id}` - One recipe, or a 404 error body
//! - `GET /api/favorites` - Favorite recipes
//! - `POST /api/favorites/{id}` - Add a catalog recipe to favorites
//! - `DELETE /api/favorites/{id}` - Remove a favorite
//!
//! ## Example
//!
//! ```no_run
//! use recipe_box::api::{serve, AppState, ServerConfig};
//! use recipe_box::RecipeCatalog;
//!
//! #[tokio::main]
//! async fn main() -> recipe_box::Result<()> {
//!     let catalog = RecipeCatalog::from_file("data/recipes.json".as_ref())?;
//!     serve(ServerConfig::new("127.0.0.1", 3000), AppState::new(catalog)).await
//! }
//! ```

pub mod handlers;
pub mod router;
pub mod types;

pub use handlers::{ApiError, AppState};
pub use router::{create_router, create_router_with_state, serve, ServerConfig};
pub use types::{ErrorResponse, IngredientQuery};
