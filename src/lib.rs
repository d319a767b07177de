//! # recipe-box
//!
//! Recipe catalog and auth session state for a recipe-sharing app.
//!
//! The core of the crate is a small auth state machine: an [`AuthStore`]
//! holding the current user and session, an [`AuthController`] that is its
//! only writer, a [`RouteGuard`] that turns auth state into navigation
//! decisions, and a [`BootstrapHook`] that reconciles the two once at
//! startup. Around it sit the recipe catalog, a per-user recipe repository,
//! favorites, and an HTTP API over the catalog.
//!
//! ## Features
//!
//! - **Atomic auth snapshots**: readers never see a user without a session
//! - **Pluggable backends**: auth and record storage behind async traits
//! - **Ingredient matching**: filter and rank recipes by selected ingredients
//! - **HTTP API**: axum router with tracing and CORS layers
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use recipe_box::{AppContext, Config, MemoryHistory};
//!
//! #[tokio::main]
//! async fn main() -> recipe_box::Result<()> {
//!     recipe_box::logging::try_init().ok();
//!
//!     let history = Arc::new(MemoryHistory::new("/dashboard"));
//!     let (app, backend) = AppContext::in_memory(&Config::default(), history)?;
//!     backend.register("ann@example.com", "secret")?;
//!
//!     let (outcome, _events) = app.start().await;
//!     println!("bootstrap: {:?}", outcome);
//!
//!     app.controller.sign_in("ann@example.com", "secret").await?;
//!     assert!(app.store.is_authenticated());
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod app;
pub mod auth;
pub mod backend;
pub mod bootstrap;
pub mod cli;
pub mod config;
pub mod error;
pub mod favorites;
pub mod logging;
pub mod recipes;
pub mod routing;
pub mod session;

// Re-export commonly used types
pub use app::AppContext;
pub use auth::{AuthConfig, AuthController};
pub use backend::{
    AuthBackend, AuthEvent, AuthEventKind, BackendError, MemoryBackend, OAuthProvider,
    RecordBackend, SessionSubscription,
};
pub use bootstrap::{BootstrapHook, BootstrapOutcome};
pub use config::Config;
pub use error::{RecipeBoxError, Result};
pub use favorites::FavoritesStore;
pub use recipes::{NewRecipe, Recipe, RecipeCatalog, RecipeRepository, RecipeUpdate};
pub use routing::{
    DetachedNavigator, GuardDecision, MemoryHistory, NavigateOptions, Navigator, RouteClass,
    RouteGuard, RouteTable,
};
pub use session::{AuthState, AuthStore, Session, User};
