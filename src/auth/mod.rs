//! Authentication controller.
//!
//! The controller is the only writer of the [`AuthStore`](crate::session::AuthStore).
//! It wraps the backend's auth operations, applies their results to the
//! store, and consumes the backend's session-change stream.
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use recipe_box::auth::{AuthConfig, AuthController};
//! use recipe_box::backend::MemoryBackend;
//! use recipe_box::routing::MemoryHistory;
//! use recipe_box::session::AuthStore;
//!
//! #[tokio::main]
//! async fn main() -> recipe_box::Result<()> {
//!     let backend = Arc::new(MemoryBackend::new());
//!     backend.register("cook@example.com", "secret")?;
//!
//!     let store = Arc::new(AuthStore::new());
//!     let controller = AuthController::new(
//!         backend,
//!         Arc::clone(&store),
//!         Arc::new(MemoryHistory::new("/auth/login")),
//!         AuthConfig::default(),
//!     );
//!
//!     controller.initialize().await;
//!     controller.sign_in("cook@example.com", "secret").await?;
//!     assert!(store.is_authenticated());
//!     Ok(())
//! }
//! ```

mod config;
mod controller;

pub use config::AuthConfig;
pub use controller::AuthController;
