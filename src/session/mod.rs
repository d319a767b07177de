//! Session state module.
//!
//! This module holds the authenticated identity types and the reactive
//! store that tracks the current user, session, loading, error and
//! initialization flags for one application context.

mod model;
mod state;
mod store;

pub use model::{Metadata, Session, User};
pub use state::AuthState;
pub use store::{AuthStore, OperationGuard};
