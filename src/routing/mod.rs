//! Route classification, navigation capability, and route guards.
//!
//! Paths are classified by prefix into auth-only pages, public pages and
//! protected pages. Guards read the auth store before each navigation and
//! decide whether to let it through or redirect.

mod guard;
mod navigator;
mod routes;

pub use guard::{GuardDecision, RouteGuard};
pub use navigator::{DetachedNavigator, MemoryHistory, NavigateOptions, Navigation, Navigator};
pub use routes::{RouteClass, RouteTable};
