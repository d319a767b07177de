//! One-time startup reconciliation between auth state and location.

use std::sync::Arc;

use tokio::sync::OnceCell;
use tracing::{debug, info};

use crate::auth::AuthController;
use crate::routing::{NavigateOptions, RouteClass};

/// What the bootstrap hook did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BootstrapOutcome {
    /// The current location already matched the auth state.
    Unchanged,
    /// The hook replaced the location with this path.
    Redirected(String),
    /// No location is visible, so nothing was compared.
    Skipped,
}

/// Startup routine run once per application load.
///
/// Waits for the controller to resolve the initial session, then corrects
/// the location once: signed-in users on auth pages go home, signed-out
/// users on protected pages go to login.
#[derive(Debug)]
pub struct BootstrapHook {
    controller: Arc<AuthController>,
    outcome: OnceCell<BootstrapOutcome>,
}

impl BootstrapHook {
    pub fn new(controller: Arc<AuthController>) -> Self {
        Self {
            controller,
            outcome: OnceCell::new(),
        }
    }

    /// Run the hook. Later calls return the first run's outcome.
    pub async fn run(&self) -> BootstrapOutcome {
        self.outcome
            .get_or_init(|| async {
                self.controller.initialize().await;

                let mut state = self.controller.store().subscribe();
                if state.wait_for(|s| s.initialized).await.is_err() {
                    debug!("auth store dropped before initialization");
                    return BootstrapOutcome::Skipped;
                }
                self.reconcile()
            })
            .await
            .clone()
    }

    /// Outcome of the first run, if it has completed.
    pub fn outcome(&self) -> Option<&BootstrapOutcome> {
        self.outcome.get()
    }

    fn reconcile(&self) -> BootstrapOutcome {
        let navigator = self.controller.navigator();
        let Some(path) = navigator.current_path() else {
            return BootstrapOutcome::Skipped;
        };

        let routes = &self.controller.config().routes;
        let authenticated = self.controller.store().is_authenticated();
        let target = match (authenticated, routes.classify(&path)) {
            (true, RouteClass::Auth) => Some(routes.home.clone()),
            (false, RouteClass::Protected) => Some(routes.login.clone()),
            _ => None,
        };

        match target {
            Some(target) => {
                info!(from = %path, to = %target, authenticated, "bootstrap redirect");
                navigator.navigate(&target, NavigateOptions::replace());
                BootstrapOutcome::Redirected(target)
            }
            None => BootstrapOutcome::Unchanged,
        }
    }
}
