//! Composition root wiring the auth store to everything that reads it.

use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::auth::AuthController;
use crate::backend::{AuthBackend, MemoryBackend, RecordBackend};
use crate::bootstrap::{BootstrapHook, BootstrapOutcome};
use crate::config::Config;
use crate::favorites::FavoritesStore;
use crate::recipes::RecipeRepository;
use crate::routing::{Navigator, RouteGuard};
use crate::session::AuthStore;
use crate::Result;

/// One application instance.
///
/// Owns a single [`AuthStore`] and hands it to the controller (its only
/// writer), the route guard, the bootstrap hook and the recipe repository.
/// Separate contexts share nothing.
#[derive(Debug)]
pub struct AppContext {
    pub store: Arc<AuthStore>,
    pub controller: Arc<AuthController>,
    pub guard: RouteGuard,
    pub bootstrap: BootstrapHook,
    pub recipes: RecipeRepository,
    pub favorites: FavoritesStore,
}

impl AppContext {
    /// Build a context from configuration and injected collaborators.
    ///
    /// Opens the favorites file when one is configured.
    pub fn new(
        config: &Config,
        auth: Arc<dyn AuthBackend>,
        records: Arc<dyn RecordBackend>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self> {
        let store = Arc::new(AuthStore::new());
        let controller = Arc::new(AuthController::new(
            auth,
            Arc::clone(&store),
            navigator,
            config.auth.clone(),
        ));
        let favorites = FavoritesStore::from_path(config.favorites.path.as_deref())?;

        Ok(Self {
            guard: RouteGuard::new(Arc::clone(&store), config.auth.routes.clone()),
            bootstrap: BootstrapHook::new(Arc::clone(&controller)),
            recipes: RecipeRepository::new(records, Arc::clone(&store)),
            store,
            controller,
            favorites,
        })
    }

    /// Build a context backed by one [`MemoryBackend`] for both auth and
    /// records. Returns the backend too so callers can seed or drive it.
    pub fn in_memory(
        config: &Config,
        navigator: Arc<dyn Navigator>,
    ) -> Result<(Self, Arc<MemoryBackend>)> {
        let backend = Arc::new(MemoryBackend::new());
        let context = Self::new(config, backend.clone(), backend.clone(), navigator)?;
        Ok((context, backend))
    }

    /// Run the bootstrap hook and start consuming session events.
    ///
    /// The returned task ends when the backend closes the event stream.
    pub async fn start(&self) -> (BootstrapOutcome, JoinHandle<usize>) {
        let outcome = self.bootstrap.run().await;
        let controller = Arc::clone(&self.controller);
        let events = tokio::spawn(async move { controller.run_event_loop().await });
        (outcome, events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::AuthEvent;
    use crate::routing::{DetachedNavigator, GuardDecision, MemoryHistory};
    use crate::session::{Session, User};
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_contexts_are_isolated() {
        let config = Config::default();
        let (first, backend) =
            AppContext::in_memory(&config, Arc::new(DetachedNavigator)).unwrap();
        let (second, _) = AppContext::in_memory(&config, Arc::new(DetachedNavigator)).unwrap();

        backend.register("ann@example.com", "pw").unwrap();
        first
            .controller
            .sign_in("ann@example.com", "pw")
            .await
            .unwrap();

        assert!(first.store.is_authenticated());
        assert!(!second.store.is_authenticated());
    }

    #[tokio::test]
    async fn test_start_redirects_and_follows_events() {
        let history = Arc::new(MemoryHistory::new("/recipes/42"));
        let (context, backend) =
            AppContext::in_memory(&Config::default(), history.clone()).unwrap();

        let (outcome, events) = context.start().await;
        assert_eq!(outcome, BootstrapOutcome::Redirected("/auth/login".into()));
        assert_eq!(context.guard.require_auth(), GuardDecision::Redirect("/auth/login".into()));

        let session = Session::new("t1", User::new("u1"));
        backend.emit(AuthEvent::signed_in(session));
        backend.close_subscriptions();

        assert_eq!(events.await.unwrap(), 1);
        assert_eq!(context.store.user().map(|u| u.id), Some("u1".to_string()));
        assert_eq!(history.entries().last().map(String::as_str), Some("/"));
    }

    #[test]
    fn test_favorites_file_from_config() {
        let dir = TempDir::new().unwrap();
        let mut config = Config::default();
        config.favorites.path = Some(dir.path().join("favorites.json"));

        let (context, _) = AppContext::in_memory(&config, Arc::new(DetachedNavigator)).unwrap();
        assert_eq!(
            context.favorites.path(),
            Some(dir.path().join("favorites.json").as_path())
        );
    }
}
