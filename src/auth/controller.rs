//! Auth operations and session-change handling.

use std::sync::{Arc, Mutex};

use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

use super::AuthConfig;
use crate::backend::{
    AuthBackend, AuthEvent, AuthEventKind, AuthResponse, OAuthProvider, OAuthRedirect,
    PasswordResetSent, ProfileUpdate, SessionSubscription, SignUpResponse,
};
use crate::error::RecipeBoxError;
use crate::routing::{NavigateOptions, Navigator};
use crate::session::{AuthStore, Metadata, Session, User};
use crate::Result;

/// Drives the auth store from backend operations and events.
///
/// Every operation raises `loading` and clears `error` on entry, records the
/// failure message in `error` when the backend call fails, and drops
/// `loading` on every exit path.
pub struct AuthController {
    backend: Arc<dyn AuthBackend>,
    store: Arc<AuthStore>,
    navigator: Arc<dyn Navigator>,
    config: AuthConfig,
    init: OnceCell<()>,
    subscription: Mutex<Option<SessionSubscription>>,
}

impl AuthController {
    /// Create a controller writing to `store`.
    pub fn new(
        backend: Arc<dyn AuthBackend>,
        store: Arc<AuthStore>,
        navigator: Arc<dyn Navigator>,
        config: AuthConfig,
    ) -> Self {
        Self {
            backend,
            store,
            navigator,
            config,
            init: OnceCell::new(),
            subscription: Mutex::new(None),
        }
    }

    /// The store this controller writes to.
    pub fn store(&self) -> &Arc<AuthStore> {
        &self.store
    }

    pub fn navigator(&self) -> &Arc<dyn Navigator> {
        &self.navigator
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Fetch the stored session and publish it.
    ///
    /// Failures are recorded in `error` and yield `None`; a missing session
    /// is a normal state. `initialized` becomes true either way.
    pub async fn resolve_session(&self) -> Option<Session> {
        let _op = self.store.begin_operation();
        let result = self.backend.get_session().await;
        let session = match result {
            Ok(session) => {
                self.store.apply_session(session.clone());
                debug!(
                    authenticated = session.is_some(),
                    "session resolved"
                );
                session
            }
            Err(err) => {
                self.fail("getting current session", err);
                None
            }
        };
        self.store.mark_initialized();
        session
    }

    /// Register a new account. The session is left untouched until the
    /// account is confirmed and signed in.
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        metadata: Option<Metadata>,
    ) -> Result<SignUpResponse> {
        let _op = self.store.begin_operation();
        if email.trim().is_empty() {
            return Err(self.fail(
                "signing up",
                RecipeBoxError::InvalidInput("email must not be empty".into()),
            ));
        }
        if password.is_empty() {
            return Err(self.fail(
                "signing up",
                RecipeBoxError::InvalidInput("password must not be empty".into()),
            ));
        }

        match self.backend.sign_up(email, password, metadata).await {
            Ok(resp) => {
                info!(email, "account created, awaiting confirmation");
                Ok(resp)
            }
            Err(err) => Err(self.fail("signing up", err)),
        }
    }

    /// Sign in with email and password, then go home.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<AuthResponse> {
        let _op = self.store.begin_operation();
        match self.backend.sign_in_with_password(email, password).await {
            Ok(resp) => {
                self.store.apply_session(Some(resp.session.clone()));
                info!(user_id = %resp.user.id, "user signed in");
                self.navigator
                    .navigate(&self.config.routes.home, NavigateOptions::replace());
                Ok(resp)
            }
            Err(err) => Err(self.fail("signing in", err)),
        }
    }

    /// Start a redirect sign-in. The session arrives later on the event stream.
    pub async fn sign_in_with_oauth(&self, provider: OAuthProvider) -> Result<OAuthRedirect> {
        let _op = self.store.begin_operation();
        let redirect_to = self.config.oauth_redirect_url();
        match self.backend.sign_in_with_oauth(provider, &redirect_to).await {
            Ok(redirect) => {
                info!(%provider, "oauth sign-in started");
                Ok(redirect)
            }
            Err(err) => Err(self.fail("signing in with oauth", err)),
        }
    }

    /// Sign out, clear the session and go to the post-logout page.
    pub async fn sign_out(&self) -> Result<()> {
        let _op = self.store.begin_operation();
        match self.backend.sign_out().await {
            Ok(()) => {
                self.store.apply_session(None);
                info!("user signed out");
                self.navigator
                    .navigate(&self.config.routes.home, NavigateOptions::replace());
                Ok(())
            }
            Err(err) => Err(self.fail("signing out", err)),
        }
    }

    /// Ask the backend to send a password reset email.
    pub async fn reset_password(&self, email: &str) -> Result<PasswordResetSent> {
        let _op = self.store.begin_operation();
        let redirect_to = self.config.reset_redirect_url();
        match self.backend.reset_password_for_email(email, &redirect_to).await {
            Ok(sent) => {
                info!(email, "password reset requested");
                Ok(sent)
            }
            Err(err) => Err(self.fail("resetting password", err)),
        }
    }

    /// Update email and/or metadata of the signed-in user.
    pub async fn update_profile(&self, update: ProfileUpdate) -> Result<User> {
        let _op = self.store.begin_operation();
        match self.backend.update_user(&update).await {
            Ok(user) => {
                self.store.replace_user(user.clone());
                info!(user_id = %user.id, "profile updated");
                Ok(user)
            }
            Err(err) => Err(self.fail("updating profile", err)),
        }
    }

    /// Resolve the initial session and subscribe to session changes.
    ///
    /// Runs once; later and concurrent calls wait for the first run and then
    /// return. The subscription is opened only after the first resolution
    /// has settled, so the initial state comes from an explicit fetch.
    pub async fn initialize(&self) {
        self.init
            .get_or_init(|| async {
                if !self.store.is_initialized() {
                    self.resolve_session().await;
                }
                let subscription = self.backend.subscribe();
                match self.subscription.lock() {
                    Ok(mut slot) => *slot = Some(subscription),
                    Err(_) => warn!("subscription slot poisoned, session events disabled"),
                }
                info!(
                    authenticated = self.store.is_authenticated(),
                    "auth initialized"
                );
            })
            .await;
    }

    pub fn clear_error(&self) {
        self.store.clear_error();
    }

    /// Apply one session-change event.
    ///
    /// Overwrites session and user from the payload and marks the store
    /// initialized. Re-applying an identical event changes nothing.
    pub fn apply_event(&self, event: AuthEvent) {
        debug!(
            kind = ?event.kind,
            email = ?event.session.as_ref().and_then(|s| s.user.email.as_deref()),
            "auth state change"
        );
        self.store.apply_session(event.session);
        self.store.mark_initialized();

        let routes = &self.config.routes;
        match event.kind {
            AuthEventKind::SignedIn => {
                if let Some(path) = self.navigator.current_path() {
                    if routes.is_auth_route(&path) {
                        self.navigator
                            .navigate(&routes.home, NavigateOptions::replace());
                    }
                }
            }
            AuthEventKind::SignedOut => {
                if let Some(path) = self.navigator.current_path() {
                    if !routes.is_auth_route(&path) {
                        self.navigator
                            .navigate(&routes.login, NavigateOptions::replace());
                    }
                }
            }
            AuthEventKind::TokenRefreshed
            | AuthEventKind::UserUpdated
            | AuthEventKind::PasswordRecovery => {}
        }
    }

    /// Apply every event already queued on the subscription.
    ///
    /// Returns the number of events applied; zero before [`initialize`](Self::initialize)
    /// or after [`run_event_loop`](Self::run_event_loop) has taken the subscription.
    pub fn pump_events(&self) -> Result<usize> {
        let mut slot = self
            .subscription
            .lock()
            .map_err(|_| RecipeBoxError::LockPoisoned)?;
        let Some(subscription) = slot.as_mut() else {
            return Ok(0);
        };

        let mut applied = 0;
        while let Some(event) = subscription.try_recv() {
            self.apply_event(event);
            applied += 1;
        }
        Ok(applied)
    }

    /// Take the subscription and apply events until the stream closes.
    ///
    /// Returns the number of events applied.
    pub async fn run_event_loop(&self) -> usize {
        let taken = self.subscription.lock().ok().and_then(|mut slot| slot.take());
        let Some(mut subscription) = taken else {
            warn!("no session subscription to consume; call initialize first");
            return 0;
        };

        let mut applied = 0;
        while let Some(event) = subscription.recv().await {
            self.apply_event(event);
            applied += 1;
        }
        debug!(applied, "session event stream closed");
        applied
    }

    fn fail(&self, context: &str, err: impl Into<RecipeBoxError>) -> RecipeBoxError {
        let err = err.into();
        warn!(error = %err, "error {}", context);
        self.store.set_error(err.to_string());
        err
    }
}

impl std::fmt::Debug for AuthController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthController")
            .field("store", &self.store)
            .field("config", &self.config)
            .field("initialized", &self.init.initialized())
            .finish_non_exhaustive()
    }
}
