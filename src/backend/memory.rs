//! In-process backend implementation.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::time::{SystemTime, UNIX_EPOCH};

use serde_json::Value;
use tokio::sync::mpsc;

use super::{
    AuthBackend, AuthEvent, AuthEventKind, AuthResponse, BackendError, OAuthProvider,
    OAuthRedirect, PasswordResetSent, ProfileUpdate, RecordBackend, SessionSubscription,
    SignUpResponse,
};
use crate::session::{Metadata, Session, User};

/// Lifetime of issued access tokens.
const TOKEN_TTL_SECS: u64 = 3600;

#[derive(Debug)]
struct Account {
    user: User,
    password: String,
}

#[derive(Debug, Default)]
struct Inner {
    /// Accounts keyed by email.
    accounts: HashMap<String, Account>,
    /// Session persisted for this client, as a browser would keep it.
    current: Option<Session>,
    collections: HashMap<String, Vec<Value>>,
    pending_failure: Option<BackendError>,
}

/// Backend that keeps accounts, the client session and collections in memory.
///
/// Session changes are broadcast to every live subscription, mirroring what
/// a hosted service pushes to its clients.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    inner: Mutex<Inner>,
    subscribers: Mutex<Vec<mpsc::UnboundedSender<AuthEvent>>>,
    counter: AtomicU64,
}

impl MemoryBackend {
    /// Create an empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an account, returning its user record.
    pub fn register(&self, email: &str, password: &str) -> Result<User, BackendError> {
        let user = User::new(self.next_id("user")).with_email(email);
        let mut inner = self.lock()?;
        if inner.accounts.contains_key(email) {
            return Err(BackendError::new("User already registered").with_status(422));
        }
        inner.accounts.insert(
            email.to_string(),
            Account {
                user: user.clone(),
                password: password.to_string(),
            },
        );
        Ok(user)
    }

    /// Persist `session` as the client's stored session without emitting an event.
    pub fn store_session(&self, session: Option<Session>) -> Result<(), BackendError> {
        self.lock()?.current = session;
        Ok(())
    }

    /// Make the next backend call fail with `message`.
    pub fn fail_next(&self, message: impl Into<String>) -> Result<(), BackendError> {
        self.lock()?.pending_failure = Some(BackendError::new(message));
        Ok(())
    }

    /// Rotate the stored session's tokens and notify subscribers.
    pub fn refresh_session(&self) -> Result<Session, BackendError> {
        let session = {
            let mut inner = self.lock()?;
            let user = inner
                .current
                .as_ref()
                .map(|s| s.user.clone())
                .ok_or_else(Self::session_missing)?;
            let session = self.issue_session(user);
            inner.current = Some(session.clone());
            session
        };
        self.emit(AuthEvent::token_refreshed(session.clone()));
        Ok(session)
    }

    /// Push an event to every live subscription.
    ///
    /// Used for changes that originate elsewhere, e.g. a sign-out in another tab.
    pub fn emit(&self, event: AuthEvent) {
        if let Ok(mut subscribers) = self.subscribers.lock() {
            subscribers.retain(|tx| tx.send(event.clone()).is_ok());
        }
    }

    /// Drop every subscription's sending half, ending their streams.
    pub fn close_subscriptions(&self) {
        if let Ok(mut subscribers) = self.subscribers.lock() {
            subscribers.clear();
        }
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers
            .lock()
            .map(|mut subscribers| {
                subscribers.retain(|tx| !tx.is_closed());
                subscribers.len()
            })
            .unwrap_or(0)
    }

    /// Replace the contents of a collection.
    pub fn seed(&self, collection: &str, rows: Vec<Value>) -> Result<(), BackendError> {
        self.lock()?.collections.insert(collection.to_string(), rows);
        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>, BackendError> {
        self.inner
            .lock()
            .map_err(|_| BackendError::new("backend state unavailable").with_status(500))
    }

    /// Lock the state, consuming any injected failure.
    fn checked(&self) -> Result<MutexGuard<'_, Inner>, BackendError> {
        let mut inner = self.lock()?;
        match inner.pending_failure.take() {
            Some(err) => Err(err),
            None => Ok(inner),
        }
    }

    fn next_id(&self, prefix: &str) -> String {
        let n = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
        format!("{}-{:08x}", prefix, n)
    }

    fn issue_session(&self, user: User) -> Session {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        Session {
            access_token: self.next_id("tok"),
            refresh_token: Some(self.next_id("ref")),
            expires_at: Some(now + TOKEN_TTL_SECS),
            user,
        }
    }

    fn session_missing() -> BackendError {
        BackendError::new("Auth session missing!").with_status(401)
    }

    fn row_id(row: &Value) -> Option<i64> {
        row.get("id").and_then(Value::as_i64)
    }
}

#[async_trait::async_trait]
impl AuthBackend for MemoryBackend {
    async fn get_session(&self) -> Result<Option<Session>, BackendError> {
        Ok(self.checked()?.current.clone())
    }

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        metadata: Option<Metadata>,
    ) -> Result<SignUpResponse, BackendError> {
        let mut inner = self.checked()?;
        if inner.accounts.contains_key(email) {
            return Err(BackendError::new("User already registered").with_status(422));
        }
        let mut user = User::new(self.next_id("user")).with_email(email);
        user.metadata = metadata.unwrap_or_default();
        inner.accounts.insert(
            email.to_string(),
            Account {
                user: user.clone(),
                password: password.to_string(),
            },
        );
        // Accounts await email confirmation, so no session yet.
        Ok(SignUpResponse {
            user: Some(user),
            session: None,
        })
    }

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthResponse, BackendError> {
        let session = {
            let mut inner = self.checked()?;
            let user = match inner.accounts.get(email) {
                Some(account) if account.password == password => account.user.clone(),
                _ => {
                    return Err(BackendError::new("Invalid login credentials").with_status(400))
                }
            };
            let session = self.issue_session(user);
            inner.current = Some(session.clone());
            session
        };
        self.emit(AuthEvent::signed_in(session.clone()));
        Ok(AuthResponse {
            user: session.user.clone(),
            session,
        })
    }

    async fn sign_in_with_oauth(
        &self,
        provider: OAuthProvider,
        redirect_to: &str,
    ) -> Result<OAuthRedirect, BackendError> {
        drop(self.checked()?);
        Ok(OAuthRedirect {
            provider,
            url: format!(
                "memory://authorize?provider={}&redirect_to={}",
                provider, redirect_to
            ),
        })
    }

    async fn sign_out(&self) -> Result<(), BackendError> {
        self.checked()?.current = None;
        self.emit(AuthEvent::signed_out());
        Ok(())
    }

    async fn reset_password_for_email(
        &self,
        email: &str,
        redirect_to: &str,
    ) -> Result<PasswordResetSent, BackendError> {
        // Unknown addresses succeed too, so account existence is not revealed.
        drop(self.checked()?);
        Ok(PasswordResetSent {
            email: email.to_string(),
            redirect_to: redirect_to.to_string(),
        })
    }

    async fn update_user(&self, update: &ProfileUpdate) -> Result<User, BackendError> {
        let session = {
            let mut inner = self.checked()?;
            let mut session = inner.current.clone().ok_or_else(Self::session_missing)?;
            let old_email = session.user.email.clone().unwrap_or_default();

            let mut account = inner
                .accounts
                .remove(&old_email)
                .ok_or_else(|| BackendError::new("User not found").with_status(404))?;
            if let Some(email) = &update.email {
                account.user.email = Some(email.clone());
            }
            if let Some(data) = &update.data {
                account
                    .user
                    .metadata
                    .extend(data.iter().map(|(k, v)| (k.clone(), v.clone())));
            }
            session.user = account.user.clone();
            let key = account.user.email.clone().unwrap_or_default();
            inner.accounts.insert(key, account);
            inner.current = Some(session.clone());
            session
        };
        let user = session.user.clone();
        self.emit(AuthEvent::new(AuthEventKind::UserUpdated, Some(session)));
        Ok(user)
    }

    fn subscribe(&self) -> SessionSubscription {
        let (tx, subscription) = SessionSubscription::channel();
        if let Ok(mut subscribers) = self.subscribers.lock() {
            subscribers.push(tx);
        }
        subscription
    }
}

#[async_trait::async_trait]
impl RecordBackend for MemoryBackend {
    async fn select(&self, collection: &str) -> Result<Vec<Value>, BackendError> {
        let inner = self.checked()?;
        Ok(inner.collections.get(collection).cloned().unwrap_or_default())
    }

    async fn insert(&self, collection: &str, rows: Vec<Value>) -> Result<Vec<Value>, BackendError> {
        if !rows.iter().all(Value::is_object) {
            return Err(BackendError::new("row must be a JSON object").with_status(400));
        }
        let mut inner = self.checked()?;
        let stored = inner.collections.entry(collection.to_string()).or_default();
        let mut next_id = stored.iter().filter_map(Self::row_id).max().unwrap_or(0) + 1;

        let mut inserted = rows;
        for object in inserted.iter_mut().filter_map(Value::as_object_mut) {
            if !object.contains_key("id") {
                object.insert("id".into(), Value::from(next_id));
                next_id += 1;
            }
        }
        stored.extend(inserted.iter().cloned());
        Ok(inserted)
    }

    async fn update(
        &self,
        collection: &str,
        id: i64,
        changes: Value,
    ) -> Result<Vec<Value>, BackendError> {
        let Value::Object(changes) = changes else {
            return Err(BackendError::new("changes must be a JSON object").with_status(400));
        };
        let mut inner = self.checked()?;
        let Some(rows) = inner.collections.get_mut(collection) else {
            return Ok(Vec::new());
        };

        let mut updated = Vec::new();
        for row in rows.iter_mut().filter(|r| Self::row_id(r) == Some(id)) {
            if let Some(object) = row.as_object_mut() {
                for (key, value) in &changes {
                    if key != "id" {
                        object.insert(key.clone(), value.clone());
                    }
                }
            }
            updated.push(row.clone());
        }
        Ok(updated)
    }

    async fn delete(&self, collection: &str, id: i64) -> Result<(), BackendError> {
        let mut inner = self.checked()?;
        if let Some(rows) = inner.collections.get_mut(collection) {
            rows.retain(|r| Self::row_id(r) != Some(id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_sign_in_issues_session_and_event() {
        let backend = MemoryBackend::new();
        backend.register("a@b.com", "pw").unwrap();
        let mut sub = backend.subscribe();

        let resp = backend.sign_in_with_password("a@b.com", "pw").await.unwrap();
        assert_eq!(resp.user.email.as_deref(), Some("a@b.com"));
        assert_eq!(resp.session.user, resp.user);

        let stored = backend.get_session().await.unwrap();
        assert_eq!(stored.as_ref(), Some(&resp.session));

        let event = sub.try_recv().unwrap();
        assert_eq!(event.kind, AuthEventKind::SignedIn);
        assert_eq!(event.session, Some(resp.session));
    }

    #[tokio::test]
    async fn test_sign_in_wrong_password() {
        let backend = MemoryBackend::new();
        backend.register("a@b.com", "pw").unwrap();

        let err = backend
            .sign_in_with_password("a@b.com", "nope")
            .await
            .unwrap_err();
        assert_eq!(err.message, "Invalid login credentials");
        assert!(backend.get_session().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_sign_up_has_no_session() {
        let backend = MemoryBackend::new();
        let mut metadata = Metadata::new();
        metadata.insert("name".into(), json!("Ada"));

        let resp = backend.sign_up("a@b.com", "pw", Some(metadata)).await.unwrap();
        assert!(resp.session.is_none());
        assert_eq!(resp.user.unwrap().metadata["name"], "Ada");

        let dup = backend.sign_up("a@b.com", "pw", None).await.unwrap_err();
        assert_eq!(dup.status, Some(422));
    }

    #[tokio::test]
    async fn test_fail_next_is_one_shot() {
        let backend = MemoryBackend::new();
        backend.fail_next("network down").unwrap();

        let err = backend.get_session().await.unwrap_err();
        assert_eq!(err.message, "network down");
        assert!(backend.get_session().await.is_ok());
    }

    #[tokio::test]
    async fn test_update_user_requires_session() {
        let backend = MemoryBackend::new();
        let err = backend
            .update_user(&ProfileUpdate::default())
            .await
            .unwrap_err();
        assert_eq!(err.status, Some(401));
    }

    #[tokio::test]
    async fn test_update_user_rekeys_email() {
        let backend = MemoryBackend::new();
        backend.register("a@b.com", "pw").unwrap();
        backend.sign_in_with_password("a@b.com", "pw").await.unwrap();

        let update = ProfileUpdate {
            email: Some("c@d.com".into()),
            data: None,
        };
        let user = backend.update_user(&update).await.unwrap();
        assert_eq!(user.email.as_deref(), Some("c@d.com"));

        backend.sign_out().await.unwrap();
        assert!(backend.sign_in_with_password("c@d.com", "pw").await.is_ok());
        assert!(backend.sign_in_with_password("a@b.com", "pw").await.is_err());
    }

    #[tokio::test]
    async fn test_refresh_rotates_token() {
        let backend = MemoryBackend::new();
        backend.register("a@b.com", "pw").unwrap();
        let first = backend
            .sign_in_with_password("a@b.com", "pw")
            .await
            .unwrap()
            .session;

        let mut sub = backend.subscribe();
        let refreshed = backend.refresh_session().unwrap();
        assert_ne!(refreshed.access_token, first.access_token);
        assert_eq!(refreshed.user, first.user);
        assert_eq!(sub.try_recv().unwrap().kind, AuthEventKind::TokenRefreshed);
    }

    #[tokio::test]
    async fn test_dropped_subscriptions_are_pruned() {
        let backend = MemoryBackend::new();
        let sub = backend.subscribe();
        let _kept = backend.subscribe();
        assert_eq!(backend.subscriber_count(), 2);

        drop(sub);
        assert_eq!(backend.subscriber_count(), 1);
    }

    #[tokio::test]
    async fn test_record_crud() {
        let backend = MemoryBackend::new();
        backend.seed("recipes", vec![json!({"id": 7, "title": "Soup"})]).unwrap();

        let inserted = backend
            .insert("recipes", vec![json!({"title": "Salad"})])
            .await
            .unwrap();
        assert_eq!(inserted[0]["id"], 8);

        let updated = backend
            .update("recipes", 8, json!({"title": "Green Salad", "id": 99}))
            .await
            .unwrap();
        assert_eq!(updated.len(), 1);
        assert_eq!(updated[0]["title"], "Green Salad");
        assert_eq!(updated[0]["id"], 8);

        let missing = backend
            .update("recipes", 1000, json!({"title": "x"}))
            .await
            .unwrap();
        assert!(missing.is_empty());

        backend.delete("recipes", 7).await.unwrap();
        let rows = backend.select("recipes").await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["id"], 8);
    }

    #[tokio::test]
    async fn test_insert_rejects_non_objects() {
        let backend = MemoryBackend::new();
        let err = backend.insert("recipes", vec![json!(42)]).await.unwrap_err();
        assert_eq!(err.status, Some(400));
    }

    #[tokio::test]
    async fn test_insert_bad_batch_commits_nothing() {
        let backend = MemoryBackend::new();
        backend.seed("recipes", vec![json!({"id": 1, "title": "Soup"})]).unwrap();

        let result = backend
            .insert(
                "recipes",
                vec![json!({"title": "Salad"}), json!("oops"), json!({"title": "Stew"})],
            )
            .await;
        assert!(result.is_err());

        let rows = backend.select("recipes").await.unwrap();
        assert_eq!(rows, vec![json!({"id": 1, "title": "Soup"})]);
    }

    #[tokio::test]
    async fn test_oauth_and_reset_honor_injected_failure() {
        let backend = MemoryBackend::new();

        backend.fail_next("provider down").unwrap();
        let err = backend
            .sign_in_with_oauth(OAuthProvider::Google, "http://localhost/auth/callback")
            .await
            .unwrap_err();
        assert_eq!(err.message, "provider down");

        let redirect = backend
            .sign_in_with_oauth(OAuthProvider::Google, "http://localhost/auth/callback")
            .await
            .unwrap();
        assert!(redirect.url.contains("provider=google"));

        backend.fail_next("mailer down").unwrap();
        assert!(backend
            .reset_password_for_email("a@b.com", "http://localhost/auth/reset-password")
            .await
            .is_err());

        let sent = backend
            .reset_password_for_email("a@b.com", "http://localhost/auth/reset-password")
            .await
            .unwrap();
        assert_eq!(sent.email, "a@b.com");
        // The backend lock is released after each call.
        assert!(backend.get_session().await.unwrap().is_none());
    }
}
