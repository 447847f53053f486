//! # Session — authentication state machine
//!
//! Holds the bearer token and the validated user profile, and owns every
//! transition between the auth phases:
//!
//! ```text
//! Unauthenticated --login attempt--> Validating
//! Validating --profile fetched-----> Authenticated
//! Validating --validation failed---> Unauthenticated   (persisted token cleared)
//! Authenticated --logout / 401-----> Unauthenticated   (persisted token cleared)
//! ```
//!
//! The session is an explicit, constructed object injected into
//! [`ApiClient`](crate::client::ApiClient) and the views; there is no
//! module-level singleton. The token is read at request-dispatch time via
//! [`Session::token`], so a rotation is observed by calls that have not yet
//! been sent.
//!
//! Persistence goes through the [`TokenStore`] trait, which lets tests run
//! the full lifecycle against [`store::MemoryTokenStore`].
//!
//! The user profile is present if and only if the token has been validated
//! against the backend: `login` persists the token only after the profile
//! fetch succeeds, and a failed silent revalidation clears the persisted
//! token rather than retrying (fail closed).

use std::sync::{Arc, Mutex};

use store::TokenStore;

use crate::models::User;

/// Where the session currently stands in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthPhase {
    #[default]
    Unauthenticated,
    /// A token exists but the profile fetch has not completed yet.
    Validating,
    Authenticated,
}

#[derive(Debug, Default)]
struct SessionState {
    token: Option<String>,
    user: Option<User>,
    phase: AuthPhase,
    /// Bumped on every token change; lets a revalidation result be discarded
    /// when the token it validated is no longer the current one.
    epoch: u64,
}

/// Authentication session, cheap to clone and share across views.
#[derive(Debug)]
pub struct Session<S: TokenStore> {
    state: Arc<Mutex<SessionState>>,
    store: S,
}

impl<S: TokenStore + Clone> Clone for Session<S> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            store: self.store.clone(),
        }
    }
}

impl<S: TokenStore> Session<S> {
    pub fn new(store: S) -> Self {
        Self {
            state: Arc::new(Mutex::new(SessionState::default())),
            store,
        }
    }

    /// Load the persisted token, if any, and enter `Validating`.
    ///
    /// Returns `true` when a token was found; the caller is expected to
    /// follow up with a revalidation and either [`apply_profile`](Self::apply_profile)
    /// or [`fail_validation`](Self::fail_validation).
    pub async fn restore(&self) -> bool {
        match self.store.load().await {
            Some(token) => {
                let mut state = self.state.lock().unwrap();
                state.token = Some(token);
                state.phase = AuthPhase::Validating;
                state.epoch += 1;
                true
            }
            None => false,
        }
    }

    /// Current bearer token, read at dispatch time.
    pub fn token(&self) -> Option<String> {
        self.state.lock().unwrap().token.clone()
    }

    pub fn user(&self) -> Option<User> {
        self.state.lock().unwrap().user.clone()
    }

    pub fn phase(&self) -> AuthPhase {
        self.state.lock().unwrap().phase
    }

    /// True only once the profile has been validated against the backend.
    pub fn is_authenticated(&self) -> bool {
        self.state.lock().unwrap().user.is_some()
    }

    /// Ticket identifying the current token; a revalidation result is only
    /// applied while the ticket still matches.
    pub fn validation_ticket(&self) -> u64 {
        self.state.lock().unwrap().epoch
    }

    /// A login attempt has started.
    pub fn begin_login(&self) {
        let mut state = self.state.lock().unwrap();
        state.phase = AuthPhase::Validating;
    }

    /// A login attempt failed before a profile was obtained; nothing was
    /// persisted and no user is set, so fall back to unauthenticated.
    pub fn abort_login(&self) {
        let mut state = self.state.lock().unwrap();
        if state.user.is_none() {
            state.phase = AuthPhase::Unauthenticated;
        }
    }

    /// Token exchanged and profile fetched: persist the token and enter
    /// `Authenticated`. This is the only path that persists anything.
    pub async fn complete_login(&self, token: String, user: User) {
        self.store.save(&token).await;
        let mut state = self.state.lock().unwrap();
        state.token = Some(token);
        state.user = Some(user);
        state.phase = AuthPhase::Authenticated;
        state.epoch += 1;
    }

    /// Silent revalidation succeeded for the given ticket.
    ///
    /// Returns `false` when the ticket is stale (the token changed while the
    /// profile fetch was in flight), in which case the profile is discarded.
    pub fn apply_profile(&self, ticket: u64, user: User) -> bool {
        let mut state = self.state.lock().unwrap();
        if state.epoch != ticket || state.token.is_none() {
            return false;
        }
        state.user = Some(user);
        state.phase = AuthPhase::Authenticated;
        true
    }

    /// Silent revalidation failed for the given ticket: clear the persisted
    /// token and reset to unauthenticated. Stale tickets are ignored.
    pub async fn fail_validation(&self, ticket: u64) {
        {
            let state = self.state.lock().unwrap();
            if state.epoch != ticket {
                return;
            }
        }
        self.clear().await;
    }

    /// Explicit logout. Idempotent: safe to call when already signed out.
    pub async fn logout(&self) {
        self.clear().await;
    }

    /// Forced logout, invoked by the HTTP layer whenever any response
    /// signals the token is no longer valid.
    pub async fn invalidate(&self) {
        self.clear().await;
    }

    async fn clear(&self) {
        self.store.clear().await;
        let mut state = self.state.lock().unwrap();
        state.token = None;
        state.user = None;
        state.phase = AuthPhase::Unauthenticated;
        state.epoch += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use store::{MemoryTokenStore, TokenStore};

    fn test_user() -> User {
        serde_json::from_str(
            r#"{
                "id": 1,
                "username": "alice",
                "email": "alice@example.org",
                "role": "researcher",
                "is_active": true,
                "is_verified": true,
                "created_at": "2024-01-01T00:00:00",
                "updated_at": "2024-01-01T00:00:00"
            }"#,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn starts_unauthenticated_without_persisted_token() {
        let session = Session::new(MemoryTokenStore::new());
        assert!(!session.restore().await);
        assert_eq!(session.phase(), AuthPhase::Unauthenticated);
        assert_eq!(session.token(), None);
    }

    #[tokio::test]
    async fn restore_enters_validating_with_persisted_token() {
        let store = MemoryTokenStore::new();
        store.save("persisted").await;

        let session = Session::new(store);
        assert!(session.restore().await);
        assert_eq!(session.phase(), AuthPhase::Validating);
        assert_eq!(session.token(), Some("persisted".to_string()));
        // Not authenticated until the profile arrives.
        assert!(!session.is_authenticated());
    }

    #[tokio::test]
    async fn successful_login_persists_token_and_authenticates() {
        let store = MemoryTokenStore::new();
        let session = Session::new(store.clone());

        session.begin_login();
        assert_eq!(session.phase(), AuthPhase::Validating);

        session.complete_login("tok".to_string(), test_user()).await;
        assert_eq!(session.phase(), AuthPhase::Authenticated);
        assert!(session.is_authenticated());
        assert_eq!(store.load().await, Some("tok".to_string()));
    }

    #[tokio::test]
    async fn failed_login_persists_nothing() {
        let store = MemoryTokenStore::new();
        let session = Session::new(store.clone());

        session.begin_login();
        session.abort_login();

        assert_eq!(session.phase(), AuthPhase::Unauthenticated);
        assert_eq!(session.token(), None);
        assert_eq!(store.load().await, None);
    }

    #[tokio::test]
    async fn logout_is_idempotent_when_already_unauthenticated() {
        let session = Session::new(MemoryTokenStore::new());
        session.logout().await;
        session.logout().await;
        assert_eq!(session.phase(), AuthPhase::Unauthenticated);
        assert_eq!(session.token(), None);
        assert_eq!(session.user(), None);
    }

    #[tokio::test]
    async fn forced_invalidate_clears_persisted_token() {
        let store = MemoryTokenStore::new();
        let session = Session::new(store.clone());
        session.complete_login("tok".to_string(), test_user()).await;
        assert!(session.is_authenticated());

        // Simulates the HTTP layer observing a 401 from any view's call.
        session.invalidate().await;

        assert_eq!(session.phase(), AuthPhase::Unauthenticated);
        assert_eq!(session.user(), None);
        assert_eq!(store.load().await, None);
    }

    #[tokio::test]
    async fn failed_revalidation_clears_persisted_token() {
        let store = MemoryTokenStore::new();
        store.save("expired").await;

        let session = Session::new(store.clone());
        session.restore().await;
        let ticket = session.validation_ticket();

        session.fail_validation(ticket).await;

        assert_eq!(session.phase(), AuthPhase::Unauthenticated);
        assert_eq!(store.load().await, None);
    }

    #[tokio::test]
    async fn stale_revalidation_result_is_discarded() {
        let store = MemoryTokenStore::new();
        store.save("old").await;

        let session = Session::new(store.clone());
        session.restore().await;
        let stale = session.validation_ticket();

        // Token rotates (fresh login) while the old profile fetch is in flight.
        session.complete_login("new".to_string(), test_user()).await;

        assert!(!session.apply_profile(stale, test_user()));
        session.fail_validation(stale).await;

        // The fresh session is untouched.
        assert_eq!(session.phase(), AuthPhase::Authenticated);
        assert_eq!(store.load().await, Some("new".to_string()));
    }

    #[tokio::test]
    async fn revalidation_applies_for_current_ticket() {
        let store = MemoryTokenStore::new();
        store.save("tok").await;

        let session = Session::new(store);
        session.restore().await;
        let ticket = session.validation_ticket();

        assert!(session.apply_profile(ticket, test_user()));
        assert_eq!(session.phase(), AuthPhase::Authenticated);
        assert_eq!(session.user().unwrap().username, "alice");
    }
}
