//! Authenticated session state.
//!
//! [`SessionController`] is the only writer of the session. Screens and the
//! router observe it through cloned [`SessionHandle`]s, which are backed by a
//! `watch` channel so every reader always sees one consistent state.

use crate::api::{endpoints, ApiClient, CurrentUser};
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::watch;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Default)]
pub enum SessionState {
    /// Nothing has been resolved yet.
    #[default]
    Unresolved,
    /// A "who am I" lookup is in flight.
    Resolving,
    Anonymous,
    Authenticated(CurrentUser),
}

impl SessionState {
    pub fn user(&self) -> Option<&CurrentUser> {
        match self {
            SessionState::Authenticated(user) => Some(user),
            _ => None,
        }
    }

    /// `None` unless authenticated.
    pub fn is_onboarded(&self) -> Option<bool> {
        self.user().map(|user| user.personality_test_completed)
    }

    pub fn is_settled(&self) -> bool {
        matches!(
            self,
            SessionState::Anonymous | SessionState::Authenticated(_)
        )
    }
}

/// Read-only view of the session, cheap to clone.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    rx: watch::Receiver<SessionState>,
}

impl SessionHandle {
    pub fn current(&self) -> SessionState {
        self.rx.borrow().clone()
    }

    pub fn current_user(&self) -> Option<CurrentUser> {
        self.rx.borrow().user().cloned()
    }

    /// Wait for the next state change. Returns `false` once the controller
    /// has been dropped.
    pub async fn changed(&mut self) -> bool {
        self.rx.changed().await.is_ok()
    }

    /// Mark the current value as seen and return it.
    pub fn observe(&mut self) -> SessionState {
        self.rx.borrow_and_update().clone()
    }
}

/// A handle fed by a bare channel, for exercising screens without a backend.
#[cfg(test)]
pub(crate) fn test_channel(state: SessionState) -> (watch::Sender<SessionState>, SessionHandle) {
    let (tx, rx) = watch::channel(state);
    (tx, SessionHandle { rx })
}

pub struct SessionController {
    client: ApiClient,
    tx: watch::Sender<SessionState>,
    bootstrapped: AtomicBool,
}

impl SessionController {
    pub fn new(client: ApiClient) -> Self {
        let (tx, _rx) = watch::channel(SessionState::Unresolved);
        Self {
            client,
            tx,
            bootstrapped: AtomicBool::new(false),
        }
    }

    pub fn handle(&self) -> SessionHandle {
        SessionHandle {
            rx: self.tx.subscribe(),
        }
    }

    pub fn state(&self) -> SessionState {
        self.tx.borrow().clone()
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// Resolve the session from the stored token. Only the first call does
    /// any work; later calls return the current state.
    pub async fn bootstrap(&self) -> SessionState {
        if self.bootstrapped.swap(true, Ordering::SeqCst) {
            return self.state();
        }
        self.resolve().await
    }

    /// Re-resolve the session from the server unconditionally, e.g. after
    /// the onboarding flag was flipped by a submission.
    pub async fn refresh(&self) -> SessionState {
        self.bootstrapped.store(true, Ordering::SeqCst);
        self.resolve().await
    }

    pub async fn login(&self, email: &str, password: &str) -> bool {
        match endpoints::login(&self.client, email, password).await {
            Ok(response) => self.adopt_token(&response.access_token, "login").await,
            Err(err) => {
                warn!(error = %err, "login failed");
                false
            }
        }
    }

    pub async fn register(&self, email: &str, password: &str, full_name: &str) -> bool {
        match endpoints::register(&self.client, email, password, full_name).await {
            Ok(response) => self.adopt_token(&response.access_token, "register").await,
            Err(err) => {
                warn!(error = %err, "registration failed");
                false
            }
        }
    }

    /// Forget the token and the user. No network call is made.
    pub fn logout(&self) {
        if let Err(err) = self.client.token_store().clear() {
            warn!(error = %err, "failed to remove stored token");
        }
        self.bootstrapped.store(true, Ordering::SeqCst);
        self.tx.send_replace(SessionState::Anonymous);
        info!("signed out");
    }

    /// Validate a freshly issued token, then persist it and publish the user
    /// in one step. Nothing changes unless every step succeeds.
    async fn adopt_token(&self, token: &str, operation: &'static str) -> bool {
        let user = match endpoints::fetch_current_user(&self.client, Some(token)).await {
            Ok(user) => user,
            Err(err) => {
                warn!(operation, error = %err, "could not load the signed-in user");
                return false;
            }
        };
        if let Err(err) = self.client.token_store().set(token) {
            warn!(operation, error = %err, "could not persist session token");
            return false;
        }
        self.bootstrapped.store(true, Ordering::SeqCst);
        info!(operation, user_id = %user.id, "signed in");
        self.tx.send_replace(SessionState::Authenticated(user));
        true
    }

    async fn resolve(&self) -> SessionState {
        let tokens = self.client.token_store();
        let token = match tokens.get() {
            Ok(token) => token,
            Err(err) => {
                warn!(error = %err, "token store unreadable; treating session as signed out");
                None
            }
        };

        let Some(token) = token else {
            debug!("no stored token");
            return self.publish(SessionState::Anonymous);
        };

        self.tx.send_replace(SessionState::Resolving);
        match endpoints::fetch_current_user(&self.client, Some(&token)).await {
            Ok(user) => {
                debug!(
                    user_id = %user.id,
                    onboarded = user.personality_test_completed,
                    "session resolved"
                );
                self.publish(SessionState::Authenticated(user))
            }
            Err(err) => {
                info!(error = %err, "stored token rejected; signing out");
                if let Err(err) = tokens.clear() {
                    warn!(error = %err, "failed to remove rejected token");
                }
                self.publish(SessionState::Anonymous)
            }
        }
    }

    fn publish(&self, state: SessionState) -> SessionState {
        self.tx.send_replace(state.clone());
        state
    }
}
