// In memory identity provider.
//
// Responsibilities
// - Check credentials against accounts registered at startup.
// - Keep live sessions keyed by token and announce every sign-in and sign-out.
// - Simulate an unreachable identity service for tests.

use crate::modules::session::adapters::outbound::identity::{
    AuthError, IdentityProvider, SESSION_EVENTS_CAPACITY, SessionEvent,
};
use crate::modules::session::core::session::{Credentials, Session};
use crate::shared::core::primitives::{Clock, new_id};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::{RwLock, broadcast};
use tracing::{info, warn};

struct Account {
    user_id: String,
    password: String,
}

pub struct InMemoryIdentityProvider {
    accounts: HashMap<String, Account>,
    sessions: RwLock<HashMap<String, Session>>,
    events: broadcast::Sender<SessionEvent>,
    clock: Arc<dyn Clock>,
    is_offline: AtomicBool,
}

impl InMemoryIdentityProvider {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        let (events, _) = broadcast::channel(SESSION_EVENTS_CAPACITY);
        Self {
            accounts: HashMap::new(),
            sessions: RwLock::new(HashMap::new()),
            events,
            clock,
            is_offline: AtomicBool::new(false),
        }
    }

    pub fn with_account(mut self, email: &str, password: &str) -> Self {
        let email = Credentials::new(email, password).normalized_email();
        self.accounts.insert(
            email,
            Account {
                user_id: new_id(),
                password: password.to_string(),
            },
        );
        self
    }

    pub fn set_offline(&self, offline: bool) {
        self.is_offline.store(offline, Ordering::SeqCst);
    }

    /// End a session out of band, the way an administrator or another tab would.
    pub async fn revoke(&self, session_id: &str) {
        if self.sessions.write().await.remove(session_id).is_some() {
            let _ = self.events.send(SessionEvent::SignedOut {
                session_id: session_id.to_string(),
            });
        }
    }

    fn ensure_online(&self) -> Result<(), AuthError> {
        if self.is_offline.load(Ordering::SeqCst) {
            return Err(AuthError::Unavailable("Identity service offline".into()));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl IdentityProvider for InMemoryIdentityProvider {
    async fn sign_in(&self, credentials: &Credentials) -> Result<Session, AuthError> {
        self.ensure_online()?;
        let email = credentials.normalized_email();
        let Some(account) = self
            .accounts
            .get(&email)
            .filter(|account| account.password == credentials.password)
        else {
            warn!(email = %email, "rejected sign-in");
            return Err(AuthError::InvalidCredentials);
        };

        let session = Session {
            session_id: new_id(),
            user_id: account.user_id.clone(),
            display_label: email,
            signed_in_at: self.clock.now_millis(),
        };
        self.sessions
            .write()
            .await
            .insert(session.session_id.clone(), session.clone());
        info!(user_id = %session.user_id, "signed in");
        let _ = self.events.send(SessionEvent::SignedIn(session.clone()));
        Ok(session)
    }

    async fn sign_out(&self, session_id: &str) -> Result<(), AuthError> {
        self.ensure_online()?;
        self.revoke(session_id).await;
        info!("signed out");
        Ok(())
    }

    async fn current_session(
        &self,
        session_id: Option<&str>,
    ) -> Result<Option<Session>, AuthError> {
        self.ensure_online()?;
        let Some(session_id) = session_id else {
            return Ok(None);
        };
        Ok(self.sessions.read().await.get(session_id).cloned())
    }

    fn observe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }
}
