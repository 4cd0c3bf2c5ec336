// Local identity provider for single-machine installs.
//
// Behavior
// - Any non-empty email signs in; the password is not checked.
// - One session at a time, stored under `attendance_app_session`. Signing in
//   again replaces (and announces the end of) the previous session.
// - The stored session is the ambient session: it survives restarts and is
//   returned when no token is presented.

use crate::modules::session::adapters::outbound::identity::{
    AuthError, IdentityProvider, SESSION_EVENTS_CAPACITY, SessionEvent,
};
use crate::modules::session::core::session::{Credentials, Session};
use crate::shared::core::primitives::{Clock, new_id};
use crate::shared::infrastructure::key_value::{KeyValueError, KeyValueStore};
use std::sync::Arc;
use tokio::sync::{Mutex, broadcast};
use tracing::info;

pub const SESSION_KEY: &str = "attendance_app_session";

impl From<KeyValueError> for AuthError {
    fn from(error: KeyValueError) -> Self {
        AuthError::Unavailable(error.to_string())
    }
}

pub struct LocalIdentityProvider<TKv>
where
    TKv: KeyValueStore + 'static,
{
    kv: Arc<TKv>,
    clock: Arc<dyn Clock>,
    events: broadcast::Sender<SessionEvent>,
    write_lock: Mutex<()>,
}

impl<TKv> LocalIdentityProvider<TKv>
where
    TKv: KeyValueStore + 'static,
{
    pub fn new(kv: Arc<TKv>, clock: Arc<dyn Clock>) -> Self {
        let (events, _) = broadcast::channel(SESSION_EVENTS_CAPACITY);
        Self {
            kv,
            clock,
            events,
            write_lock: Mutex::new(()),
        }
    }

    async fn stored(&self) -> Result<Option<Session>, AuthError> {
        match self.kv.get(SESSION_KEY).await? {
            None => Ok(None),
            Some(raw) => serde_json::from_str(&raw)
                .map(Some)
                .map_err(|e| AuthError::Unavailable(format!("unreadable session: {e}"))),
        }
    }
}

#[async_trait::async_trait]
impl<TKv> IdentityProvider for LocalIdentityProvider<TKv>
where
    TKv: KeyValueStore + 'static,
{
    async fn sign_in(&self, credentials: &Credentials) -> Result<Session, AuthError> {
        let email = credentials.normalized_email();
        if email.is_empty() {
            return Err(AuthError::InvalidCredentials);
        }
        let _guard = self.write_lock.lock().await;
        let previous = self.stored().await?;
        let session = Session {
            session_id: new_id(),
            user_id: format!("local:{email}"),
            display_label: email,
            signed_in_at: self.clock.now_millis(),
        };
        let raw = serde_json::to_string(&session)
            .map_err(|e| AuthError::Unavailable(e.to_string()))?;
        self.kv.set(SESSION_KEY, raw).await?;

        if let Some(previous) = previous {
            let _ = self.events.send(SessionEvent::SignedOut {
                session_id: previous.session_id,
            });
        }
        info!(user_id = %session.user_id, "signed in locally");
        let _ = self.events.send(SessionEvent::SignedIn(session.clone()));
        Ok(session)
    }

    async fn sign_out(&self, session_id: &str) -> Result<(), AuthError> {
        let _guard = self.write_lock.lock().await;
        let Some(stored) = self.stored().await? else {
            return Ok(());
        };
        if stored.session_id != session_id {
            return Ok(());
        }
        self.kv.remove(SESSION_KEY).await?;
        info!(user_id = %stored.user_id, "signed out locally");
        let _ = self.events.send(SessionEvent::SignedOut {
            session_id: stored.session_id,
        });
        Ok(())
    }

    async fn current_session(
        &self,
        session_id: Option<&str>,
    ) -> Result<Option<Session>, AuthError> {
        let stored = self.stored().await?;
        Ok(stored.filter(|s| session_id.is_none_or(|id| s.session_id == id)))
    }

    fn observe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }
}
