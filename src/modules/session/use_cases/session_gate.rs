// Session gate: the single source of truth for "who is looking at this view".
//
// Responsibilities
// - Resolve the initial session and publish it as generation 1.
// - Publish every later transition with a strictly higher generation.
// - Follow sign-outs announced by the identity provider for the held session.
//
// Notes
// - sign_out transitions on success without waiting for the provider's
//   notification; the notification then finds nothing to end.
// - Failed calls leave the published state untouched.

use crate::modules::session::adapters::outbound::identity::{
    AuthError, IdentityProvider, SessionEvent,
};
use crate::modules::session::core::session::{Credentials, Session};
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateState {
    pub generation: u64,
    pub session: Option<Session>,
}

pub struct SessionGate {
    identity: Arc<dyn IdentityProvider>,
    state: Arc<watch::Sender<GateState>>,
    listener: JoinHandle<()>,
}

fn transition(state: &watch::Sender<GateState>, session: Option<Session>) -> u64 {
    let mut generation = 0;
    state.send_modify(|current| {
        current.generation += 1;
        current.session = session;
        generation = current.generation;
    });
    generation
}

impl SessionGate {
    pub async fn open(
        identity: Arc<dyn IdentityProvider>,
        session_id: Option<&str>,
    ) -> Result<Arc<Self>, AuthError> {
        // Subscribe before resolving so a sign-out racing the lookup is seen.
        let mut events = identity.observe();
        let session = identity.current_session(session_id).await?;
        let (sender, _) = watch::channel(GateState {
            generation: 1,
            session,
        });
        let state = Arc::new(sender);

        let listener_state = state.clone();
        let listener = tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(SessionEvent::SignedOut { session_id }) => {
                        let held = listener_state
                            .borrow()
                            .session
                            .as_ref()
                            .is_some_and(|s| s.session_id == session_id);
                        if held {
                            info!("session ended by the identity provider");
                            transition(&listener_state, None);
                        }
                    }
                    Ok(SessionEvent::SignedIn(_)) => {}
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, "session notifications lagged");
                    }
                    Err(RecvError::Closed) => {
                        debug!("identity provider closed its notifications");
                        break;
                    }
                }
            }
        });

        Ok(Arc::new(Self {
            identity,
            state,
            listener,
        }))
    }

    pub fn current_session(&self) -> Option<Session> {
        self.state.borrow().session.clone()
    }

    pub fn generation(&self) -> u64 {
        self.state.borrow().generation
    }

    pub fn is_current(&self, generation: u64) -> bool {
        self.generation() == generation
    }

    pub fn snapshot(&self) -> GateState {
        self.state.borrow().clone()
    }

    /// The receiver starts at the current state; read it before awaiting changes.
    pub fn on_session_change(&self) -> watch::Receiver<GateState> {
        self.state.subscribe()
    }

    pub async fn sign_in(&self, credentials: &Credentials) -> Result<Session, AuthError> {
        let session = self.identity.sign_in(credentials).await?;
        transition(&self.state, Some(session.clone()));
        Ok(session)
    }

    pub async fn sign_out(&self) -> Result<(), AuthError> {
        let Some(session) = self.current_session() else {
            return Ok(());
        };
        self.identity.sign_out(&session.session_id).await?;
        let still_held = self
            .current_session()
            .is_some_and(|s| s.session_id == session.session_id);
        if still_held {
            transition(&self.state, None);
        }
        Ok(())
    }
}

impl Drop for SessionGate {
    fn drop(&mut self) {
        self.listener.abort();
    }
}
