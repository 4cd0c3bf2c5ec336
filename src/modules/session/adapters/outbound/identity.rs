// Identity provider port.
//
// Purpose
// - Authenticate viewers, end sessions and resolve a session token to a viewer.
// - Notify listeners when a session ends, including sessions ended elsewhere.
//
// Implementations
// - InMemoryIdentityProvider: accounts configured at startup.
// - LocalIdentityProvider: mock sign-in persisted in the key-value store.

use crate::modules::session::core::session::{Credentials, Session};
use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::broadcast;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("identity service unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    SignedIn(Session),
    SignedOut { session_id: String },
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn sign_in(&self, credentials: &Credentials) -> Result<Session, AuthError>;

    /// Ending an unknown session succeeds.
    async fn sign_out(&self, session_id: &str) -> Result<(), AuthError>;

    /// Resolve a session token. `None` asks for the provider's ambient session,
    /// which only the local provider has.
    async fn current_session(&self, session_id: Option<&str>)
    -> Result<Option<Session>, AuthError>;

    fn observe(&self) -> broadcast::Receiver<SessionEvent>;
}

pub const SESSION_EVENTS_CAPACITY: usize = 64;
