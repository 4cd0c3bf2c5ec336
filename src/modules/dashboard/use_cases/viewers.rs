// Viewer registry: one mounted dashboard per live browser session.
//
// Dashboards are keyed by session token. A dashboard whose session ended
// (here or elsewhere) is dropped the next time it is looked up or pruned.

use crate::modules::dashboard::use_cases::dashboard::{Dashboard, DashboardError};
use crate::modules::session::adapters::outbound::identity::AuthError;
use crate::modules::session::core::session::{Credentials, Session};
use crate::modules::session::use_cases::session_gate::SessionGate;
use crate::shell::context::AppContext;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

pub struct ViewerRegistry {
    context: AppContext,
    dashboards: RwLock<HashMap<String, Arc<Dashboard>>>,
}

impl ViewerRegistry {
    pub fn new(context: AppContext) -> Self {
        Self {
            context,
            dashboards: RwLock::new(HashMap::new()),
        }
    }

    pub fn context(&self) -> &AppContext {
        &self.context
    }

    pub async fn viewer_count(&self) -> usize {
        self.dashboards.read().await.len()
    }

    /// Dashboard for a session token, mounting one if the provider knows the
    /// session. Without a token the provider's ambient session is used.
    pub async fn resolve(
        &self,
        session_id: Option<&str>,
    ) -> Result<Option<Arc<Dashboard>>, AuthError> {
        if let Some(session_id) = session_id {
            let known = self.dashboards.read().await.get(session_id).cloned();
            match known {
                Some(dashboard) if dashboard.is_signed_in() => return Ok(Some(dashboard)),
                Some(_) => {
                    debug!("dropping dashboard of an ended session");
                    self.dashboards.write().await.remove(session_id);
                }
                None => {}
            }
        }

        let gate = SessionGate::open(self.context.identity.clone(), session_id).await?;
        let Some(session) = gate.current_session() else {
            return Ok(None);
        };
        Ok(Some(self.mount(&session, gate).await))
    }

    pub async fn sign_in(
        &self,
        credentials: &Credentials,
    ) -> Result<(Session, Arc<Dashboard>), AuthError> {
        self.prune().await;
        let gate = SessionGate::open(self.context.identity.clone(), None).await?;
        let session = gate.sign_in(credentials).await?;
        let dashboard = self.mount(&session, gate).await;
        Ok((session, dashboard))
    }

    /// On failure the session and its dashboard stay in place.
    pub async fn sign_out(&self, session_id: &str) -> Result<(), DashboardError> {
        let Some(dashboard) = self.resolve(Some(session_id)).await? else {
            return Ok(());
        };
        dashboard.sign_out().await?;
        self.dashboards.write().await.remove(session_id);
        Ok(())
    }

    async fn mount(&self, session: &Session, gate: Arc<SessionGate>) -> Arc<Dashboard> {
        let dashboard = Dashboard::mount(self.context.clone(), gate);
        self.dashboards
            .write()
            .await
            .insert(session.session_id.clone(), dashboard.clone());
        dashboard
    }

    async fn prune(&self) {
        self.dashboards
            .write()
            .await
            .retain(|_, dashboard| dashboard.is_signed_in());
    }
}
