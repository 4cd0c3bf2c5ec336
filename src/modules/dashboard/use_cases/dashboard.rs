// Per-viewer dashboard controller.
//
// Responsibilities
// - Follow the session gate: landing screen while logged out, dashboard with a
//   live listing feed while logged in.
// - Apply a listing only if it was requested for the current gate generation
//   and was read at a store revision no older than the one on screen.
// - Re-list on every page load when the store cannot push changes.
// - Run the form actions (submit, delete, clear, sign out) and leave a flash
//   message describing the outcome.
//
// Resources
// - One session listener task and at most one listing feed. Both end when the
//   dashboard is dropped; the feed also ends on sign-out.

use crate::modules::attendance::adapters::outbound::record_store::{
    Listing, StoreError, Subscription, list_at, subscribe,
};
use crate::modules::attendance::core::record::{
    AttendanceRecord, ValidationError, normalize_display_name,
};
use crate::modules::dashboard::core::renderer::TableBody;
use crate::modules::dashboard::core::view::{
    ActionOutcome, Confirmation, Flash, PageView, Screen,
};
use crate::modules::session::adapters::outbound::identity::AuthError;
use crate::modules::session::core::session::Session;
use crate::modules::session::use_cases::session_gate::{GateState, SessionGate};
use crate::shell::context::AppContext;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

pub const EMPTY_NAME_MESSAGE: &str = "Please enter a name.";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DashboardError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("not signed in")]
    SignedOut,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Generation and store revision of the newest listing applied.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct Shown {
    generation: u64,
    revision: u64,
}

pub struct Dashboard {
    context: AppContext,
    gate: Arc<SessionGate>,
    view: watch::Sender<PageView>,
    shown: Mutex<Shown>,
    feed: Mutex<Option<Subscription>>,
    session_listener: Mutex<Option<JoinHandle<()>>>,
}

impl Dashboard {
    pub fn mount(context: AppContext, gate: Arc<SessionGate>) -> Arc<Self> {
        let mut changes = gate.on_session_change();
        let (view, _) = watch::channel(PageView::landing(0));
        let dashboard = Arc::new(Self {
            context,
            gate,
            view,
            shown: Mutex::new(Shown::default()),
            feed: Mutex::new(None),
            session_listener: Mutex::new(None),
        });

        let initial = changes.borrow_and_update().clone();
        dashboard.apply_gate_state(initial);

        let weak = Arc::downgrade(&dashboard);
        let listener = tokio::spawn(async move {
            while changes.changed().await.is_ok() {
                let state = changes.borrow_and_update().clone();
                let Some(dashboard) = weak.upgrade() else {
                    break;
                };
                dashboard.apply_gate_state(state);
            }
        });
        *lock(&dashboard.session_listener) = Some(listener);
        dashboard
    }

    pub fn gate(&self) -> &Arc<SessionGate> {
        &self.gate
    }

    pub fn view(&self) -> PageView {
        self.view.borrow().clone()
    }

    pub fn is_signed_in(&self) -> bool {
        self.gate.current_session().is_some()
    }

    /// Hand out the pending flash message once.
    pub fn take_flash(&self) -> Option<Flash> {
        let mut flash = None;
        self.view.send_if_modified(|view| {
            flash = view.flash.take();
            false
        });
        flash
    }

    /// Pull stores never announce changes made elsewhere, so every page load
    /// lists again. Push stores are kept current by the feed.
    pub async fn reload(&self) {
        if self.context.store.changes().is_some() {
            return;
        }
        if let Ok((generation, session)) = self.viewer() {
            self.refresh(generation, &session).await;
        }
    }

    /// Wait until the view reflects the current gate generation and is not loading.
    pub async fn settled(&self) -> PageView {
        let mut view = self.view.subscribe();
        let gate = self.gate.clone();
        let _ = view
            .wait_for(|v| v.generation == gate.generation() && v.table != TableBody::Loading)
            .await;
        self.view()
    }

    /// Wait for a view newer than `after`, giving up after `timeout`.
    pub async fn wait_for_revision(&self, after: u64, timeout: Duration) -> PageView {
        let mut view = self.view.subscribe();
        let reached = tokio::time::timeout(timeout, view.wait_for(|v| v.revision > after))
            .await
            .is_ok();
        if !reached {
            debug!(after, "no newer view before the poll timeout");
        }
        self.view()
    }

    pub async fn submit(&self, raw_name: &str) -> Result<AttendanceRecord, DashboardError> {
        let (generation, session) = self.viewer()?;
        let name = match normalize_display_name(raw_name) {
            Ok(name) => name,
            Err(e) => {
                self.set_flash(generation, Flash::Error(EMPTY_NAME_MESSAGE.into()), raw_name);
                return Err(e.into());
            }
        };

        match self.context.store.add_record(&session.owner(), &name).await {
            Ok(record) => {
                self.set_flash(
                    generation,
                    Flash::Success(format!("Attendance marked for {name}!")),
                    "",
                );
                self.refresh(generation, &session).await;
                Ok(record)
            }
            Err(e) => {
                warn!(error = %e, "marking attendance failed");
                self.set_flash(
                    generation,
                    Flash::Error(format!("Error marking attendance: {e}")),
                    raw_name,
                );
                Err(e.into())
            }
        }
    }

    /// A record that is already gone counts as deleted.
    pub async fn delete_record(
        &self,
        record_id: &str,
        confirmation: Confirmation,
    ) -> Result<ActionOutcome, DashboardError> {
        let (generation, session) = self.viewer()?;
        if confirmation == Confirmation::Withheld {
            return Ok(ActionOutcome::Cancelled);
        }

        let owner_filter = self.context.scope.owner_filter(&session.user_id);
        match self
            .context
            .store
            .delete_record(record_id, &session.user_id, owner_filter)
            .await
        {
            Ok(()) | Err(StoreError::NotFound { .. }) => {
                self.set_flash(generation, Flash::Success("Record deleted.".into()), "");
                self.refresh(generation, &session).await;
                Ok(ActionOutcome::Done)
            }
            Err(e) => {
                warn!(error = %e, record_id, "deleting attendance record failed");
                self.set_flash(
                    generation,
                    Flash::Error(format!("Error deleting record: {e}")),
                    "",
                );
                Err(e.into())
            }
        }
    }

    pub async fn clear_records(
        &self,
        confirmation: Confirmation,
    ) -> Result<ActionOutcome, DashboardError> {
        let (generation, session) = self.viewer()?;
        if confirmation == Confirmation::Withheld {
            return Ok(ActionOutcome::Cancelled);
        }

        let owner_filter = self.context.scope.owner_filter(&session.user_id);
        match self
            .context
            .store
            .clear_records(&session.user_id, owner_filter)
            .await
        {
            Ok(removed) => {
                self.set_flash(
                    generation,
                    Flash::Success(format!("Cleared {removed} attendance records.")),
                    "",
                );
                self.refresh(generation, &session).await;
                Ok(ActionOutcome::Done)
            }
            Err(e) => {
                warn!(error = %e, "clearing attendance records failed");
                self.set_flash(
                    generation,
                    Flash::Error(format!("Error clearing records: {e}")),
                    "",
                );
                Err(e.into())
            }
        }
    }

    pub async fn sign_out(&self) -> Result<(), DashboardError> {
        let generation = self.gate.generation();
        match self.gate.sign_out().await {
            Ok(()) => {
                let state = self.gate.snapshot();
                if state.session.is_none() {
                    self.show_landing(state.generation);
                }
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "signing out failed");
                self.set_flash(
                    generation,
                    Flash::Error(format!("Error signing out: {e}")),
                    "",
                );
                Err(e.into())
            }
        }
    }

    fn viewer(&self) -> Result<(u64, Session), DashboardError> {
        let state = self.gate.snapshot();
        state
            .session
            .map(|session| (state.generation, session))
            .ok_or(DashboardError::SignedOut)
    }

    fn apply_gate_state(self: &Arc<Self>, state: GateState) {
        match state.session {
            None => self.show_landing(state.generation),
            Some(session) => {
                info!(generation = state.generation, user_id = %session.user_id, "loading dashboard");
                self.view.send_modify(|view| {
                    view.screen = Screen::Dashboard {
                        user_label: session.display_label.clone(),
                    };
                    view.table = TableBody::Loading;
                    view.generation = state.generation;
                    view.revision += 1;
                });
                self.start_feed(state.generation, &session);
            }
        }
    }

    fn show_landing(&self, generation: u64) {
        let released = lock(&self.feed).take();
        drop(released);
        self.view.send_if_modified(|view| {
            if view.generation == generation && view.screen == Screen::Landing {
                return false;
            }
            view.screen = Screen::Landing;
            view.table = TableBody::Cleared;
            view.name_input.clear();
            view.generation = generation;
            view.revision += 1;
            true
        });
    }

    fn start_feed(self: &Arc<Self>, generation: u64, session: &Session) {
        let owner_filter = self
            .context
            .scope
            .owner_filter(&session.user_id)
            .map(str::to_string);
        let weak = Arc::downgrade(self);
        let subscription = subscribe(self.context.store.clone(), owner_filter, move |listing| {
            if let Some(dashboard) = weak.upgrade() {
                dashboard.apply_listing(generation, listing);
            }
        });
        let previous = lock(&self.feed).replace(subscription);
        drop(previous);
    }

    /// Re-list after an own write so pull stores show it and push stores show
    /// it without waiting for the feed.
    async fn refresh(&self, generation: u64, session: &Session) {
        let owner_filter = self.context.scope.owner_filter(&session.user_id);
        let listing = list_at(self.context.store.as_ref(), owner_filter).await;
        self.apply_listing(generation, listing);
    }

    fn apply_listing(&self, generation: u64, listing: Listing) {
        let table = match listing.records {
            Ok(records) => self.context.renderer.render(&records),
            Err(e) => {
                warn!(error = %e, "listing attendance records failed");
                TableBody::Failed(format!("Error loading data: {e}"))
            }
        };
        let mut stale = false;
        let mut outdated = false;
        self.view.send_if_modified(|view| {
            if view.generation != generation
                || !self.gate.is_current(generation)
                || !view.is_dashboard()
            {
                stale = true;
                return false;
            }
            if let Some(revision) = listing.revision {
                let mut shown = lock(&self.shown);
                if shown.generation == generation && revision < shown.revision {
                    outdated = true;
                    return false;
                }
                *shown = Shown {
                    generation,
                    revision,
                };
            }
            if view.table == table {
                return false;
            }
            view.table = table;
            view.revision += 1;
            true
        });
        if stale {
            debug!(generation, "discarded a listing for a previous session");
        }
        if outdated {
            debug!(generation, revision = ?listing.revision, "discarded a listing older than the one shown");
        }
    }

    fn set_flash(&self, generation: u64, flash: Flash, name_input: &str) {
        self.view.send_if_modified(|view| {
            if view.generation != generation {
                return false;
            }
            view.flash = Some(flash);
            view.name_input = name_input.to_string();
            view.revision += 1;
            true
        });
    }
}

impl Drop for Dashboard {
    fn drop(&mut self) {
        if let Some(listener) = lock(&self.session_listener).take() {
            listener.abort();
        }
    }
}
