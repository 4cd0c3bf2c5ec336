// Shared application context fixtures: a configured identity provider and a
// context around any record store.

use crate::modules::attendance::adapters::outbound::record_store::RecordStore;
use crate::modules::attendance::core::record::RecordScope;
use crate::modules::dashboard::core::renderer::{DisplayFormat, TableRenderer};
use crate::modules::session::adapters::outbound::identity_in_memory::InMemoryIdentityProvider;
use crate::shell::context::AppContext;
use crate::tests::fixtures::clock::ManualClock;
use std::sync::Arc;

pub const ALICE_EMAIL: &str = "alice@example.com";
pub const BOB_EMAIL: &str = "bob@example.com";
pub const PASSWORD: &str = "secret";

pub fn identity() -> Arc<InMemoryIdentityProvider> {
    Arc::new(
        InMemoryIdentityProvider::new(Arc::new(ManualClock::starting_at(1_700_000_000_000)))
            .with_account(ALICE_EMAIL, PASSWORD)
            .with_account(BOB_EMAIL, PASSWORD),
    )
}

pub fn app_context(
    store: Arc<dyn RecordStore>,
    identity: Arc<InMemoryIdentityProvider>,
    scope: RecordScope,
) -> AppContext {
    AppContext {
        identity,
        store,
        scope,
        renderer: TableRenderer::new(DisplayFormat::default(), true),
    }
}
