// Application context: the collaborators every viewer shares.
//
// Built once at startup from Config and handed to each component; nothing is
// reached through globals.

use crate::modules::attendance::adapters::outbound::local_store::LocalRecordStore;
use crate::modules::attendance::adapters::outbound::projections_in_memory::InMemoryProjections;
use crate::modules::attendance::adapters::outbound::record_store::RecordStore;
use crate::modules::attendance::adapters::outbound::synchronized_store::SynchronizedRecordStore;
use crate::modules::attendance::core::events::AttendanceEvent;
use crate::modules::attendance::core::record::RecordScope;
use crate::modules::dashboard::core::renderer::{DisplayFormat, TableRenderer};
use crate::modules::session::adapters::outbound::identity::IdentityProvider;
use crate::modules::session::adapters::outbound::identity_in_memory::InMemoryIdentityProvider;
use crate::modules::session::adapters::outbound::identity_local::LocalIdentityProvider;
use crate::shared::core::primitives::Clock;
use crate::shared::infrastructure::event_store::in_memory::InMemoryEventStore;
use crate::shared::infrastructure::key_value::json_file::JsonFileKeyValueStore;
use crate::shell::config::{BackendKind, Config, ConfigError};
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Clone)]
pub struct AppContext {
    pub identity: Arc<dyn IdentityProvider>,
    pub store: Arc<dyn RecordStore>,
    pub scope: RecordScope,
    pub renderer: TableRenderer,
}

impl AppContext {
    pub fn from_config(config: &Config, clock: Arc<dyn Clock>) -> Result<Self, ConfigError> {
        let format = DisplayFormat::new(
            config.date_format.clone(),
            config.time_format.clone(),
            config.utc_offset,
        )
        .map_err(|reason| ConfigError::Invalid {
            key: "ATTENDANCE_DATE_FORMAT/ATTENDANCE_TIME_FORMAT",
            value: format!("{} {}", config.date_format, config.time_format),
            reason,
        })?;

        let (identity, store): (Arc<dyn IdentityProvider>, Arc<dyn RecordStore>) =
            match config.backend {
                BackendKind::Synchronized => {
                    if config.accounts.is_empty() {
                        warn!("no accounts configured, nobody will be able to sign in");
                    }
                    let identity = config.accounts.iter().fold(
                        InMemoryIdentityProvider::new(clock.clone()),
                        |identity, account| identity.with_account(&account.email, &account.password),
                    );
                    let store = SynchronizedRecordStore::new(
                        Arc::new(InMemoryEventStore::<AttendanceEvent>::new()),
                        Arc::new(InMemoryProjections::new()),
                        clock,
                    );
                    let identity: Arc<dyn IdentityProvider> = Arc::new(identity);
                    let store: Arc<dyn RecordStore> = Arc::new(store);
                    (identity, store)
                }
                BackendKind::Local => {
                    let kv = Arc::new(JsonFileKeyValueStore::new(config.data_file.clone()));
                    info!(path = %kv.path().display(), "using local attendance file");
                    let identity: Arc<dyn IdentityProvider> =
                        Arc::new(LocalIdentityProvider::new(kv.clone(), clock.clone()));
                    let store: Arc<dyn RecordStore> = Arc::new(LocalRecordStore::new(kv, clock));
                    (identity, store)
                }
            };

        Ok(Self {
            identity,
            store,
            scope: config.scope,
            renderer: TableRenderer::new(format, true),
        })
    }
}
