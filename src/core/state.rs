use std::sync::Arc;

use sqlx::PgPool;

use crate::core::config::Settings;
use crate::services::session::registry::SessionRegistry;
use crate::services::session::store::AttemptStore;

#[derive(Clone)]
pub(crate) struct AppState {
    inner: Arc<InnerState>,
}

struct InnerState {
    settings: Settings,
    db: PgPool,
    store: Arc<dyn AttemptStore>,
    sessions: SessionRegistry,
}

impl AppState {
    pub(crate) fn new(settings: Settings, db: PgPool, store: Arc<dyn AttemptStore>) -> Self {
        Self { inner: Arc::new(InnerState { settings, db, store, sessions: SessionRegistry::new() }) }
    }

    pub(crate) fn settings(&self) -> &Settings {
        &self.inner.settings
    }

    pub(crate) fn db(&self) -> &PgPool {
        &self.inner.db
    }

    pub(crate) fn store(&self) -> Arc<dyn AttemptStore> {
        self.inner.store.clone()
    }

    pub(crate) fn sessions(&self) -> &SessionRegistry {
        &self.inner.sessions
    }
}
