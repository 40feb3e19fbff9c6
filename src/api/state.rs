//! Application state for the HR API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use crate::auth::SessionStore;
use crate::config::HrConfig;
use crate::store::HrStore;

/// Shared application state.
///
/// Contains resources that are shared across all request handlers:
/// the loaded configuration, the database and the login sessions.
#[derive(Clone)]
pub struct AppState {
    config: Arc<HrConfig>,
    store: HrStore,
    sessions: SessionStore,
}

impl AppState {
    /// Creates the state from a configuration and a connected store.
    pub fn new(config: HrConfig, store: HrStore) -> Self {
        let sessions = SessionStore::new(config.auth.session_ttl_minutes);
        Self {
            config: Arc::new(config),
            store,
            sessions,
        }
    }

    /// The loaded configuration.
    pub fn config(&self) -> &HrConfig {
        &self.config
    }

    /// The database.
    pub fn store(&self) -> &HrStore {
        &self.store
    }

    /// Active login sessions.
    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }
}
