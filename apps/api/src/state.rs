use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::LanguageModel;
use crate::profile::master::MasterProfileStore;
use crate::profile::session::SessionStore;
use crate::storage::KeyValueStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Inference collaborator. Default: `LlmClient`.
    pub llm: Arc<dyn LanguageModel>,
    pub masters: MasterProfileStore,
    pub sessions: SessionStore,
    pub config: Config,
    /// Backend name reported by /health.
    pub storage_backend: &'static str,
}

impl AppState {
    pub fn new(llm: Arc<dyn LanguageModel>, store: Arc<dyn KeyValueStore>, config: Config) -> Self {
        Self {
            llm,
            masters: MasterProfileStore::new(store.clone()),
            sessions: SessionStore::new(store.clone(), config.session_ttl),
            storage_backend: store.backend(),
            config,
        }
    }
}
