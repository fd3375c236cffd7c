//! Workspace session snapshots, the persisted working record.
//!
//! Kept apart from the master profile and never merge-reconciled. Snapshots
//! expire after the configured TTL, both at the storage layer and by their
//! own `saved_at` stamp (for backends that ignore TTLs).

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;
use uuid::Uuid;

use crate::models::session::{ChatMessage, WorkspaceSession, WorkspaceStatus};
use crate::profile::normalize::normalize_value;
use crate::storage::{KeyValueStore, StoreError};

const SESSION_KEY_PREFIX: &str = "session";

pub fn session_key(user_id: Uuid) -> String {
    format!("{SESSION_KEY_PREFIX}:{user_id}")
}

/// Stored shape; `resume` stays raw so older record shapes still load.
#[derive(Deserialize)]
struct StoredSession {
    resume: Value,
    #[serde(default)]
    status: WorkspaceStatus,
    #[serde(default)]
    chat_messages: Vec<ChatMessage>,
    #[serde(default)]
    job_description: String,
    saved_at: chrono::DateTime<Utc>,
}

#[derive(Clone)]
pub struct SessionStore {
    store: Arc<dyn KeyValueStore>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(store: Arc<dyn KeyValueStore>, ttl: Duration) -> Self {
        Self { store, ttl }
    }

    pub async fn load(&self, user_id: Uuid) -> Option<WorkspaceSession> {
        let key = session_key(user_id);
        let raw = match self.store.get(&key).await {
            Ok(raw) => raw?,
            Err(e) => {
                warn!("Failed to read session for user {user_id}: {e}");
                return None;
            }
        };
        let stored: StoredSession = match serde_json::from_str(&raw) {
            Ok(stored) => stored,
            Err(e) => {
                warn!("Discarding unparsable session for user {user_id}: {e}");
                return None;
            }
        };

        let age = Utc::now().signed_duration_since(stored.saved_at);
        if age.to_std().is_ok_and(|age| age > self.ttl) {
            if let Err(e) = self.store.delete(&key).await {
                warn!("Failed to drop stale session for user {user_id}: {e}");
            }
            return None;
        }

        Some(WorkspaceSession {
            resume: normalize_value(&stored.resume),
            status: stored.status,
            chat_messages: stored.chat_messages,
            job_description: stored.job_description,
            saved_at: stored.saved_at,
        })
    }

    /// Stamps and persists the snapshot. Empty workspaces are not stored.
    /// Returns whether a write landed.
    pub async fn save(&self, user_id: Uuid, mut session: WorkspaceSession) -> bool {
        if session.status == WorkspaceStatus::Empty {
            return false;
        }
        session.saved_at = Utc::now();
        let payload = match serde_json::to_string(&session) {
            Ok(payload) => payload,
            Err(e) => {
                warn!("Failed to serialize session for user {user_id}: {e}");
                return false;
            }
        };
        match self
            .store
            .set(&session_key(user_id), &payload, Some(self.ttl))
            .await
        {
            Ok(()) => true,
            Err(e) => {
                warn!("Failed to persist session for user {user_id}: {e}");
                false
            }
        }
    }

    pub async fn clear(&self, user_id: Uuid) -> Result<(), StoreError> {
        self.store.delete(&session_key(user_id)).await
    }
}
