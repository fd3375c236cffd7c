//! Persistence of the master profile over the key-value collaborator.
//!
//! Reads degrade to "no master yet" and writes are best-effort: a failed
//! write is logged and the caller keeps working with its in-memory copy.
//! There is no locking around load → merge → save, so two concurrent
//! writers for one user can lose an update (last full merge wins).

use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use crate::models::resume::ResumeRecord;
use crate::profile::merge::merge_into_master;
use crate::profile::normalize::normalize_value;
use crate::storage::{KeyValueStore, StoreError};

const MASTER_KEY_PREFIX: &str = "master-profile";

pub fn master_key(user_id: Uuid) -> String {
    format!("{MASTER_KEY_PREFIX}:{user_id}")
}

#[derive(Clone)]
pub struct MasterProfileStore {
    store: Arc<dyn KeyValueStore>,
}

impl MasterProfileStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// The stored master, re-normalized. Absent, unreadable and unparsable
    /// all come back as `None`.
    pub async fn load(&self, user_id: Uuid) -> Option<ResumeRecord> {
        let key = master_key(user_id);
        let raw = match self.store.get(&key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!("Failed to read master profile for user {user_id}: {e}");
                return None;
            }
        };
        match serde_json::from_str::<serde_json::Value>(&raw) {
            Ok(value) => Some(normalize_value(&value)),
            Err(e) => {
                warn!("Discarding unparsable master profile for user {user_id}: {e}");
                None
            }
        }
    }

    /// Returns whether the write landed.
    pub async fn save(&self, user_id: Uuid, record: &ResumeRecord) -> bool {
        let payload = match serde_json::to_string(record) {
            Ok(payload) => payload,
            Err(e) => {
                warn!("Failed to serialize master profile for user {user_id}: {e}");
                return false;
            }
        };
        match self.store.set(&master_key(user_id), &payload, None).await {
            Ok(()) => true,
            Err(e) => {
                warn!("Failed to persist master profile for user {user_id}: {e}");
                false
            }
        }
    }

    /// Folds `incoming` into the stored master and persists the result.
    /// The merged record is returned even when the write fails.
    pub async fn merge_and_save(&self, user_id: Uuid, incoming: &ResumeRecord) -> ResumeRecord {
        let master = self.load(user_id).await;
        let merged = merge_into_master(master.as_ref(), incoming);
        if self.save(user_id, &merged).await {
            info!(
                "Master profile for user {user_id} updated ({} experience, {} skill categories)",
                merged.experience.len(),
                merged.skills.len()
            );
        }
        merged
    }

    /// Removes the master entirely. There is no partial reset.
    pub async fn clear(&self, user_id: Uuid) -> Result<(), StoreError> {
        self.store.delete(&master_key(user_id)).await?;
        info!("Master profile for user {user_id} cleared");
        Ok(())
    }
}
