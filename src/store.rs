//! Campaign snapshot persistence.
//!
//! One human-inspectable JSON document, overwritten in place on every
//! mutation. Persistence is best-effort, not transactional: a failed save
//! is logged and swallowed, and a missing or corrupt file on load falls
//! back to defaults that are persisted immediately as the new baseline.

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;
use tracing::{info, warn};

use crate::campaign::state::CampaignState;
use crate::error::StoreError;

/// Durable storage for the full campaign snapshot.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Overwrite the durable snapshot with `state`.
    async fn save(&self, state: &CampaignState) -> Result<(), StoreError>;

    /// Load the last persisted snapshot.
    async fn load(&self) -> Result<CampaignState, StoreError>;
}

/// JSON file store: one pretty-printed snapshot at a fixed path.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl SnapshotStore for JsonFileStore {
    async fn save(&self, state: &CampaignState) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(state)?;
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&self.path, json).await?;
        Ok(())
    }

    async fn load(&self) -> Result<CampaignState, StoreError> {
        let raw = fs::read_to_string(&self.path).await?;
        Ok(serde_json::from_str(&raw)?)
    }
}

/// Load the snapshot, falling back to defaults on any failure. The
/// defaults are persisted right away so the next load has a known-good
/// baseline.
pub async fn load_or_default(store: &dyn SnapshotStore) -> CampaignState {
    match store.load().await {
        Ok(state) => {
            info!(step = %state.step, "Restored campaign snapshot");
            state
        }
        Err(e) => {
            warn!(error = %e, "No usable snapshot, starting from defaults");
            let state = CampaignState::default();
            if let Err(e) = store.save(&state).await {
                warn!(error = %e, "Failed to persist default snapshot");
            }
            state
        }
    }
}
