//! Channel pool — validation, rotation, and eviction of delivery channels.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::{Channel, ChannelDescriptor};

/// Ordered rotation of live delivery channels.
///
/// The head of the rotation is reused for every send until it fails, then
/// evicted. There is no round-robin: a working channel keeps the slot, a
/// broken one is discarded for good.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChannelPool {
    channels: Vec<ChannelDescriptor>,
}

impl ChannelPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Probe every candidate and keep the survivors, preserving input
    /// order. A candidate that fails its probe is excluded on its own; it
    /// never aborts the rest of the batch.
    pub async fn validate(channel: &dyn Channel, candidates: Vec<ChannelDescriptor>) -> Self {
        let mut survivors = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            if channel.probe(&candidate).await {
                debug!(channel = %candidate, "Probe succeeded");
                survivors.push(candidate);
            } else {
                info!(channel = %candidate, "Probe failed, candidate excluded");
            }
        }
        Self {
            channels: survivors,
        }
    }

    /// The head of the rotation, if any.
    pub fn current(&self) -> Option<&ChannelDescriptor> {
        self.channels.first()
    }

    /// Record the outcome of a send through the current head. Failure
    /// evicts the head and returns it; success leaves the rotation
    /// untouched.
    pub fn on_send_result(&mut self, success: bool) -> Option<ChannelDescriptor> {
        if success || self.channels.is_empty() {
            return None;
        }
        let evicted = self.channels.remove(0);
        warn!(
            channel = %evicted,
            remaining = self.channels.len(),
            "Evicted failed channel"
        );
        Some(evicted)
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }
}
