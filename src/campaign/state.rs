//! Campaign state machine and persisted snapshot.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::campaign::recipients::RecipientQueue;
use crate::campaign::stats::DispatchStats;
use crate::channel::ChannelPool;
use crate::template::TemplateId;

/// Stage of the campaign lifecycle. Monotonic within one campaign; a new
/// intake restarts the sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CampaignStep {
    /// Nothing staged yet.
    Idle,
    /// Recipient list accepted.
    IntakeDone,
    /// Channel pool validated.
    ChannelsReady,
    /// Dispatch loop running.
    Dispatching,
    /// Dispatch loop halted — queue or pool exhausted, or stopped.
    Completed,
}

impl CampaignStep {
    pub fn is_dispatching(&self) -> bool {
        matches!(self, Self::Dispatching)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed)
    }
}

impl Default for CampaignStep {
    fn default() -> Self {
        Self::Idle
    }
}

impl std::fmt::Display for CampaignStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Idle => "idle",
            Self::IntakeDone => "intake_done",
            Self::ChannelsReady => "channels_ready",
            Self::Dispatching => "dispatching",
            Self::Completed => "completed",
        };
        write!(f, "{s}")
    }
}

/// The full persisted campaign snapshot.
///
/// One instance per process. Every mutation goes through the coordinator
/// and is followed by a best-effort save, so the durable copy tracks the
/// in-memory one and survives restarts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignState {
    pub step: CampaignStep,
    /// Pending addresses, consumed from the tail.
    pub recipients: RecipientQueue,
    /// Live channel rotation, consumed from the head.
    pub channels: ChannelPool,
    pub template: TemplateId,
    #[serde(default)]
    pub custom_template: Option<String>,
    pub stats: DispatchStats,
    pub campaigns_launched: u64,
    /// Fixed at intake time; dispatch never touches it.
    pub leads_parsed: usize,
    /// Kept equal to the pool length on every eviction.
    pub active_channel_count: usize,
    /// Id of the current (or last) launched campaign run.
    #[serde(default)]
    pub campaign_id: Option<Uuid>,
    /// Stamped on every save.
    pub updated_at: DateTime<Utc>,
}

impl Default for CampaignState {
    fn default() -> Self {
        Self {
            step: CampaignStep::default(),
            recipients: RecipientQueue::default(),
            channels: ChannelPool::default(),
            template: TemplateId::default(),
            custom_template: None,
            stats: DispatchStats::default(),
            campaigns_launched: 0,
            leads_parsed: 0,
            active_channel_count: 0,
            campaign_id: None,
            updated_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_display() {
        assert_eq!(CampaignStep::Idle.to_string(), "idle");
        assert_eq!(CampaignStep::IntakeDone.to_string(), "intake_done");
        assert_eq!(CampaignStep::Dispatching.to_string(), "dispatching");
    }

    #[test]
    fn step_serde_roundtrip() {
        let json = serde_json::to_string(&CampaignStep::ChannelsReady).unwrap();
        assert_eq!(json, "\"channels_ready\"");
        let parsed: CampaignStep = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, CampaignStep::ChannelsReady);
    }

    #[test]
    fn step_predicates() {
        assert!(CampaignStep::Dispatching.is_dispatching());
        assert!(!CampaignStep::Completed.is_dispatching());
        assert!(CampaignStep::Completed.is_terminal());
        assert!(!CampaignStep::Idle.is_terminal());
    }

    #[test]
    fn default_state_is_empty_and_idle() {
        let state = CampaignState::default();
        assert_eq!(state.step, CampaignStep::Idle);
        assert!(state.recipients.is_empty());
        assert!(state.channels.is_empty());
        assert_eq!(state.active_channel_count, 0);
        assert_eq!(state.stats.queued_total, 0);
        assert!(state.campaign_id.is_none());
    }

    #[test]
    fn snapshot_serde_roundtrip() {
        let state = CampaignState {
            step: CampaignStep::IntakeDone,
            recipients: RecipientQueue::parse("a@x\nb@x"),
            leads_parsed: 2,
            stats: DispatchStats::for_queue(2),
            ..CampaignState::default()
        };

        let json = serde_json::to_string_pretty(&state).unwrap();
        let parsed: CampaignState = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, state);
    }
}
