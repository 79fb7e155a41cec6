//! Campaign coordinator — owns the state machine and orchestrates
//! recipients, channels, stats, templates, and persistence.
//!
//! All access to the singleton [`CampaignState`] is routed through the
//! operations here; nothing else holds a reference to it. Every mutation
//! is followed by a best-effort snapshot save. While a dispatch loop is
//! active, mutating operations are rejected outright — ticks and request
//! handlers never race on the shared state.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::{Mutex, RwLock};
use tracing::{info, warn};
use uuid::Uuid;

use crate::campaign::recipients::RecipientQueue;
use crate::campaign::scheduler::DispatchScheduler;
use crate::campaign::state::{CampaignState, CampaignStep};
use crate::campaign::stats::DispatchStats;
use crate::channel::{Channel, ChannelDescriptor, ChannelPool, RenderedMessage};
use crate::error::CampaignError;
use crate::store::SnapshotStore;
use crate::template::{ResolvedTemplate, TemplateId, TemplateLibrary};

/// Outcome of one dispatch tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickResult {
    /// Delivered to one recipient; the channel keeps its slot.
    Sent { recipient: String },
    /// Delivery failed; the recipient is consumed and the head channel
    /// evicted. No retry for either.
    Bounced {
        recipient: String,
        evicted: Option<ChannelDescriptor>,
    },
    /// Nothing left to work with; the loop must stop.
    Halted(HaltReason),
}

/// Why a dispatch loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HaltReason {
    RecipientsExhausted,
    ChannelsExhausted,
}

/// Owns the singleton campaign state and the dispatch loop handle.
pub struct CampaignCoordinator {
    state: RwLock<CampaignState>,
    store: Arc<dyn SnapshotStore>,
    channel: Arc<dyn Channel>,
    templates: TemplateLibrary,
    tick_interval: Duration,
    dispatch: Mutex<Option<DispatchScheduler>>,
}

impl CampaignCoordinator {
    /// Restore state from the store (or defaults) and build the
    /// coordinator around it.
    pub async fn restore(
        store: Arc<dyn SnapshotStore>,
        channel: Arc<dyn Channel>,
        templates: TemplateLibrary,
        tick_interval: Duration,
    ) -> Arc<Self> {
        let state = crate::store::load_or_default(store.as_ref()).await;
        Arc::new(Self {
            state: RwLock::new(state),
            store,
            channel,
            templates,
            tick_interval,
            dispatch: Mutex::new(None),
        })
    }

    /// True while a dispatch loop is active.
    pub async fn dispatch_active(&self) -> bool {
        self.dispatch
            .lock()
            .await
            .as_ref()
            .is_some_and(DispatchScheduler::is_active)
    }

    async fn reject_if_dispatching(&self) -> Result<(), CampaignError> {
        if self.dispatch_active().await {
            return Err(CampaignError::AlreadyDispatching);
        }
        Ok(())
    }

    /// Stamp and persist the current snapshot, best-effort.
    async fn persist(&self, state: &mut CampaignState) {
        state.updated_at = Utc::now();
        if let Err(e) = self.store.save(state).await {
            warn!(error = %e, "Failed to persist campaign snapshot");
        }
    }

    /// Accept a newline-delimited recipient list. Replaces the queue,
    /// resets the stats, and restarts the lifecycle at `IntakeDone`.
    pub async fn intake(&self, raw: &str) -> Result<usize, CampaignError> {
        self.reject_if_dispatching().await?;

        let recipients = RecipientQueue::parse(raw);
        if recipients.is_empty() {
            return Err(CampaignError::EmptyIntake);
        }
        let accepted = recipients.len();

        let mut state = self.state.write().await;
        state.step = CampaignStep::IntakeDone;
        state.recipients = recipients;
        state.leads_parsed = accepted;
        state.stats = DispatchStats::for_queue(accepted as u64);
        self.persist(&mut state).await;

        info!(accepted, "Recipient intake complete");
        Ok(accepted)
    }

    /// Probe every candidate and keep the survivors as the rotation.
    /// Never fatal: a candidate that fails its probe is just excluded.
    pub async fn prepare_channels(
        &self,
        candidates: Vec<ChannelDescriptor>,
    ) -> Result<usize, CampaignError> {
        self.reject_if_dispatching().await?;

        let pool = ChannelPool::validate(self.channel.as_ref(), candidates).await;
        let active = pool.len();

        let mut state = self.state.write().await;
        state.step = CampaignStep::ChannelsReady;
        state.channels = pool;
        state.active_channel_count = active;
        self.persist(&mut state).await;

        info!(active, "Channel pool prepared");
        Ok(active)
    }

    /// Resolve the message content once and launch the dispatch loop.
    /// Rejected while a loop is already active: overlapping loops would
    /// race on the queue and the rotation.
    pub async fn start_dispatch(
        self: Arc<Self>,
        template: TemplateId,
        custom: Option<String>,
    ) -> Result<(), CampaignError> {
        let mut dispatch = self.dispatch.lock().await;
        if dispatch.as_ref().is_some_and(DispatchScheduler::is_active) {
            return Err(CampaignError::AlreadyDispatching);
        }

        let resolved = self.templates.resolve(template, custom.as_deref()).await;

        {
            let mut state = self.state.write().await;
            state.step = CampaignStep::Dispatching;
            state.template = template;
            state.custom_template = custom;
            state.campaigns_launched += 1;
            state.campaign_id = Some(Uuid::new_v4());
            self.persist(&mut state).await;
        }

        *dispatch = Some(DispatchScheduler::spawn(
            Arc::clone(&self),
            resolved,
            self.tick_interval,
        ));

        info!(template = %template, "Dispatch loop started");
        Ok(())
    }

    /// Abort the dispatch loop, if one is running. Returns whether a live
    /// loop was actually stopped.
    pub async fn stop_dispatch(&self) -> bool {
        let mut dispatch = self.dispatch.lock().await;
        let Some(scheduler) = dispatch.take() else {
            return false;
        };
        if !scheduler.is_active() {
            return false;
        }
        scheduler.stop();

        let mut state = self.state.write().await;
        if state.step.is_dispatching() {
            state.step = CampaignStep::Completed;
            self.persist(&mut state).await;
        }

        info!("Dispatch loop stopped");
        true
    }

    /// One dispatch tick: at most one recipient, through the current head
    /// channel. When either the pool or the queue is empty, nothing is
    /// popped and nothing is charged — the tick just reports the halt.
    pub async fn send_one(&self, template: &ResolvedTemplate) -> TickResult {
        // Stage the attempt under the lock; the send itself runs unlocked.
        let (recipient, descriptor) = {
            let mut state = self.state.write().await;

            let Some(descriptor) = state.channels.current().cloned() else {
                return self.halt(&mut state, HaltReason::ChannelsExhausted).await;
            };
            let Some(recipient) = state.recipients.pop() else {
                return self.halt(&mut state, HaltReason::RecipientsExhausted).await;
            };
            (recipient, descriptor)
        };

        let message = RenderedMessage {
            to: recipient.clone(),
            subject: template.subject.clone(),
            body: template.render(&recipient),
        };

        let delivered = self.channel.send(&descriptor, &message).await;

        let mut state = self.state.write().await;
        let evicted = state.channels.on_send_result(delivered);
        state.active_channel_count = state.channels.len();
        let result = if delivered {
            state.stats.record_success();
            TickResult::Sent { recipient }
        } else {
            state.stats.record_bounce();
            TickResult::Bounced { recipient, evicted }
        };
        self.persist(&mut state).await;
        result
    }

    async fn halt(&self, state: &mut CampaignState, reason: HaltReason) -> TickResult {
        if state.step.is_dispatching() {
            state.step = CampaignStep::Completed;
            self.persist(state).await;
            info!(?reason, "Dispatch halted");
        }
        TickResult::Halted(reason)
    }

    /// Read-only copy of the current state.
    pub async fn snapshot(&self) -> CampaignState {
        self.state.read().await.clone()
    }

    /// Wipe to a fresh campaign.
    pub async fn reset(&self) -> Result<(), CampaignError> {
        self.reject_if_dispatching().await?;

        let mut state = self.state.write().await;
        *state = CampaignState::default();
        self.persist(&mut state).await;

        info!("Campaign state reset");
        Ok(())
    }

    /// Raw content of one template (stub fallback on lookup failure).
    pub async fn template_content(&self, id: TemplateId) -> String {
        self.templates.content(id).await
    }
}
