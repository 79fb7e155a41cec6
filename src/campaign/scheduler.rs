//! Dispatch scheduler — the periodic tick loop.
//!
//! One spawned task per campaign launch. Ticks are serialized: the loop
//! awaits the whole tick body (send + persist) before the interval can
//! fire again, so two ticks can never overlap or pop the same recipient.
//! The loop halts itself as soon as the coordinator reports there is
//! nothing left to do, and can be stopped externally at any time.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::campaign::coordinator::{CampaignCoordinator, TickResult};
use crate::template::ResolvedTemplate;

/// Handle to a running dispatch loop.
pub struct DispatchScheduler {
    handle: JoinHandle<()>,
    shutdown: Arc<AtomicBool>,
}

impl DispatchScheduler {
    /// Spawn the tick loop for one campaign run. The message content was
    /// resolved by the caller and is reused for every tick.
    pub fn spawn(
        coordinator: Arc<CampaignCoordinator>,
        template: ResolvedTemplate,
        interval: Duration,
    ) -> Self {
        let shutdown = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&shutdown);

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // Skip immediate first tick
            ticker.tick().await;

            loop {
                ticker.tick().await;

                if flag.load(Ordering::Relaxed) {
                    info!("Dispatch loop shutting down");
                    return;
                }

                match coordinator.send_one(&template).await {
                    TickResult::Sent { recipient } => {
                        debug!(recipient = %recipient, "Tick delivered");
                    }
                    TickResult::Bounced { recipient, evicted } => {
                        debug!(recipient = %recipient, ?evicted, "Tick bounced");
                    }
                    TickResult::Halted(reason) => {
                        info!(?reason, "Dispatch loop finished");
                        return;
                    }
                }
            }
        });

        Self { handle, shutdown }
    }

    /// True until the loop task has finished.
    pub fn is_active(&self) -> bool {
        !self.handle.is_finished()
    }

    /// Request shutdown and abort the task.
    pub fn stop(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
        if !self.handle.is_finished() {
            self.handle.abort();
        }
    }
}
