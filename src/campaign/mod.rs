//! Campaign state machine, coordinator, and dispatch loop.

pub mod coordinator;
pub mod recipients;
pub mod scheduler;
pub mod state;
pub mod stats;

pub use coordinator::{CampaignCoordinator, HaltReason, TickResult};
pub use recipients::RecipientQueue;
pub use scheduler::DispatchScheduler;
pub use state::{CampaignState, CampaignStep};
pub use stats::DispatchStats;
