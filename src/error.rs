//! Error types for mailburst.

/// Top-level error type for the service.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Campaign error: {0}")]
    Campaign(#[from] CampaignError),

    #[error("Channel error: {0}")]
    Channel(#[from] ChannelError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Template error: {0}")]
    Template(#[from] TemplateError),
}

/// Campaign lifecycle errors surfaced to the request layer.
#[derive(Debug, thiserror::Error)]
pub enum CampaignError {
    #[error("Intake produced no recipients")]
    EmptyIntake,

    #[error("A dispatch loop is already active")]
    AlreadyDispatching,
}

/// Delivery transport errors. These never leave the channel layer: the
/// `Channel` capability absorbs them into a plain failed attempt.
#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    #[error("Transport setup failed for {endpoint}: {reason}")]
    Transport { endpoint: String, reason: String },

    #[error("Invalid address {address}: {reason}")]
    InvalidAddress { address: String, reason: String },

    #[error("Failed to build message: {0}")]
    Build(String),

    #[error("Send failed via {endpoint}: {reason}")]
    SendFailed { endpoint: String, reason: String },
}

/// Snapshot persistence errors. Best-effort: save failures are logged and
/// swallowed, load failures fall back to defaults.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Template catalog errors.
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    #[error("Unknown template id: {0}")]
    Unknown(String),
}

/// Result type alias for the service.
pub type Result<T> = std::result::Result<T, Error>;
