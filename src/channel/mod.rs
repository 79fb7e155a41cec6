//! Outbound delivery channels.
//!
//! A channel is a delivery endpoint identified by a [`ChannelDescriptor`].
//! The [`Channel`] capability is stateless per attempt: implementations
//! build a fresh transport for every probe or send, so nothing lives
//! across ticks and a failed attempt never poisons more than the
//! descriptor it ran against.

pub mod pool;
pub mod smtp;

pub use pool::ChannelPool;
pub use smtp::SmtpChannel;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Identity of one delivery endpoint. No credentials are persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelDescriptor {
    pub host: String,
    pub port: u16,
}

impl ChannelDescriptor {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }
}

impl std::fmt::Display for ChannelDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// A message rendered for a single recipient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedMessage {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Delivery capability: connectivity probe + one-shot send.
///
/// Both operations absorb their own failures and answer with a plain
/// outcome; callers only branch on the bool, never on an error value.
#[async_trait]
pub trait Channel: Send + Sync {
    /// Name of the transport, for logs.
    fn name(&self) -> &str;

    /// Connectivity check against one descriptor.
    async fn probe(&self, descriptor: &ChannelDescriptor) -> bool;

    /// Attempt to deliver one rendered message through one descriptor.
    async fn send(&self, descriptor: &ChannelDescriptor, message: &RenderedMessage) -> bool;
}
