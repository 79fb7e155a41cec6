//! SMTP delivery channel over lettre.
//!
//! Every probe and send builds a throwaway [`SmtpTransport`]; no live
//! connection survives an attempt. The blocking lettre calls run under
//! `spawn_blocking` so a slow relay never stalls the runtime.

use async_trait::async_trait;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use tracing::{debug, info, warn};

use super::{Channel, ChannelDescriptor, RenderedMessage};
use crate::error::ChannelError;

/// Production SMTP channel. One instance serves every descriptor in the
/// pool; per-attempt state lives entirely inside the attempt.
#[derive(Clone)]
pub struct SmtpChannel {
    credentials: Option<Credentials>,
}

impl SmtpChannel {
    /// Credentials apply to every relay when both parts are configured;
    /// otherwise connections are unauthenticated.
    pub fn new(username: Option<String>, password: Option<String>) -> Self {
        let credentials = match (username, password) {
            (Some(user), Some(pass)) => Some(Credentials::new(user, pass)),
            _ => None,
        };
        Self { credentials }
    }

    fn transport(&self, descriptor: &ChannelDescriptor) -> Result<SmtpTransport, ChannelError> {
        let mut builder = SmtpTransport::relay(&descriptor.host)
            .map_err(|e| ChannelError::Transport {
                endpoint: descriptor.to_string(),
                reason: e.to_string(),
            })?
            .port(descriptor.port);

        if let Some(creds) = &self.credentials {
            builder = builder.credentials(creds.clone());
        }

        Ok(builder.build())
    }

    fn try_send(
        &self,
        descriptor: &ChannelDescriptor,
        message: &RenderedMessage,
    ) -> Result<(), ChannelError> {
        let from = format!("noreply@{}", descriptor.host);

        let email = Message::builder()
            .from(from.parse().map_err(|e| ChannelError::InvalidAddress {
                address: from.clone(),
                reason: format!("{e}"),
            })?)
            .to(message
                .to
                .parse()
                .map_err(|e| ChannelError::InvalidAddress {
                    address: message.to.clone(),
                    reason: format!("{e}"),
                })?)
            .subject(&message.subject)
            .body(message.body.clone())
            .map_err(|e| ChannelError::Build(e.to_string()))?;

        self.transport(descriptor)?
            .send(&email)
            .map_err(|e| ChannelError::SendFailed {
                endpoint: descriptor.to_string(),
                reason: e.to_string(),
            })?;

        Ok(())
    }
}

#[async_trait]
impl Channel for SmtpChannel {
    fn name(&self) -> &str {
        "smtp"
    }

    async fn probe(&self, descriptor: &ChannelDescriptor) -> bool {
        let transport = match self.transport(descriptor) {
            Ok(t) => t,
            Err(e) => {
                debug!(error = %e, "Probe transport setup failed");
                return false;
            }
        };

        let endpoint = descriptor.to_string();
        tokio::task::spawn_blocking(move || match transport.test_connection() {
            Ok(alive) => alive,
            Err(e) => {
                debug!(channel = %endpoint, error = %e, "Probe failed");
                false
            }
        })
        .await
        .unwrap_or(false)
    }

    async fn send(&self, descriptor: &ChannelDescriptor, message: &RenderedMessage) -> bool {
        let channel = self.clone();
        let descriptor = descriptor.clone();
        let message = message.clone();

        tokio::task::spawn_blocking(move || match channel.try_send(&descriptor, &message) {
            Ok(()) => {
                info!(to = %message.to, channel = %descriptor, "Message delivered");
                true
            }
            Err(e) => {
                warn!(to = %message.to, channel = %descriptor, error = %e, "Send failed");
                false
            }
        })
        .await
        .unwrap_or(false)
    }
}
