//! Pending recipient queue.

use serde::{Deserialize, Serialize};

/// Pending recipient addresses, consumed newest-first.
///
/// A popped address is gone regardless of the send outcome: one delivery
/// attempt per recipient, no re-insertion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecipientQueue {
    addresses: Vec<String>,
}

impl RecipientQueue {
    /// Parse a newline-delimited address list: trim each line, drop the
    /// empty ones, keep the rest in input order.
    pub fn parse(raw: &str) -> Self {
        let addresses = raw
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(String::from)
            .collect();
        Self { addresses }
    }

    /// Remove and return the most-recently-added address.
    pub fn pop(&mut self) -> Option<String> {
        self.addresses.pop()
    }

    pub fn len(&self) -> usize {
        self.addresses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }
}
