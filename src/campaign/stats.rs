//! Delivery statistics.

use serde::{Deserialize, Serialize};

/// Running counters for one campaign.
///
/// `sent == succeeded + bounced` at all times; the only zeroing path is a
/// reset at intake.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchStats {
    /// Recipients accepted at intake. Set exactly once per intake,
    /// overwritten (not accumulated) on re-intake.
    pub queued_total: u64,
    /// Delivery attempts that were charged to a channel.
    pub sent: u64,
    pub succeeded: u64,
    pub bounced: u64,
}

impl DispatchStats {
    /// Fresh counters for a queue of `queued_total` recipients.
    pub fn for_queue(queued_total: u64) -> Self {
        Self {
            queued_total,
            ..Self::default()
        }
    }

    pub fn record_success(&mut self) {
        self.succeeded += 1;
        self.sent += 1;
    }

    pub fn record_bounce(&mut self) {
        self.bounced += 1;
        self.sent += 1;
    }

    /// Percentage of queued recipients delivered, rounded to one decimal.
    /// Zero when nothing was queued.
    pub fn success_rate(&self) -> f64 {
        if self.queued_total == 0 {
            return 0.0;
        }
        let rate = self.succeeded as f64 / self.queued_total as f64 * 100.0;
        (rate * 10.0).round() / 10.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sent_tracks_outcomes() {
        let mut stats = DispatchStats::for_queue(5);
        stats.record_success();
        stats.record_success();
        stats.record_bounce();

        assert_eq!(stats.sent, 3);
        assert_eq!(stats.succeeded, 2);
        assert_eq!(stats.bounced, 1);
        assert_eq!(stats.sent, stats.succeeded + stats.bounced);
    }

    #[test]
    fn success_rate_rounds_to_one_decimal() {
        let mut stats = DispatchStats::for_queue(3);
        stats.record_success();
        assert_eq!(stats.success_rate(), 33.3);

        stats.record_success();
        assert_eq!(stats.success_rate(), 66.7);
    }

    #[test]
    fn success_rate_zero_queue_is_zero() {
        let stats = DispatchStats::default();
        assert_eq!(stats.success_rate(), 0.0);
    }

    #[test]
    fn for_queue_overwrites_rather_than_accumulates() {
        let mut stats = DispatchStats::for_queue(10);
        stats.record_success();

        stats = DispatchStats::for_queue(4);
        assert_eq!(stats.queued_total, 4);
        assert_eq!(stats.sent, 0);
        assert_eq!(stats.succeeded, 0);
    }
}
