//! Message-flow counters updated by the publish path.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Lock-free send/receive counters.
///
/// Both start at zero and only ever increase.
#[derive(Debug, Default)]
pub struct Metrics {
    sent: AtomicU64,
    received: AtomicU64,
}

/// Point-in-time copy of the counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub messages_sent: u64,
    pub messages_received: u64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// One per `publish` call.
    pub fn record_sent(&self) {
        self.sent.fetch_add(1, Ordering::Relaxed);
    }

    /// One per subscriber invocation.
    pub fn record_received(&self) {
        self.received.fetch_add(1, Ordering::Relaxed);
    }

    pub fn messages_sent(&self) -> u64 {
        self.sent.load(Ordering::Relaxed)
    }

    pub fn messages_received(&self) -> u64 {
        self.received.load(Ordering::Relaxed)
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            messages_sent: self.messages_sent(),
            messages_received: self.messages_received(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn counters_start_at_zero() {
        let metrics = Metrics::new();
        assert_eq!(metrics.snapshot(), MetricsSnapshot::default());
    }

    #[test]
    fn counters_are_independent() {
        let metrics = Metrics::new();
        metrics.record_sent();
        metrics.record_received();
        metrics.record_received();

        assert_eq!(metrics.messages_sent(), 1);
        assert_eq!(metrics.messages_received(), 2);
    }

    #[test]
    fn concurrent_increments_are_not_lost() {
        let metrics = Arc::new(Metrics::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let m = metrics.clone();
                std::thread::spawn(move || {
                    for _ in 0..1000 {
                        m.record_sent();
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(metrics.messages_sent(), 4000);
    }

    #[test]
    fn snapshot_serializes() {
        let metrics = Metrics::new();
        metrics.record_sent();
        let json = serde_json::to_value(metrics.snapshot()).unwrap();
        assert_eq!(json["messages_sent"], 1);
        assert_eq!(json["messages_received"], 0);
    }
}
