//! Heartbeat worker — periodic liveness signal on the reserved topic.

use std::sync::Arc;
use std::time::Duration;

use quanta_core::{HEARTBEAT_TOPIC, Signal};
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, warn};

use crate::registry::SubscriptionRegistry;

/// Handle to the single running heartbeat task.
///
/// Stopping is cooperative: the task selects on its stop signal and its
/// interval, so it stops without waiting out the current period. A subscriber
/// that blocks inside a heartbeat publish still stalls the stop.
pub struct HeartbeatWorker {
    stop: Arc<Notify>,
    handle: JoinHandle<()>,
}

impl HeartbeatWorker {
    /// Spawn the worker. The first heartbeat fires one full `period` from now.
    pub fn spawn(
        identity: String,
        period: Duration,
        registry: Arc<SubscriptionRegistry>,
    ) -> Self {
        let stop = Arc::new(Notify::new());
        let stop_signal = stop.clone();

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    biased;
                    _ = stop_signal.notified() => {
                        debug!("Heartbeat worker received stop signal");
                        break;
                    }
                    _ = ticker.tick() => {
                        debug!(sender = %identity, "Heartbeat tick");
                        registry.publish(HEARTBEAT_TOPIC, Signal::heartbeat(identity.as_str()));
                    }
                }
            }
        });

        Self { stop, handle }
    }

    /// Signal the task to stop; the returned future waits until it has returned.
    ///
    /// The signal is sent on call, not on first poll, so dropping the future
    /// still lets the task exit on its own.
    pub fn stop(self) -> impl Future<Output = ()> + Send {
        // notify_one stores a permit, so a stop sent mid-publish is not lost
        self.stop.notify_one();
        let handle = self.handle;
        async move {
            if let Err(e) = handle.await {
                if e.is_panic() {
                    warn!(error = %e, "Heartbeat worker panicked in a subscriber");
                }
            }
        }
    }

    /// Stop without waiting. Used where awaiting is impossible (drop).
    pub fn abort(self) {
        self.stop.notify_one();
        self.handle.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}
