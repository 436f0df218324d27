//! Subscription registry — topic-keyed subscriber lists plus the connection config.
//!
//! Subscriptions and config share a single exclusive lock, so config updates
//! and subscription changes never interleave. The lock is held for the whole
//! fan-out of a publish: a slow subscriber delays every other registry
//! operation, including heartbeats. Subscribers must stay fast.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use quanta_config::ConnectionConfig;
use quanta_core::Signal;
use tracing::debug;

use crate::metrics::Metrics;

/// Callback invoked for every signal published on a subscribed topic.
pub type SignalCallback = Arc<dyn Fn(&Signal) + Send + Sync>;

struct RegistryState {
    config: ConnectionConfig,
    subscriptions: HashMap<String, Vec<SignalCallback>>,
}

/// Topic → ordered subscribers, guarded together with the config.
pub struct SubscriptionRegistry {
    state: Mutex<RegistryState>,
    metrics: Arc<Metrics>,
}

impl SubscriptionRegistry {
    pub fn new(config: ConnectionConfig, metrics: Arc<Metrics>) -> Self {
        Self {
            state: Mutex::new(RegistryState {
                config,
                subscriptions: HashMap::new(),
            }),
            metrics,
        }
    }

    /// Append a subscriber. Registration order is invocation order.
    ///
    /// There is no handle and no way to unsubscribe.
    pub fn subscribe(&self, topic: impl Into<String>, callback: SignalCallback) {
        let topic = topic.into();
        let mut state = self.state.lock();
        let subscribers = state.subscriptions.entry(topic.clone()).or_default();
        subscribers.push(callback);
        debug!(topic = %topic, subscribers = subscribers.len(), "Subscribed");
    }

    /// Deliver `signal` to every subscriber of `topic`, in order.
    ///
    /// Counts one send per call and one receive per invocation. A topic with
    /// no subscribers is a silent drop. A panicking subscriber is not caught:
    /// the panic unwinds out of this call and the remaining subscribers are
    /// skipped. The lock does not poison, so the registry stays usable.
    pub fn publish(&self, topic: &str, signal: Signal) {
        let state = self.state.lock();
        self.metrics.record_sent();

        let Some(subscribers) = state.subscriptions.get(topic) else {
            debug!(topic = %topic, "Published with no subscribers");
            return;
        };

        debug!(topic = %topic, subscribers = subscribers.len(), "Publishing");
        for callback in subscribers {
            callback(&signal);
            self.metrics.record_received();
        }
    }

    pub fn set_config(&self, config: ConnectionConfig) {
        self.state.lock().config = config;
    }

    pub fn config(&self) -> ConnectionConfig {
        self.state.lock().config.clone()
    }

    /// Number of subscribers currently registered on `topic`.
    pub fn subscriber_count(&self, topic: &str) -> usize {
        self.state
            .lock()
            .subscriptions
            .get(topic)
            .map_or(0, Vec::len)
    }

    /// All topics with at least one subscriber, sorted.
    pub fn topics(&self) -> Vec<String> {
        let mut topics: Vec<String> = self.state.lock().subscriptions.keys().cloned().collect();
        topics.sort();
        topics
    }
}
