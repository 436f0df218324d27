//! The `QuantaSynapse` facade — connection lifecycle, pub/sub, heartbeat, metrics.
//!
//! Status transitions are individually atomic, but the side effects around
//! them (callbacks, starting and stopping the heartbeat) are not. A reader that
//! observes `Connected` may run before the heartbeat worker has been spawned.

use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use quanta_config::{ConnectionConfig, HeartbeatConfig, NodeConfig, SynapseSettings};
use quanta_core::{ConnectionStatus, Signal, SynapseError};
use tracing::{debug, error, info, warn};

use crate::heartbeat::HeartbeatWorker;
use crate::metrics::{Metrics, MetricsSnapshot};
use crate::registry::SubscriptionRegistry;

/// Lifecycle callback (connected / disconnected).
pub type StatusCallback = Arc<dyn Fn() + Send + Sync>;

/// Error callback, receives the rendered error message.
pub type ErrorCallback = Arc<dyn Fn(&str) + Send + Sync>;

/// Single-slot lifecycle callbacks. Setting one replaces the previous.
#[derive(Default)]
struct LifecycleCallbacks {
    on_connected: Option<StatusCallback>,
    on_disconnected: Option<StatusCallback>,
    on_error: Option<ErrorCallback>,
}

/// In-process messaging facade.
///
/// Owns the subscription registry, the connection config, the heartbeat
/// worker, and the message counters for its whole lifetime.
pub struct QuantaSynapse {
    status: AtomicU8,
    registry: Arc<SubscriptionRegistry>,
    metrics: Arc<Metrics>,
    heartbeat: Mutex<Option<HeartbeatWorker>>,
    callbacks: Mutex<LifecycleCallbacks>,
    heartbeat_config: HeartbeatConfig,
    node: NodeConfig,
}

impl Default for QuantaSynapse {
    fn default() -> Self {
        Self::new()
    }
}

impl QuantaSynapse {
    /// Create a facade with default settings.
    pub fn new() -> Self {
        Self::with_settings(SynapseSettings::default())
    }

    pub fn with_settings(settings: SynapseSettings) -> Self {
        let metrics = Arc::new(Metrics::new());
        let registry = Arc::new(SubscriptionRegistry::new(
            settings.connection,
            metrics.clone(),
        ));
        debug!(identity = %settings.node.identity, "QuantaSynapse created");

        Self {
            status: AtomicU8::new(ConnectionStatus::Disconnected.as_u8()),
            registry,
            metrics,
            heartbeat: Mutex::new(None),
            callbacks: Mutex::new(LifecycleCallbacks::default()),
            heartbeat_config: settings.heartbeat,
            node: settings.node,
        }
    }

    // ── Connection lifecycle ──────────────────────────────────────────

    /// Drive the connection to `Connected`.
    ///
    /// Suspends the caller for the simulated setup delay while in
    /// `Connecting`, fires the connected callback, then starts the heartbeat.
    /// A no-op (with a warning) if already connecting or connected. Allowed
    /// from `Error` as a retry. Dropping the future mid-setup restores the
    /// status it started from.
    pub async fn connect(&self) {
        let Some(previous) = self.begin_connect() else {
            return;
        };
        let _rollback = TransitionGuard {
            status: &self.status,
            claimed: ConnectionStatus::Connecting,
            rollback: previous,
        };

        {
            let config = self.registry.config();
            info!(
                host = %config.host,
                port = config.port,
                from = %previous,
                "Connecting"
            );
        }

        // A worker may survive an error report; never run two
        let stale = self.heartbeat.lock().take();
        if let Some(worker) = stale {
            worker.stop().await;
        }

        tokio::time::sleep(Duration::from_millis(self.node.connect_delay_ms)).await;

        if !self.transition(ConnectionStatus::Connecting, ConnectionStatus::Connected) {
            warn!(
                status = %self.status(),
                "Connection state changed during setup, not completing connect"
            );
            return;
        }
        info!("Connected");

        let on_connected = self.callbacks.lock().on_connected.clone();
        if let Some(callback) = on_connected {
            callback();
        }

        self.start_heartbeat();
    }

    /// Drive the connection to `Disconnected`.
    ///
    /// Stops the heartbeat and waits for it to finish before firing the
    /// disconnected callback, so no heartbeat follows a completed disconnect.
    /// A no-op when already disconnected. From `Error` it resets the status.
    /// If the future is dropped before finishing, the status still lands on
    /// `Disconnected` (the worker has been signalled) but the callback is not fired.
    pub async fn disconnect(&self) {
        loop {
            let current = self.status();
            match current {
                ConnectionStatus::Disconnected => {
                    debug!("Disconnect requested while already disconnected");
                    return;
                }
                ConnectionStatus::Connecting | ConnectionStatus::Disconnecting => {
                    warn!(status = %current, "Disconnect ignored while transition is in progress");
                    return;
                }
                ConnectionStatus::Connected | ConnectionStatus::Error => {
                    if self.transition(current, ConnectionStatus::Disconnecting) {
                        break;
                    }
                }
            }
        }
        info!("Disconnecting");
        let _rollback = TransitionGuard {
            status: &self.status,
            claimed: ConnectionStatus::Disconnecting,
            rollback: ConnectionStatus::Disconnected,
        };

        let worker = self.heartbeat.lock().take();
        if let Some(worker) = worker {
            worker.stop().await;
        }

        self.set_status(ConnectionStatus::Disconnected);
        info!("Disconnected");

        let on_disconnected = self.callbacks.lock().on_disconnected.clone();
        if let Some(callback) = on_disconnected {
            callback();
        }
    }

    /// Current status. Never blocks.
    pub fn status(&self) -> ConnectionStatus {
        ConnectionStatus::from_u8(self.status.load(Ordering::SeqCst))
    }

    /// Report a failure from a transport or caller.
    ///
    /// Moves the status to `Error` and invokes the error callback. Recovery is
    /// left to the caller: `connect` retries, `disconnect` resets. The
    /// heartbeat, if running, keeps running until one of those is called.
    pub fn report_error(&self, err: SynapseError) {
        error!(error = %err, "Synapse error reported");
        self.set_status(ConnectionStatus::Error);

        let on_error = self.callbacks.lock().on_error.clone();
        if let Some(callback) = on_error {
            callback(&err.to_string());
        }
    }

    /// Whether a heartbeat worker is currently alive.
    pub fn is_heartbeat_running(&self) -> bool {
        self.heartbeat
            .lock()
            .as_ref()
            .is_some_and(|worker| !worker.is_finished())
    }

    // ── Configuration ─────────────────────────────────────────────────

    /// Replace the connection config. Not validated here.
    pub fn set_config(&self, config: ConnectionConfig) {
        self.registry.set_config(config);
    }

    pub fn config(&self) -> ConnectionConfig {
        self.registry.config()
    }

    // ── Publish / subscribe ───────────────────────────────────────────

    /// Register `callback` for `topic`. There is no unsubscribe.
    pub fn subscribe<F>(&self, topic: impl Into<String>, callback: F)
    where
        F: Fn(&Signal) + Send + Sync + 'static,
    {
        self.registry.subscribe(topic, Arc::new(callback));
    }

    /// Deliver `signal` synchronously to every subscriber of `topic`.
    ///
    /// Subscriber panics propagate to the caller; see
    /// [`SubscriptionRegistry::publish`].
    pub fn publish(&self, topic: &str, signal: Signal) {
        self.registry.publish(topic, signal);
    }

    pub fn subscriber_count(&self, topic: &str) -> usize {
        self.registry.subscriber_count(topic)
    }

    pub fn topics(&self) -> Vec<String> {
        self.registry.topics()
    }

    // ── Callbacks ─────────────────────────────────────────────────────

    pub fn set_on_connected<F>(&self, callback: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.callbacks.lock().on_connected = Some(Arc::new(callback));
    }

    pub fn set_on_disconnected<F>(&self, callback: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.callbacks.lock().on_disconnected = Some(Arc::new(callback));
    }

    pub fn set_on_error<F>(&self, callback: F)
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.callbacks.lock().on_error = Some(Arc::new(callback));
    }

    // ── Metrics ───────────────────────────────────────────────────────

    pub fn messages_sent(&self) -> u64 {
        self.metrics.messages_sent()
    }

    pub fn messages_received(&self) -> u64 {
        self.metrics.messages_received()
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    // ── Internals ─────────────────────────────────────────────────────

    /// Claim the `Connecting` state. Returns the state it was claimed from.
    fn begin_connect(&self) -> Option<ConnectionStatus> {
        loop {
            let current = self.status();
            match current {
                ConnectionStatus::Connecting | ConnectionStatus::Connected => {
                    warn!(status = %current, "Connect ignored, already connecting or connected");
                    return None;
                }
                ConnectionStatus::Disconnecting => {
                    warn!("Connect ignored while disconnecting");
                    return None;
                }
                ConnectionStatus::Disconnected | ConnectionStatus::Error => {
                    if self.transition(current, ConnectionStatus::Connecting) {
                        return Some(current);
                    }
                }
            }
        }
    }

    fn start_heartbeat(&self) {
        if !self.heartbeat_config.enabled {
            debug!("Heartbeat disabled, not starting worker");
            return;
        }

        let mut slot = self.heartbeat.lock();
        // A disconnect may have run between the callback and here
        if !self.status().is_connected() || slot.is_some() {
            return;
        }

        let period = Duration::from_millis(self.heartbeat_config.interval_ms);
        *slot = Some(HeartbeatWorker::spawn(
            self.node.identity.clone(),
            period,
            self.registry.clone(),
        ));
        debug!(interval_ms = self.heartbeat_config.interval_ms, "Heartbeat worker started");
    }

    fn transition(&self, from: ConnectionStatus, to: ConnectionStatus) -> bool {
        self.status
            .compare_exchange(from.as_u8(), to.as_u8(), Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }

    fn set_status(&self, status: ConnectionStatus) {
        self.status.store(status.as_u8(), Ordering::SeqCst);
    }
}

/// Restores `rollback` if the status still holds `claimed` when dropped.
///
/// Held across the awaits of `connect`/`disconnect` so a cancelled call does
/// not strand the facade in a transitional state. A completed transition has
/// already replaced `claimed`, which makes the drop a no-op.
struct TransitionGuard<'a> {
    status: &'a AtomicU8,
    claimed: ConnectionStatus,
    rollback: ConnectionStatus,
}

impl Drop for TransitionGuard<'_> {
    fn drop(&mut self) {
        let rolled_back = self
            .status
            .compare_exchange(
                self.claimed.as_u8(),
                self.rollback.as_u8(),
                Ordering::SeqCst,
                Ordering::SeqCst,
            )
            .is_ok();
        if rolled_back {
            warn!(from = %self.claimed, to = %self.rollback, "Transition cancelled, status rolled back");
        }
    }
}

/// Forces a disconnect if still connected.
///
/// `Drop` cannot await, so the heartbeat task is signalled and aborted but not
/// joined. On a multi-threaded runtime a heartbeat publish already inside
/// [`SubscriptionRegistry::publish`] may finish after `drop` returns; the task
/// holds its own handle to the registry, so this is memory-safe. Call
/// [`QuantaSynapse::disconnect`] first when no late heartbeat is acceptable.
impl Drop for QuantaSynapse {
    fn drop(&mut self) {
        if let Some(worker) = self.heartbeat.get_mut().take() {
            worker.abort();
        }

        if self.status().is_connected() {
            info!("Dropped while connected, forcing disconnect");
            self.set_status(ConnectionStatus::Disconnected);
            if let Some(callback) = self.callbacks.get_mut().on_disconnected.take() {
                callback();
            }
        }
    }
}
