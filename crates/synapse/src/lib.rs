//! In-process messaging facade for QuantaSynapse.
//!
//! Provides a single logical connection lifecycle, a topic-keyed
//! publish/subscribe registry, a heartbeat published on
//! [`HEARTBEAT_TOPIC`](quanta_core::HEARTBEAT_TOPIC) while connected, and
//! message-flow counters.
//!
//! Components:
//! - **Registry** — topic → ordered subscribers, sharing a lock with the config
//! - **Heartbeat** — background task publishing a liveness signal on a timer
//! - **Metrics** — lock-free sent/received counters
//! - **Synapse** — the [`QuantaSynapse`] facade composing the above

pub mod heartbeat;
pub mod metrics;
pub mod registry;
pub mod synapse;

pub use heartbeat::HeartbeatWorker;
pub use metrics::{Metrics, MetricsSnapshot};
pub use registry::{SignalCallback, SubscriptionRegistry};
pub use synapse::{ErrorCallback, QuantaSynapse, StatusCallback};

pub use quanta_config::{ConnectionConfig, SynapseSettings};
pub use quanta_core::{ConnectionStatus, HEARTBEAT_TOPIC, Signal, SynapseError};
