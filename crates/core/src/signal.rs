//! Signal — the message record carried between publishers and subscribers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Topic reserved for heartbeats emitted while connected.
pub const HEARTBEAT_TOPIC: &str = "system.heartbeat";

/// Payload carried by every heartbeat signal.
pub const HEARTBEAT_CONTENT: &str = "ping";

/// A message published on a topic.
///
/// Plain value type: subscribers receive it by reference during fan-out and
/// clone it if they need to keep it. The timestamp is set at creation, so it
/// is only ordered within a single producer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    pub sender: String,
    /// Empty for broadcast
    #[serde(default)]
    pub receiver: String,
    /// Dotted topic-like tag, e.g. `system.heartbeat`
    #[serde(rename = "type")]
    pub signal_type: String,
    pub content: String,
    #[serde(default)]
    pub priority_score: f32,
    #[serde(default)]
    pub ethics_score: f32,
    pub timestamp: DateTime<Utc>,
}

impl Signal {
    /// Create a broadcast signal stamped with the current time.
    pub fn new(
        sender: impl Into<String>,
        signal_type: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            sender: sender.into(),
            receiver: String::new(),
            signal_type: signal_type.into(),
            content: content.into(),
            priority_score: 0.0,
            ethics_score: 0.0,
            timestamp: Utc::now(),
        }
    }

    /// Heartbeat signal sent by `sender`.
    pub fn heartbeat(sender: impl Into<String>) -> Self {
        Self::new(sender, HEARTBEAT_TOPIC, HEARTBEAT_CONTENT)
    }

    /// Address the signal to a specific receiver.
    pub fn with_receiver(mut self, receiver: impl Into<String>) -> Self {
        self.receiver = receiver.into();
        self
    }

    pub fn with_scores(mut self, priority_score: f32, ethics_score: f32) -> Self {
        self.priority_score = priority_score;
        self.ethics_score = ethics_score;
        self
    }

    pub fn is_broadcast(&self) -> bool {
        self.receiver.is_empty()
    }

    pub fn is_heartbeat(&self) -> bool {
        self.signal_type == HEARTBEAT_TOPIC
    }
}
