//! # Quanta Core
//!
//! Domain types and error definitions for the QuantaSynapse messaging facade.
//! This crate has **no async runtime dependency** — it defines the data model
//! (signals, connection status, errors) that the facade crate builds on.

pub mod error;
pub mod signal;
pub mod status;

// Re-export key types at crate root for ergonomics
pub use error::SynapseError;
pub use signal::{HEARTBEAT_CONTENT, HEARTBEAT_TOPIC, Signal};
pub use status::ConnectionStatus;
