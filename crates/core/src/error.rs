//! Error types for the QuantaSynapse domain.
//!
//! Uses `thiserror` for ergonomic error definitions. The facade never
//! returns these from `connect`/`disconnect` (both are simulated); they are
//! carried through the error-report path to the registered error callback.

use thiserror::Error;

/// The top-level error type for all QuantaSynapse operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SynapseError {
    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    // --- Connection errors ---
    #[error("Connection error: {0}")]
    Connection(String),

    // --- Subscriber errors ---
    #[error("Subscriber failed on topic '{topic}': {reason}")]
    SubscriberFailure { topic: String, reason: String },
}

impl SynapseError {
    /// Shorthand for a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connection_error_displays_correctly() {
        let err = SynapseError::Connection("transport reset".into());
        assert!(err.to_string().contains("Connection error"));
        assert!(err.to_string().contains("transport reset"));
    }

    #[test]
    fn subscriber_failure_names_topic() {
        let err = SynapseError::SubscriberFailure {
            topic: "system.heartbeat".into(),
            reason: "handler panicked".into(),
        };
        assert!(err.to_string().contains("system.heartbeat"));
        assert!(err.to_string().contains("handler panicked"));
    }

    #[test]
    fn configuration_shorthand() {
        let err = SynapseError::configuration("missing host");
        assert_eq!(
            err,
            SynapseError::Configuration {
                message: "missing host".into()
            }
        );
    }
}
