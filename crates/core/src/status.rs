//! Connection lifecycle states.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Current state of the facade's logical connection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum ConnectionStatus {
    #[default]
    Disconnected = 0,
    Connecting = 1,
    Connected = 2,
    Disconnecting = 3,
    /// Entered only through an explicit error report
    Error = 4,
}

impl ConnectionStatus {
    /// Encoding used for atomic storage.
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Decode an atomically stored value. Unknown values map to `Error`.
    pub fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::Disconnected,
            1 => Self::Connecting,
            2 => Self::Connected,
            3 => Self::Disconnecting,
            _ => Self::Error,
        }
    }

    pub fn is_connected(self) -> bool {
        self == Self::Connected
    }
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Disconnected => "disconnected",
            Self::Connecting => "connecting",
            Self::Connected => "connected",
            Self::Disconnecting => "disconnecting",
            Self::Error => "error",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn u8_encoding_roundtrips_every_state() {
        for status in [
            ConnectionStatus::Disconnected,
            ConnectionStatus::Connecting,
            ConnectionStatus::Connected,
            ConnectionStatus::Disconnecting,
            ConnectionStatus::Error,
        ] {
            assert_eq!(ConnectionStatus::from_u8(status.as_u8()), status);
        }
    }

    #[test]
    fn unknown_value_decodes_as_error() {
        assert_eq!(ConnectionStatus::from_u8(200), ConnectionStatus::Error);
    }

    #[test]
    fn default_is_disconnected() {
        assert_eq!(ConnectionStatus::default(), ConnectionStatus::Disconnected);
        assert!(!ConnectionStatus::default().is_connected());
    }

    #[test]
    fn display_and_serde_agree() {
        let status = ConnectionStatus::Disconnecting;
        let json = serde_json::to_string(&status).unwrap();
        assert_eq!(json, format!("\"{status}\""));
    }
}
