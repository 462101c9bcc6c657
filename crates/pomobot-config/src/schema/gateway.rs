//! Gateway connection configuration.

use serde::{Deserialize, Serialize};

/// WebSocket gateway connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewaySection {
    /// WebSocket URL of the platform gateway.
    pub url: String,
    /// Heartbeat interval in seconds.
    pub heartbeat_interval_secs: u64,
    /// Reconnect base delay in seconds.
    pub reconnect_delay_secs: u64,
    /// Maximum reconnect delay in seconds.
    pub max_reconnect_delay_secs: u64,
}

impl Default for GatewaySection {
    fn default() -> Self {
        Self {
            url: String::new(),
            heartbeat_interval_secs: 25,
            reconnect_delay_secs: 1,
            max_reconnect_delay_secs: 30,
        }
    }
}
