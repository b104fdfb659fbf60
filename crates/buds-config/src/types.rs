use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// OSC receiver settings.
    pub receiver: ReceiverConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceiverConfig {
    /// Local bind address for the UDP socket.
    pub host: String,
    /// Local bind port. The Buds bridge app sends to 9000 by default.
    pub port: u16,
    /// OSC address pattern carrying the orientation quaternion.
    pub address: String,
}

impl Default for ReceiverConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 9000,
            address: "/buds/orientation".to_string(),
        }
    }
}
