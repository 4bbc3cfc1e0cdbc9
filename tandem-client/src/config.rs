use std::time::Duration;
use tandem_core::utils::default_ice_servers;
use tandem_core::{IceServerConfig, Role};

pub const DEFAULT_KEEPALIVE_INTERVAL: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Signaling endpoint, e.g. `ws://192.168.1.20:8080/ws`.
    pub url: String,
    pub role: Role,
    pub keepalive_interval: Duration,
    pub ice_servers: Vec<IceServerConfig>,
}

impl ClientConfig {
    pub fn new(url: impl Into<String>, role: Role) -> Self {
        Self {
            url: url.into(),
            role,
            keepalive_interval: DEFAULT_KEEPALIVE_INTERVAL,
            ice_servers: default_ice_servers(),
        }
    }
}
