//! Session event configuration.

use super::defaults::{default_enable_heartbeat, default_heartbeat_interval_secs};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct EventsConfig {
    /// Interval between `MDS_CONNECTED` heartbeats (seconds)
    #[serde(default = "default_heartbeat_interval_secs")]
    pub heartbeat_interval_secs: u64,
    /// Keep a heartbeat running while the viewer is connected
    #[serde(default = "default_enable_heartbeat")]
    pub enable_heartbeat: bool,
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self {
            heartbeat_interval_secs: default_heartbeat_interval_secs(),
            enable_heartbeat: default_enable_heartbeat(),
        }
    }
}

impl EventsConfig {
    #[must_use]
    pub const fn heartbeat_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.heartbeat_interval_secs)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.heartbeat_interval_secs == 0 {
            anyhow::bail!("events.heartbeat_interval_secs must be at least 1 second");
        }
        Ok(())
    }
}
