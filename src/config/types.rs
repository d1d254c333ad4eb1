//! Root configuration types.

use super::api::ApiConfig;
use super::events::EventsConfig;
use super::logging::LoggingConfig;
use super::viewer::ViewerConfig;
use serde::{Deserialize, Serialize};

/// Root configuration struct for the viewer.
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub viewer: ViewerConfig,
    #[serde(default)]
    pub events: EventsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}
