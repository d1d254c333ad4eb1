//! Default value functions for configuration fields.
//!
//! Used by serde's `#[serde(default = ...)]` attributes throughout the
//! configuration types.

use super::logging::LogFormat;

// =============================================================================
// API Defaults
// =============================================================================

pub fn default_base_url() -> String {
    "https://staging-rcm-api.athelas.com".to_string()
}

pub const fn default_request_timeout_secs() -> u64 {
    30
}

pub fn default_user_agent() -> String {
    concat!("signal-viewer/", env!("CARGO_PKG_VERSION")).to_string()
}

// =============================================================================
// Event Defaults
// =============================================================================

pub const fn default_heartbeat_interval_secs() -> u64 {
    60 // 1 minute
}

pub const fn default_enable_heartbeat() -> bool {
    true
}

// =============================================================================
// Logging Defaults
// =============================================================================

pub fn default_log_dir() -> String {
    "logs".to_string()
}

pub fn default_log_filename() -> String {
    "viewer.log".to_string()
}

pub fn default_rotation() -> String {
    "daily".to_string()
}

pub const fn default_enable_file_logging() -> bool {
    false
}

pub const fn default_log_format() -> LogFormat {
    LogFormat::Text
}
