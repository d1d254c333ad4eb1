//! Configuration for the viewer.
//!
//! Supports JSON configuration files, stdin, inline JSON, and per-field
//! environment overrides on top of compiled defaults.
//!
//! # Module Structure
//!
//! - [`crate::config::types`]: Root `Config` struct
//! - [`api`]: Backend base URL, timeouts, user agent
//! - [`viewer`]: Role, client id and ICE transport preferences
//! - [`events`]: Session event heartbeat settings
//! - [`logging`]: Logging configuration
//! - [`crate::config::loader`]: Configuration loading functions
//! - [`crate::config::validation`]: Configuration validation functions
//! - [`crate::config::defaults`]: Default value functions

pub mod api;
pub mod defaults;
pub mod events;
pub mod loader;
pub mod logging;
pub mod types;
pub mod validation;
pub mod viewer;

pub use api::ApiConfig;

pub use events::EventsConfig;

pub use loader::load;

pub use logging::{LogFormat, LogLevel, LoggingConfig};

pub use types::Config;

pub use validation::validate_config;

pub use viewer::ViewerConfig;
