#![cfg_attr(not(test), deny(clippy::panic))]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions
)]

//! # Signal Viewer
//!
//! Viewer-side bootstrap for WebRTC signaling channels.
//!
//! Authenticates against the streaming backend, provisions a session, fetches
//! the signaling channel data and turns its pre-computed signing parameters
//! into a connectable WSS URL. The peer connection itself is left to the
//! signaling client that consumes the resulting [`viewer::SignalingConfig`].

/// Streaming backend REST client
pub mod api;

/// Configuration loading and environment overrides
pub mod config;

/// Session lifecycle events and heartbeat
pub mod events;

/// Structured logging configuration
pub mod logging;

/// Canonical signed URL construction
pub mod signer;

/// Viewer bootstrap sequence
pub mod viewer;
