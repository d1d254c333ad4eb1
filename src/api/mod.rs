//! Streaming backend REST client.
//!
//! Covers the calls a viewer makes before it can signal: login, session
//! creation, channel data lookup, and session event reporting.

pub mod client;
pub mod error;
pub mod types;

pub use client::ApiClient;
pub use error::{ApiError, ApiOperation};
pub use types::{
    AccessToken, ChannelData, IceServer, ResourceEndpoint, Role, SessionEventRequest,
    StreamingSession,
};
