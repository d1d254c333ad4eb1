//! Session lifecycle events and the `MDS_CONNECTED` heartbeat.
//!
//! A [`SessionEvents`] is bound to one session: it owns the bearer token,
//! the session id, and at most one running heartbeat. Dropping it stops the
//! heartbeat.

pub mod heartbeat;

pub use heartbeat::Heartbeat;

use crate::api::{AccessToken, ApiClient, ApiError, SessionEventRequest};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

/// Event types understood by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionEventKind {
    ChannelCreated,
    MdsPolled,
    MdsJoined,
    MdsConnected,
    MdsDisconnected,
}

impl SessionEventKind {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ChannelCreated => "CHANNEL_CREATED",
            Self::MdsPolled => "MDS_POLLED",
            Self::MdsJoined => "MDS_JOINED",
            Self::MdsConnected => "MDS_CONNECTED",
            Self::MdsDisconnected => "MDS_DISCONNECTED",
        }
    }
}

impl fmt::Display for SessionEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payload attached to an event.
///
/// `Raw` strings are sent as-is; `Json` values are sent as base64 of their
/// compact JSON text.
#[derive(Debug, Clone, PartialEq)]
pub enum EventData {
    Raw(String),
    Json(serde_json::Value),
}

impl Default for EventData {
    fn default() -> Self {
        Self::Json(serde_json::Value::Object(serde_json::Map::new()))
    }
}

impl EventData {
    pub fn encode(&self) -> Result<String, EventError> {
        match self {
            Self::Raw(raw) => Ok(raw.clone()),
            Self::Json(value) => {
                let json = serde_json::to_string(value).map_err(EventError::Encode)?;
                Ok(BASE64.encode(json))
            }
        }
    }
}

impl From<serde_json::Value> for EventData {
    fn from(value: serde_json::Value) -> Self {
        Self::Json(value)
    }
}

impl From<String> for EventData {
    fn from(value: String) -> Self {
        Self::Raw(value)
    }
}

impl From<&str> for EventData {
    fn from(value: &str) -> Self {
        Self::Raw(value.to_owned())
    }
}

#[derive(Debug, Error)]
pub enum EventError {
    #[error("session not initialized")]
    NotInitialized,
    #[error("heartbeat interval must be greater than zero")]
    InvalidInterval,
    #[error("heartbeat requires a running tokio runtime")]
    NoRuntime,
    #[error("failed to encode event data: {0}")]
    Encode(#[source] serde_json::Error),
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// The part of a [`SessionEvents`] shared with its heartbeat task.
#[derive(Debug)]
pub(crate) struct EventSender {
    client: ApiClient,
    token: AccessToken,
    session_id: String,
}

impl EventSender {
    pub(crate) async fn send(
        &self,
        kind: SessionEventKind,
        data: &EventData,
        count: u32,
    ) -> Result<(), EventError> {
        if self.token.is_empty() || self.session_id.is_empty() {
            tracing::error!("Cannot send session event: session not initialized");
            return Err(EventError::NotInitialized);
        }

        let request = SessionEventRequest {
            event_type: kind.as_str().to_owned(),
            event_data: data.encode()?,
            event_count: count,
        };

        self.client
            .create_session_event(&self.token, &self.session_id, &request)
            .await?;
        Ok(())
    }
}

/// Event emitter for a single streaming session.
#[derive(Debug)]
pub struct SessionEvents {
    sender: Arc<EventSender>,
    heartbeat: Option<Heartbeat>,
}

impl SessionEvents {
    pub fn new(client: ApiClient, token: AccessToken, session_id: impl Into<String>) -> Self {
        let session_id = session_id.into();
        info!(%session_id, "Session events initialized");
        Self {
            sender: Arc::new(EventSender {
                client,
                token,
                session_id,
            }),
            heartbeat: None,
        }
    }

    #[must_use]
    pub fn session_id(&self) -> &str {
        &self.sender.session_id
    }

    /// Send one event with an explicit counter.
    pub async fn send_event(
        &self,
        kind: SessionEventKind,
        data: impl Into<EventData>,
        count: u32,
    ) -> Result<(), EventError> {
        self.sender.send(kind, &data.into(), count).await
    }

    pub async fn channel_created(&self, data: impl Into<EventData>) -> Result<(), EventError> {
        self.send_event(SessionEventKind::ChannelCreated, data, 1).await
    }

    pub async fn mds_polled(&self, data: impl Into<EventData>) -> Result<(), EventError> {
        self.send_event(SessionEventKind::MdsPolled, data, 1).await
    }

    pub async fn mds_joined(&self, data: impl Into<EventData>) -> Result<(), EventError> {
        self.send_event(SessionEventKind::MdsJoined, data, 1).await
    }

    pub async fn mds_connected(&self, data: impl Into<EventData>) -> Result<(), EventError> {
        self.send_event(SessionEventKind::MdsConnected, data, 1).await
    }

    pub async fn mds_disconnected(&self, data: impl Into<EventData>) -> Result<(), EventError> {
        self.send_event(SessionEventKind::MdsDisconnected, data, 1).await
    }

    /// Start sending `MDS_CONNECTED` now and then every `interval`.
    ///
    /// Replaces any heartbeat already running. Must be called from within a
    /// tokio runtime.
    pub fn start_heartbeat(
        &mut self,
        interval: Duration,
        data: impl Into<EventData>,
    ) -> Result<(), EventError> {
        if interval.is_zero() {
            return Err(EventError::InvalidInterval);
        }
        let runtime = tokio::runtime::Handle::try_current().map_err(|_| EventError::NoRuntime)?;

        self.stop_heartbeat();
        self.heartbeat = Some(Heartbeat::spawn(
            &runtime,
            Arc::clone(&self.sender),
            interval,
            data.into(),
        ));
        Ok(())
    }

    /// Stop the heartbeat if one is running.
    pub fn stop_heartbeat(&mut self) {
        if let Some(heartbeat) = self.heartbeat.take() {
            heartbeat.stop();
        }
    }

    /// True while a heartbeat task is alive.
    #[must_use]
    pub fn is_heartbeat_running(&self) -> bool {
        self.heartbeat
            .as_ref()
            .is_some_and(|heartbeat| !heartbeat.is_finished())
    }

    #[must_use]
    pub fn heartbeat_interval(&self) -> Option<Duration> {
        self.heartbeat.as_ref().map(Heartbeat::interval)
    }

    /// Stop the heartbeat and release the session.
    pub fn cleanup(mut self) {
        self.stop_heartbeat();
        info!(session_id = %self.sender.session_id, "Session events cleaned up");
    }
}
