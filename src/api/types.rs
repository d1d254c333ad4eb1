//! Wire types exchanged with the streaming backend.

use crate::signer::QueryParams;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Bearer token returned by the login endpoint.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub(crate) fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(<redacted>)")
    }
}

/// Signaling role requested for channel data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    #[default]
    #[serde(alias = "viewer")]
    Viewer,
    #[serde(alias = "master")]
    Master,
}

impl Role {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Viewer => "VIEWER",
            Self::Master => "MASTER",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "VIEWER" => Ok(Self::Viewer),
            "MASTER" => Ok(Self::Master),
            other => Err(format!("unknown role '{other}', expected VIEWER or MASTER")),
        }
    }
}

/// `{ "data": ... }` wrapper used by every backend response.
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope<T> {
    pub data: T,
}

/// Login response; the token may sit inside `data` or at the top level.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct TokenResponse {
    #[serde(default)]
    pub data: Option<TokenData>,
    #[serde(default)]
    pub access_token: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct TokenData {
    #[serde(default)]
    pub access_token: Option<String>,
}

impl TokenResponse {
    pub fn into_token(self) -> Option<AccessToken> {
        self.data
            .and_then(|data| data.access_token)
            .filter(|token| !token.is_empty())
            .or(self.access_token.filter(|token| !token.is_empty()))
            .map(AccessToken::new)
    }
}

/// Error body returned with non-2xx statuses.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}

/// A provisioned streaming session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamingSession {
    pub id: String,
    /// Any further fields the backend attaches.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Endpoint entry as returned by the signaling channel lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceEndpoint {
    #[serde(rename = "Protocol")]
    pub protocol: String,
    #[serde(rename = "ResourceEndpoint")]
    pub resource_endpoint: String,
}

/// ICE server entry in backend (PascalCase) form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IceServer {
    #[serde(rename = "Uris", default)]
    pub uris: Vec<String>,
    #[serde(rename = "Username", default)]
    pub username: Option<String>,
    #[serde(rename = "Password", default)]
    pub password: Option<String>,
    #[serde(rename = "Ttl", default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u64>,
}

/// Everything a viewer needs to reach the signaling channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelData {
    pub channel_arn: String,
    pub region: String,
    #[serde(default)]
    pub endpoints: Vec<ResourceEndpoint>,
    #[serde(default)]
    pub ice_servers: Vec<IceServer>,
    #[serde(default)]
    pub signed_signaling_params: QueryParams,
}

impl ChannelData {
    /// First endpoint advertised for the `WSS` protocol.
    #[must_use]
    pub fn wss_endpoint(&self) -> Option<&str> {
        self.endpoints
            .iter()
            .find(|endpoint| endpoint.protocol == "WSS")
            .map(|endpoint| endpoint.resource_endpoint.as_str())
    }
}

/// Body of a session event post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionEventRequest {
    pub event_type: String,
    pub event_data: String,
    pub event_count: u32,
}
