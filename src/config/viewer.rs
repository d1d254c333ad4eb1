//! Viewer bootstrap configuration.

use crate::api::Role;
use serde::{Deserialize, Deserializer, Serialize};

/// Defaults for the viewer bootstrap; CLI flags override these.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq, Eq)]
pub struct ViewerConfig {
    /// Signaling role to request channel data for
    #[serde(default)]
    pub role: Role,
    /// Fixed signaling client id; a random one is generated when unset
    #[serde(default, deserialize_with = "client_id_text")]
    pub client_id: Option<String>,
    /// Only relay (TURN) candidates
    #[serde(default)]
    pub force_turn: bool,
    /// Prefer STUN; currently still gathers all candidates
    #[serde(default)]
    pub force_stun: bool,
    /// Disable NAT traversal tweaks entirely
    #[serde(default)]
    pub nat_traversal_disabled: bool,
}

// Numeric ids (`"client_id": 123`, or `..__CLIENT_ID=123` from the env) are
// taken as their decimal text.
fn client_id_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<serde_json::Value>::deserialize(deserializer)? {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::String(id)) => Ok(Some(id)),
        Some(serde_json::Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!(
            "viewer.client_id must be a string or number, got {other}"
        ))),
    }
}
