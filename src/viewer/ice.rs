//! Peer-connection ICE settings derived from channel data.

use crate::api::IceServer;
use crate::config::ViewerConfig;
use serde::{Deserialize, Serialize};

/// ICE server in the shape a browser `RTCIceServer` expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RtcIceServer {
    pub urls: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credential: Option<String>,
}

impl From<&IceServer> for RtcIceServer {
    fn from(server: &IceServer) -> Self {
        Self {
            urls: server.uris.clone(),
            username: server.username.clone(),
            credential: server.password.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IceTransportPolicy {
    #[default]
    All,
    Relay,
}

impl IceTransportPolicy {
    /// Disabling NAT traversal wins over forcing TURN; forcing STUN still
    /// gathers every candidate type.
    #[must_use]
    pub const fn select(nat_traversal_disabled: bool, force_turn: bool) -> Self {
        if !nat_traversal_disabled && force_turn {
            Self::Relay
        } else {
            Self::All
        }
    }

    #[must_use]
    pub const fn from_config(config: &ViewerConfig) -> Self {
        Self::select(config.nat_traversal_disabled, config.force_turn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policy_selection() {
        assert_eq!(IceTransportPolicy::select(false, false), IceTransportPolicy::All);
        assert_eq!(IceTransportPolicy::select(false, true), IceTransportPolicy::Relay);
        assert_eq!(IceTransportPolicy::select(true, true), IceTransportPolicy::All);

        let config = ViewerConfig {
            force_stun: true,
            ..ViewerConfig::default()
        };
        assert_eq!(IceTransportPolicy::from_config(&config), IceTransportPolicy::All);
    }

    #[test]
    fn converts_backend_ice_server() {
        let server = IceServer {
            uris: vec!["turn:a:443?transport=udp".to_string()],
            username: Some("user".to_string()),
            password: Some("pass".to_string()),
            ttl: Some(300),
        };

        let rtc = RtcIceServer::from(&server);
        assert_eq!(rtc.urls, server.uris);
        assert_eq!(rtc.credential.as_deref(), Some("pass"));
        assert_eq!(
            serde_json::to_value(&rtc).unwrap(),
            serde_json::json!({
                "urls": ["turn:a:443?transport=udp"],
                "username": "user",
                "credential": "pass"
            })
        );
    }
}
