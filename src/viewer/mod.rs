//! Viewer bootstrap.
//!
//! Runs the sequence a viewer needs before it can signal: authenticate,
//! create a session, fetch channel data, then sign the WSS endpoint. Each
//! step depends on the previous one and the first failure ends the run.

pub mod ice;

pub use ice::{IceTransportPolicy, RtcIceServer};

use crate::api::{AccessToken, ApiClient, ApiError, ChannelData, Role, StreamingSession};
use crate::config::ViewerConfig;
use crate::events::SessionEvents;
use crate::signer::{CanonicalSigner, RequestSigner, SignerError};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use tracing::info;

const CLIENT_ID_LEN: usize = 13;

#[derive(Debug, Error)]
pub enum ViewerError {
    #[error("Username and password are required")]
    MissingCredentials,
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("WSS endpoint not found in channel data")]
    MissingWssEndpoint,
    #[error(transparent)]
    Signer(#[from] SignerError),
}

/// Login credentials.
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    fn is_complete(&self) -> bool {
        !self.username.is_empty() && !self.password.is_empty()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Everything a signaling client needs to connect as a viewer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalingConfig {
    pub channel_arn: String,
    pub channel_endpoint: String,
    pub client_id: String,
    pub role: Role,
    pub region: String,
    pub system_clock_offset: i64,
    pub signed_url: String,
    pub ice_servers: Vec<RtcIceServer>,
    pub ice_transport_policy: IceTransportPolicy,
}

/// Result of a successful bootstrap.
#[derive(Debug, Clone)]
pub struct ViewerSession {
    pub token: AccessToken,
    pub session: StreamingSession,
    pub channel: ChannelData,
    pub signaling: SignalingConfig,
}

impl ViewerSession {
    #[must_use]
    pub fn session_id(&self) -> &str {
        &self.session.id
    }

    /// Event emitter bound to this session.
    #[must_use]
    pub fn events(&self, client: ApiClient) -> SessionEvents {
        SessionEvents::new(client, self.token.clone(), self.session.id.clone())
    }
}

/// Runs the viewer bootstrap against one backend with one signer.
#[derive(Debug, Clone)]
pub struct ViewerBootstrap<S = CanonicalSigner> {
    client: ApiClient,
    signer: S,
    options: ViewerConfig,
}

impl ViewerBootstrap<CanonicalSigner> {
    #[must_use]
    pub fn new(client: ApiClient, options: ViewerConfig) -> Self {
        Self::with_signer(client, CanonicalSigner, options)
    }
}

impl<S: RequestSigner> ViewerBootstrap<S> {
    #[must_use]
    pub fn with_signer(client: ApiClient, signer: S, options: ViewerConfig) -> Self {
        Self {
            client,
            signer,
            options,
        }
    }

    #[must_use]
    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    #[must_use]
    pub fn options(&self) -> &ViewerConfig {
        &self.options
    }

    pub async fn start(&self, credentials: &Credentials) -> Result<ViewerSession, ViewerError> {
        info!(role = %self.options.role, "Starting viewer bootstrap");

        if !credentials.is_complete() {
            return Err(ViewerError::MissingCredentials);
        }

        let token = self
            .client
            .login(&credentials.username, &credentials.password)
            .await?;
        info!("Authentication successful");

        let session = self.client.create_session(&token).await?;
        info!(session_id = %session.id, "Session created");

        let channel = self
            .client
            .channel_data(&token, &session.id, self.options.role)
            .await?;

        let signaling = self.signaling_config(&channel).await?;
        info!(
            session_id = %session.id,
            client_id = %signaling.client_id,
            channel_arn = %signaling.channel_arn,
            "Viewer signaling configuration ready"
        );

        Ok(ViewerSession {
            token,
            session,
            channel,
            signaling,
        })
    }

    /// Build the signaling configuration from already-fetched channel data.
    pub async fn signaling_config(
        &self,
        channel: &ChannelData,
    ) -> Result<SignalingConfig, ViewerError> {
        let client_id = self
            .options
            .client_id
            .clone()
            .filter(|id| !id.is_empty())
            .unwrap_or_else(random_client_id);

        let ice_servers = channel.ice_servers.iter().map(RtcIceServer::from).collect();

        let endpoint = channel
            .wss_endpoint()
            .ok_or(ViewerError::MissingWssEndpoint)?;

        let signed_url = self
            .signer
            .signed_url(endpoint, &channel.signed_signaling_params)
            .await?;

        Ok(SignalingConfig {
            channel_arn: channel.channel_arn.clone(),
            channel_endpoint: endpoint.to_owned(),
            client_id,
            role: self.options.role,
            region: channel.region.clone(),
            system_clock_offset: 0,
            signed_url,
            ice_servers,
            ice_transport_policy: IceTransportPolicy::from_config(&self.options),
        })
    }
}

/// Random lowercase base-36 client id.
#[must_use]
pub fn random_client_id() -> String {
    (0..CLIENT_ID_LEN)
        .map(|_| char::from_digit(fastrand::u32(..36), 36).unwrap_or('0'))
        .collect()
}
