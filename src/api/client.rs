use super::error::{ApiError, ApiOperation};
use super::types::{
    AccessToken, ChannelData, Envelope, ErrorBody, Role, SessionEventRequest, StreamingSession,
    TokenResponse,
};
use crate::config::ApiConfig;
use reqwest::header::AUTHORIZATION;
use reqwest::{multipart, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, error, info};
use url::Url;

const AUTH_TOKEN_PATH: &[&str] = &["v1", "auth", "token"];
const SESSIONS_PATH: &[&str] = &["v1", "scribe", "live-streaming", "sessions"];

/// REST client for the streaming backend.
///
/// Every call is a single request: no retries, no token refresh. Failures are
/// logged with the operation name and returned to the caller.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let base_url = Url::parse(&config.base_url)?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(ApiError::Client)?;

        Ok(Self { http, base_url })
    }

    /// Client against `base_url` with default settings otherwise.
    pub fn with_base_url(base_url: &str) -> Result<Self, ApiError> {
        Self::new(&ApiConfig {
            base_url: base_url.to_owned(),
            ..ApiConfig::default()
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Exchange username and password for a bearer token.
    pub async fn login(&self, username: &str, password: &str) -> Result<AccessToken, ApiError> {
        let operation = ApiOperation::Login;
        let url = self.endpoint(AUTH_TOKEN_PATH)?;
        let form = multipart::Form::new()
            .text("username", username.to_owned())
            .text("password", password.to_owned());

        let result = async {
            let response = self.send(operation, self.http.post(url).multipart(form)).await?;
            let body: TokenResponse = read_json(operation, response).await?;
            body.into_token().ok_or(ApiError::MissingField {
                operation,
                field: "access_token",
            })
        }
        .await;

        log_outcome(operation, result)
    }

    /// Provision a new streaming session.
    pub async fn create_session(&self, token: &AccessToken) -> Result<StreamingSession, ApiError> {
        let operation = ApiOperation::CreateSession;
        let url = self.endpoint(SESSIONS_PATH)?;

        let result = async {
            let request = self.http.post(url).header(AUTHORIZATION, token.bearer());
            let response = self.send(operation, request).await?;
            let body: Envelope<StreamingSession> = read_json(operation, response).await?;
            Ok::<_, ApiError>(body.data)
        }
        .await;

        let session = log_outcome(operation, result)?;
        info!(session_id = %session.id, "Streaming session created");
        Ok(session)
    }

    /// Fetch signaling channel data for `session_id` in the given role.
    pub async fn channel_data(
        &self,
        token: &AccessToken,
        session_id: &str,
        role: Role,
    ) -> Result<ChannelData, ApiError> {
        let operation = ApiOperation::ChannelData;
        let mut url = self.session_endpoint(session_id, &["channel_data"])?;
        url.query_pairs_mut().append_pair("role", role.as_str());

        let result = async {
            let request = self.http.get(url).header(AUTHORIZATION, token.bearer());
            let response = self.send(operation, request).await?;
            let body: Envelope<ChannelData> = read_json(operation, response).await?;
            Ok::<_, ApiError>(body.data)
        }
        .await;

        let data = log_outcome(operation, result)?;
        info!(
            %session_id,
            channel_arn = %data.channel_arn,
            region = %data.region,
            endpoints = data.endpoints.len(),
            ice_servers = data.ice_servers.len(),
            "Channel data retrieved"
        );
        Ok(data)
    }

    /// Record a session lifecycle event.
    pub async fn create_session_event(
        &self,
        token: &AccessToken,
        session_id: &str,
        event: &SessionEventRequest,
    ) -> Result<(), ApiError> {
        let operation = ApiOperation::SessionEvent;
        let url = self.session_endpoint(session_id, &["events"])?;

        let result = async {
            let request = self
                .http
                .post(url)
                .header(AUTHORIZATION, token.bearer())
                .json(event);
            let response = self.send(operation, request).await?;
            ensure_success(operation, response).await.map(|_| ())
        }
        .await;

        log_outcome(operation, result)?;
        debug!(
            %session_id,
            event_type = %event.event_type,
            event_count = event.event_count,
            "Session event sent"
        );
        Ok(())
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut target = self.base_url.clone();
        target
            .path_segments_mut()
            .map_err(|()| ApiError::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .extend(segments);
        Ok(target)
    }

    fn session_endpoint(&self, session_id: &str, tail: &[&str]) -> Result<Url, ApiError> {
        let segments: Vec<&str> = SESSIONS_PATH
            .iter()
            .copied()
            .chain(std::iter::once(session_id))
            .chain(tail.iter().copied())
            .collect();
        self.endpoint(&segments)
    }

    async fn send(&self, operation: ApiOperation, request: RequestBuilder) -> Result<Response, ApiError> {
        request
            .send()
            .await
            .map_err(|source| ApiError::Transport { operation, source })
    }
}

async fn ensure_success(operation: ApiOperation, response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    // Prefer the backend's message, fall back to the status reason.
    let message = response
        .json::<ErrorBody>()
        .await
        .ok()
        .and_then(|body| body.message)
        .filter(|message| !message.trim().is_empty())
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("unexpected status")
                .to_owned()
        });

    Err(ApiError::Status {
        operation,
        status: status.as_u16(),
        message,
    })
}

async fn read_json<T: DeserializeOwned>(
    operation: ApiOperation,
    response: Response,
) -> Result<T, ApiError> {
    let response = ensure_success(operation, response).await?;
    let bytes = response
        .bytes()
        .await
        .map_err(|source| ApiError::Transport { operation, source })?;

    serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode {
        operation,
        reason: e.to_string(),
    })
}

fn log_outcome<T>(operation: ApiOperation, result: Result<T, ApiError>) -> Result<T, ApiError> {
    if let Err(e) = &result {
        error!(%operation, status = e.status(), error = %e, "Backend request failed");
    }
    result
}
